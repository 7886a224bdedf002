pub mod error;
pub mod logging;

pub use error::{GlError, MeshError, ShaderError};
pub use logging::init_logging;

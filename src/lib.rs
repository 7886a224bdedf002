pub mod app;
pub mod config;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use app::{FrameInfo, RenderWindow};
pub use config::{AppConfig, LogConfig, WindowConfig};
pub use render::context::{GlContext, PolygonMode};
pub use render::mesh::{Mesh, VertexLayout};
pub use render::program::ShaderProgram;
pub use render::shaders::{ShaderKind, ShaderSource};
pub use render::uniform::UniformValue;
pub use utils::error::{GlError, MeshError, ShaderError};

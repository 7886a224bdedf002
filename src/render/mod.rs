pub mod context;
pub mod mesh;
pub mod program;
pub mod shaders;
pub mod uniform;

pub use context::{GlContext, PolygonMode};
pub use mesh::{Mesh, VertexLayout};
pub use program::ShaderProgram;
pub use shaders::{ShaderKind, ShaderSource};
pub use uniform::UniformValue;

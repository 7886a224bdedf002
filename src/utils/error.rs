use crate::render::shaders::ShaderKind;
use gl::types::{GLenum, GLuint};
use std::ffi::NulError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {kind} shader source {path:?}: {source}")]
    Read {
        kind: ShaderKind,
        path: PathBuf,
        source: io::Error,
    },

    #[error("{kind} shader source contains a nul byte at offset {}", .source.nul_position())]
    Nul { kind: ShaderKind, source: NulError },

    #[error("{kind} shader compilation failed:\n{log}")]
    Compile { kind: ShaderKind, log: String },

    #[error("expected a {expected} shader source, got a {found} one")]
    StageMismatch {
        expected: ShaderKind,
        found: ShaderKind,
    },

    #[error("program linking failed:\n{log}")]
    Link { log: String },

    #[error("driver returned no handle for a new {0}")]
    ObjectCreation(&'static str),
}

impl ShaderError {
    /// Stage that failed. Link failures belong to no single stage.
    pub fn stage(&self) -> Option<ShaderKind> {
        match self {
            Self::Read { kind, .. } | Self::Nul { kind, .. } | Self::Compile { kind, .. } => {
                Some(*kind)
            }
            Self::Link { .. } | Self::StageMismatch { .. } | Self::ObjectCreation(_) => None,
        }
    }

    /// Compiler or linker info log, if the driver produced one.
    pub fn log(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            _ => None,
        }
    }

    pub fn is_link_failure(&self) -> bool {
        matches!(self, Self::Link { .. })
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,

    #[error("vertex data of {len} floats is not a multiple of the {stride}-float layout stride")]
    Misaligned { len: usize, stride: usize },

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("vertex layout has no attributes")]
    NoAttributes,

    #[error("attribute {location} has {components} components, expected 1 to 4")]
    InvalidComponents { location: GLuint, components: usize },

    #[error("driver returned no handle for a new {0}")]
    ObjectCreation(&'static str),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    #[error("GL_INVALID_ENUM")]
    InvalidEnum,
    #[error("GL_INVALID_VALUE")]
    InvalidValue,
    #[error("GL_INVALID_OPERATION")]
    InvalidOperation,
    #[error("GL_INVALID_FRAMEBUFFER_OPERATION")]
    InvalidFramebufferOperation,
    #[error("GL_OUT_OF_MEMORY")]
    OutOfMemory,
    #[error("GL_STACK_UNDERFLOW")]
    StackUnderflow,
    #[error("GL_STACK_OVERFLOW")]
    StackOverflow,
    #[error("unknown GL error 0x{0:04x}")]
    Unknown(GLenum),
}

impl GlError {
    /// Maps a `glGetError` code. `GL_NO_ERROR` maps to `None`.
    pub fn from_code(code: GLenum) -> Option<Self> {
        match code {
            gl::NO_ERROR => None,
            gl::INVALID_ENUM => Some(Self::InvalidEnum),
            gl::INVALID_VALUE => Some(Self::InvalidValue),
            gl::INVALID_OPERATION => Some(Self::InvalidOperation),
            gl::INVALID_FRAMEBUFFER_OPERATION => Some(Self::InvalidFramebufferOperation),
            gl::OUT_OF_MEMORY => Some(Self::OutOfMemory),
            gl::STACK_UNDERFLOW => Some(Self::StackUnderflow),
            gl::STACK_OVERFLOW => Some(Self::StackOverflow),
            other => Some(Self::Unknown(other)),
        }
    }
}

// shaders.rs - shader stage kinds and source loading

use crate::utils::error::ShaderError;
use gl::types::GLenum;
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Program text for one stage, held until it has been compiled.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    kind: ShaderKind,
    text: String,
    origin: Option<PathBuf>,
}

impl ShaderSource {
    pub fn inline(kind: ShaderKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            origin: None,
        }
    }

    pub fn from_file(kind: ShaderKind, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            kind,
            text,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Version named by a `#version` directive on the first non-blank line.
    pub fn declared_version(&self) -> Option<&str> {
        let first = self.text.lines().map(str::trim).find(|l| !l.is_empty())?;
        let rest = first.strip_prefix('#')?.trim_start();
        let version = rest.strip_prefix("version")?.trim();
        if version.is_empty() {
            None
        } else {
            Some(version)
        }
    }

    pub(crate) fn to_cstring(&self) -> Result<CString, ShaderError> {
        CString::new(self.text.as_bytes()).map_err(|source| ShaderError::Nul {
            kind: self.kind,
            source,
        })
    }

    pub(crate) fn describe(&self) -> String {
        match &self.origin {
            Some(path) => format!("{} shader {:?}", self.kind, path),
            None => format!("inline {} shader", self.kind),
        }
    }
}

use crate::utils::error::GlError;
use gl::types::*;
use std::ffi::{c_void, CStr};
use std::marker::PhantomData;

/// Proof that GL functions are loaded and a context is current on this thread.
///
/// The token is neither `Send` nor `Sync`. Every GL object in this crate
/// keeps a clone of it, which pins the object to the context thread.
#[derive(Clone)]
pub struct GlContext {
    _thread_bound: PhantomData<*const ()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

impl PolygonMode {
    fn gl_enum(self) -> GLenum {
        match self {
            Self::Fill => gl::FILL,
            Self::Line => gl::LINE,
        }
    }
}

impl GlContext {
    /// Loads GL function pointers through `loader`.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread, and `loader` must
    /// resolve symbols for that context.
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        let context = Self {
            _thread_bound: PhantomData,
        };

        if let Some(version) = context.version_string() {
            log::info!("OpenGL {}", version);
        }
        context
    }

    pub fn version_string(&self) -> Option<String> {
        let ptr = unsafe { gl::GetString(gl::VERSION) };
        if ptr.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(ptr as *const _) };
        Some(version.to_string_lossy().into_owned())
    }

    /// Pops the oldest pending error.
    pub fn check_error(&self) -> Result<(), GlError> {
        match GlError::from_code(unsafe { gl::GetError() }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Empties the error queue.
    pub fn drain_errors(&self) -> Vec<GlError> {
        let mut errors = Vec::new();
        while let Err(err) = self.check_error() {
            errors.push(err);
            // a lost context reports the same error forever
            if errors.len() >= 32 {
                break;
            }
        }
        errors
    }

    pub fn viewport(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as GLsizei, height as GLsizei);
        }
    }

    pub fn clear_color(&self, color: [f32; 4]) {
        unsafe {
            gl::ClearColor(color[0], color[1], color[2], color[3]);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn set_polygon_mode(&self, mode: PolygonMode) {
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode.gl_enum());
        }
    }
}

impl std::fmt::Debug for GlContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlContext").finish_non_exhaustive()
    }
}

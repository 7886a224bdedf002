// program.rs - linked vertex + fragment shader programs

use crate::render::context::GlContext;
use crate::render::shaders::{ShaderKind, ShaderSource};
use crate::render::uniform::UniformValue;
use crate::utils::error::ShaderError;
use gl::types::*;
use std::collections::HashMap;
use std::ffi::CString;
use std::path::Path;
use std::ptr;

/// A linked GL program made of one vertex and one fragment stage.
///
/// Only successfully linked programs are ever handed out. The program
/// object is deleted when this value is dropped.
pub struct ShaderProgram {
    _gl: GlContext,
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

/// A compiled stage, deleted when the guard goes out of scope.
struct CompiledStage {
    id: GLuint,
    kind: ShaderKind,
}

impl Drop for CompiledStage {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
        log::debug!("deleted {} shader {}", self.kind, self.id);
    }
}

impl ShaderProgram {
    pub fn from_files(
        gl: &GlContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::from_file(ShaderKind::Vertex, vertex_path)?;
        let fragment = ShaderSource::from_file(ShaderKind::Fragment, fragment_path)?;
        Self::from_stage_sources(gl, &vertex, &fragment)
    }

    pub fn from_sources(
        gl: &GlContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::inline(ShaderKind::Vertex, vertex_source);
        let fragment = ShaderSource::inline(ShaderKind::Fragment, fragment_source);
        Self::from_stage_sources(gl, &vertex, &fragment)
    }

    /// Compiles both stages and links them. The vertex stage is compiled
    /// first, so its errors take precedence.
    pub fn from_stage_sources(
        gl: &GlContext,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        check_stage_kinds(vertex, fragment)?;

        let vertex_stage = Self::compile_stage(vertex)?;
        let fragment_stage = Self::compile_stage(fragment)?;

        let program = unsafe { gl::CreateProgram() };
        if program == 0 {
            return Err(ShaderError::ObjectCreation("program"));
        }

        unsafe {
            gl::AttachShader(program, vertex_stage.id);
            gl::AttachShader(program, fragment_stage.id);
            gl::LinkProgram(program);
            gl::DetachShader(program, vertex_stage.id);
            gl::DetachShader(program, fragment_stage.id);
        }
        drop(vertex_stage);
        drop(fragment_stage);

        Self::check_link_status(gl, program)
    }

    fn compile_stage(source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
        if source.declared_version().is_none() {
            log::warn!("{} has no #version directive", source.describe());
        }

        let source_cstring = source.to_cstring()?;
        let id = unsafe { gl::CreateShader(source.kind().gl_enum()) };
        if id == 0 {
            return Err(ShaderError::ObjectCreation("shader"));
        }
        let stage = CompiledStage {
            id,
            kind: source.kind(),
        };

        unsafe {
            gl::ShaderSource(stage.id, 1, &source_cstring.as_ptr(), ptr::null());
            gl::CompileShader(stage.id);
        }

        let mut success = 1;
        unsafe {
            gl::GetShaderiv(stage.id, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetShaderiv(stage.id, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = info_log_buffer(len);
            unsafe {
                gl::GetShaderInfoLog(
                    stage.id,
                    len,
                    ptr::null_mut(),
                    buffer.as_mut_ptr() as *mut GLchar,
                );
            }

            return Err(ShaderError::Compile {
                kind: source.kind(),
                log: info_log_to_string(buffer),
            });
        }

        log::debug!("compiled {} as shader {}", source.describe(), stage.id);
        Ok(stage)
    }

    fn check_link_status(gl: &GlContext, program: GLuint) -> Result<Self, ShaderError> {
        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = info_log_buffer(len);
            unsafe {
                gl::GetProgramInfoLog(
                    program,
                    len,
                    ptr::null_mut(),
                    buffer.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteProgram(program);
            }

            return Err(ShaderError::Link {
                log: info_log_to_string(buffer),
            });
        }

        log::debug!("linked program {}", program);
        Ok(ShaderProgram {
            _gl: gl.clone(),
            id: program,
            uniforms: HashMap::new(),
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    /// Cached uniform lookup. Misses are cached too and warned about once.
    pub fn uniform_location(&mut self, name: &str) -> Option<GLint> {
        if let Some(location) = self.uniforms.get(name) {
            return (*location != -1).then_some(*location);
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{}' not found in program {}", name, self.id);
        }

        self.uniforms.insert(name.to_string(), location);
        (location != -1).then_some(location)
    }

    /// Vertex attribute lookup, kept apart from the uniform namespace.
    pub fn attrib_location(&self, name: &str) -> Option<GLuint> {
        let cname = CString::new(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(self.id, cname.as_ptr()) };
        GLuint::try_from(location).ok()
    }

    /// Binds the program and writes `value` to the named uniform.
    ///
    /// Unknown names are a silent no-op, matching GL's behaviour for
    /// location -1.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.set_used();
        if let Some(location) = self.uniform_location(name) {
            value.into().upload(location);
        }
    }

    pub fn set_uniform_1i(&mut self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_uniform_2f(&mut self, name: &str, x: f32, y: f32) {
        self.set_uniform(name, [x, y]);
    }

    pub fn set_uniform_3f(&mut self, name: &str, x: f32, y: f32, z: f32) {
        self.set_uniform(name, [x, y, z]);
    }

    pub fn set_uniform_4f(&mut self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        self.set_uniform(name, [x, y, z, w]);
    }

    /// Reads back the first `N` components of a float uniform.
    pub fn uniform_f32s<const N: usize>(&mut self, name: &str) -> Option<[f32; N]> {
        let location = self.uniform_location(name)?;
        // GetUniformfv writes every component, up to a mat4
        let mut values = [0.0f32; MAX_UNIFORM_COMPONENTS];
        unsafe {
            gl::GetUniformfv(self.id, location, values.as_mut_ptr());
        }

        let mut out = [0.0f32; N];
        let n = N.min(MAX_UNIFORM_COMPONENTS);
        out[..n].copy_from_slice(&values[..n]);
        Some(out)
    }

    pub fn uniform_i32(&mut self, name: &str) -> Option<i32> {
        let location = self.uniform_location(name)?;
        let mut value = [0 as GLint; MAX_UNIFORM_COMPONENTS];
        unsafe {
            gl::GetUniformiv(self.id, location, value.as_mut_ptr());
        }
        Some(value[0])
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.id)
            .field("cached_uniforms", &self.uniforms.len())
            .finish()
    }
}

/// Component count of a `mat4`, the largest GL 3.3 uniform.
const MAX_UNIFORM_COMPONENTS: usize = 16;

fn check_stage_kinds(vertex: &ShaderSource, fragment: &ShaderSource) -> Result<(), ShaderError> {
    for (source, expected) in [(vertex, ShaderKind::Vertex), (fragment, ShaderKind::Fragment)] {
        if source.kind() != expected {
            return Err(ShaderError::StageMismatch {
                expected,
                found: source.kind(),
            });
        }
    }
    Ok(())
}

fn info_log_buffer(len: GLint) -> Vec<u8> {
    vec![0u8; len.max(1) as usize]
}

/// Driver logs come back nul-terminated and sometimes with trailing newlines.
fn info_log_to_string(mut buffer: Vec<u8>) -> String {
    if let Some(end) = buffer.iter().position(|&b| b == 0) {
        buffer.truncate(end);
    }
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

use gl::types::GLint;
use glam::{Vec2, Vec3, Vec4};

/// A value that can be pushed to a scalar or vector uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl UniformValue {
    /// Writes the value into `location` of the currently bound program.
    pub(crate) fn upload(self, location: GLint) {
        unsafe {
            match self {
                Self::Int(v) => gl::Uniform1i(location, v),
                Self::Float(v) => gl::Uniform1f(location, v),
                Self::Vec2([x, y]) => gl::Uniform2f(location, x, y),
                Self::Vec3([x, y, z]) => gl::Uniform3f(location, x, y, z),
                Self::Vec4([x, y, z, w]) => gl::Uniform4f(location, x, y, z, w),
            }
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        Self::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        Self::Vec4(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v.to_array())
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v.to_array())
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v.to_array())
    }
}

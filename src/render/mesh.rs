use crate::render::context::GlContext;
use crate::utils::error::MeshError;
use gl::types::*;
use std::mem;
use std::ptr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: GLuint,
    pub components: usize,
    /// Offset into the vertex, in floats.
    pub offset: usize,
}

/// Interleaved `f32` vertex attributes, tightly packed in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    floats_per_vertex: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute. Component counts outside `1..=4` are rejected
    /// when the layout is used.
    pub fn with_attribute(mut self, location: GLuint, components: usize) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            components,
            offset: self.floats_per_vertex,
        });
        self.floats_per_vertex += components;
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.floats_per_vertex
    }

    /// Stride in bytes.
    pub fn stride(&self) -> usize {
        self.floats_per_vertex * mem::size_of::<f32>()
    }

    /// Number of whole vertices in `float_len` floats.
    pub fn vertex_count(&self, float_len: usize) -> Result<usize, MeshError> {
        if self.attributes.is_empty() {
            return Err(MeshError::NoAttributes);
        }
        if let Some(bad) = self
            .attributes
            .iter()
            .find(|a| !(1..=4).contains(&a.components))
        {
            return Err(MeshError::InvalidComponents {
                location: bad.location,
                components: bad.components,
            });
        }
        if float_len == 0 {
            return Err(MeshError::Empty);
        }
        if float_len % self.floats_per_vertex != 0 {
            return Err(MeshError::Misaligned {
                len: float_len,
                stride: self.floats_per_vertex,
            });
        }
        Ok(float_len / self.floats_per_vertex)
    }
}

pub fn validate_indices(indices: &[u32], vertex_count: usize) -> Result<(), MeshError> {
    if indices.is_empty() {
        return Err(MeshError::Empty);
    }
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Vertex array with its buffers, drawn as triangles.
pub struct Mesh {
    _gl: GlContext,
    vao: GLuint,
    vbo: GLuint,
    ebo: Option<GLuint>,
    vertex_count: usize,
    index_count: usize,
}

impl Mesh {
    pub fn new(gl: &GlContext, vertices: &[f32], layout: &VertexLayout) -> Result<Self, MeshError> {
        let vertex_count = layout.vertex_count(vertices.len())?;
        Self::upload(gl, vertices, None, vertex_count, layout)
    }

    pub fn with_indices(
        gl: &GlContext,
        vertices: &[f32],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> Result<Self, MeshError> {
        let vertex_count = layout.vertex_count(vertices.len())?;
        validate_indices(indices, vertex_count)?;
        Self::upload(gl, vertices, Some(indices), vertex_count, layout)
    }

    fn upload(
        gl: &GlContext,
        vertices: &[f32],
        indices: Option<&[u32]>,
        vertex_count: usize,
        layout: &VertexLayout,
    ) -> Result<Self, MeshError> {
        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
        }
        if vao == 0 || vbo == 0 {
            unsafe {
                gl::DeleteVertexArrays(1, &vao);
                gl::DeleteBuffers(1, &vbo);
            }
            return Err(MeshError::ObjectCreation("vertex array"));
        }

        let mut mesh = Mesh {
            _gl: gl.clone(),
            vao,
            vbo,
            ebo: None,
            vertex_count,
            index_count: 0,
        };

        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        unsafe {
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            for attribute in layout.attributes() {
                gl::VertexAttribPointer(
                    attribute.location,
                    attribute.components as GLint,
                    gl::FLOAT,
                    gl::FALSE,
                    layout.stride() as GLsizei,
                    (attribute.offset * mem::size_of::<f32>()) as *const _,
                );
                gl::EnableVertexAttribArray(attribute.location);
            }
        }

        if let Some(indices) = indices {
            let mut ebo = 0;
            unsafe {
                gl::GenBuffers(1, &mut ebo);
            }
            if ebo == 0 {
                unsafe {
                    gl::BindVertexArray(0);
                }
                return Err(MeshError::ObjectCreation("element buffer"));
            }
            mesh.ebo = Some(ebo);
            mesh.index_count = indices.len();

            let index_bytes: &[u8] = bytemuck::cast_slice(indices);
            unsafe {
                // the element binding is recorded in the bound VAO
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    index_bytes.len() as GLsizeiptr,
                    index_bytes.as_ptr() as *const _,
                    gl::STATIC_DRAW,
                );
            }
        }

        unsafe {
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        log::debug!(
            "uploaded mesh vao={} vertices={} indices={}",
            vao,
            mesh.vertex_count,
            mesh.index_count
        );
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            if self.is_indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    self.index_count as GLsizei,
                    gl::UNSIGNED_INT,
                    ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count as GLsizei);
            }
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, &ebo);
            }
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

//! The programmable raster API the renderer is written against.
//!
//! Everything above this module talks to `RasterApi` only. The production
//! implementation is `glow::Context`; tests use a command recorder.

use std::fmt;

use glam::{Mat4, Vec3, Vec4};
use penumbra_core::TextureLayout;

use crate::mesh::Vertex;

pub mod glow_backend;
#[cfg(test)]
pub(crate) mod recording;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A texture unit index, i.e. `TEXTURE0 + n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    /// Procedural patterns are uploaded here once.
    pub const PATTERN_UPLOAD: Self = Self(10);
    /// Patterns are rebound at `PATTERN_BASE + i` for every scene pass.
    pub const PATTERN_BASE: Self = Self(19);
    pub const FILTER_OTHER: Self = Self(29);
    pub const FILTER_SOURCE: Self = Self(30);
    /// Active while render targets that are never sampled in place get allocated.
    pub const SCRATCH: Self = Self(31);

    pub fn offset(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        Self::Int(v as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v.to_array())
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        Self::Vec4(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v.to_array())
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

/// Float texture storage. Always linear filtered and clamped to edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub layout: TextureLayout,
    pub mipmapped: bool,
}

pub trait RasterApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug + PartialEq;
    type Texture: Copy + fmt::Debug + PartialEq;
    type Framebuffer: Copy + fmt::Debug + PartialEq;
    type UniformLocation: Clone + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;

    /// Turns on float colour attachments where they are an extension.
    /// Returns false when the driver cannot render to float targets.
    fn enable_float_render_targets(&self) -> bool;

    /// `Err` carries the driver's info log.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    /// `attributes` are bound to their locations before linking.
    /// `Err` carries the driver's info log; the program is already freed.
    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
        attributes: &[(u32, &str)],
    ) -> Result<Self::Program, String>;
    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn use_program(&self, program: Self::Program);
    /// Applies to the program selected by the last `use_program`.
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue);

    /// Leaves the new texture bound at `unit`.
    fn create_texture(
        &self,
        unit: TextureUnit,
        desc: &TextureDesc,
        pixels: Option<&[f32]>,
    ) -> Result<Self::Texture, String>;
    /// Attaches `color` and a fresh 16-bit depth renderbuffer of the same size.
    fn create_framebuffer(
        &self,
        color: Self::Texture,
        width: u32,
        height: u32,
    ) -> Result<Self::Framebuffer, String>;
    /// `None` selects the visible surface.
    fn bind_framebuffer(&self, framebuffer: Option<Self::Framebuffer>);
    fn bind_texture(&self, unit: TextureUnit, texture: Self::Texture);

    /// Clears colour and depth of the bound framebuffer.
    fn clear(&self);
    fn set_depth_test(&self, enabled: bool);
    /// `None` disables culling.
    fn set_face_culling(&self, face: Option<CullFace>);
    fn viewport(&self, width: u32, height: u32);

    fn upload_vertices(&self, vertices: &[Vertex]) -> Result<Self::VertexArray, String>;
    fn draw_triangles(&self, vertex_array: Self::VertexArray, vertex_count: u32);
}

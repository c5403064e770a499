use std::mem;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use penumbra_core::Orientation;

use crate::error::RenderError;
use crate::programs::{AttributeSlot, RenderContext, UniformSlot};
use crate::raster::RasterApi;

// #[repr(C)] keeps the field order the attribute offsets below rely on.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4], // w = 1
    pub normal: [f32; 4],   // w = 0
    pub color: [f32; 4],
    pub angle: [f32; 4],
}

const STREAM: usize = mem::size_of::<[f32; 4]>();

/// Byte offset of every attribute inside `Vertex`.
pub const VERTEX_STREAMS: [(AttributeSlot, usize); 4] = [
    (AttributeSlot::Position, 0),
    (AttributeSlot::Normal, STREAM),
    (AttributeSlot::Color, STREAM * 2),
    (AttributeSlot::Angle, STREAM * 3),
];

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            normal: normal.extend(0.0).to_array(),
            color,
            angle: [0.0; 4],
        }
    }
}

/// An uploaded triangle list.
pub struct Mesh<A: RasterApi> {
    pub vertex_array: A::VertexArray,
    pub vertex_count: u32,
}

// Derives would demand `A: Clone`.
impl<A: RasterApi> Clone for Mesh<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: RasterApi> Copy for Mesh<A> {}

impl<A: RasterApi> Mesh<A> {
    pub fn upload(api: &A, vertices: &[Vertex]) -> Result<Self, RenderError> {
        let vertex_array = api.upload_vertices(vertices).map_err(|reason| {
            log::error!("vertex upload failed: {reason}");
            RenderError::Allocation {
                what: "vertex array",
                reason,
            }
        })?;
        Ok(Self {
            vertex_array,
            vertex_count: vertices.len() as u32,
        })
    }

    /// Two triangles covering clip space, facing +z.
    pub fn full_screen_quad(api: &A) -> Result<Self, RenderError> {
        Self::upload(api, &full_screen_quad_vertices())
    }
}

fn full_screen_quad_vertices() -> [Vertex; 6] {
    let corner = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, [1.0; 4]);
    [
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    ]
}

/// Anything a camera can draw.
pub trait SceneObject<A: RasterApi> {
    /// Uploads per-object uniforms and draws. The context already carries
    /// every per-pass uniform.
    fn render(&self, ctx: &mut RenderContext<'_, A>);

    /// Objects that must not cast shadows (skyboxes, glows, ...).
    fn excluded_from_light_passes(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Material {
    /// Output vertex colour unlit.
    pub render_direct: bool,
    /// Index into the uploaded procedural patterns.
    pub pattern: Option<u32>,
}

/// A mesh placed in the world.
pub struct MeshInstance<A: RasterApi> {
    pub mesh: Mesh<A>,
    pub position: Vec3,
    pub orientation: Orientation,
    pub material: Material,
    pub exclude_from_light_passes: bool,
}

impl<A: RasterApi> MeshInstance<A> {
    pub fn new(mesh: Mesh<A>, position: Vec3) -> Self {
        Self {
            mesh,
            position,
            orientation: Orientation::default(),
            material: Material::default(),
            exclude_from_light_passes: false,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn rotation(&self) -> Mat4 {
        self.orientation.compute_matrix()
    }
}

impl<A: RasterApi> SceneObject<A> for MeshInstance<A> {
    fn render(&self, ctx: &mut RenderContext<'_, A>) {
        // The vertex stage subtracts this offset.
        ctx.set(UniformSlot::WorldPosition, (-self.position).extend(0.0));
        ctx.set(UniformSlot::WorldRotation, self.rotation());
        ctx.set(UniformSlot::RenderDirect, self.material.render_direct);
        ctx.set(UniformSlot::RenderTexture, self.material.pattern.is_some());
        ctx.set(UniformSlot::TextureMux, self.material.pattern.unwrap_or(0) as i32);
        ctx.draw(&self.mesh);
    }

    fn excluded_from_light_passes(&self) -> bool {
        self.exclude_from_light_passes
    }
}

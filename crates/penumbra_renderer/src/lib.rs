//! Multi-pass forward renderer: shadow-casting lights with blurred moment
//! shadow maps, a main view, and a bloom chain, all written against the
//! `RasterApi` seam.

pub mod camera;
pub mod error;
pub mod filter;
pub mod kernel;
pub mod light;
pub mod mesh;
pub mod post_process;
pub mod programs;
pub mod raster;
pub mod render;
pub mod texture;

#[cfg(test)]
mod test_support;

pub use camera::{Camera, CameraRole, FrameGlobals, LightSlot, PassReport};
pub use error::{RenderError, ShaderError};
pub use filter::{Filter, FilterOutput};
pub use light::{Light, LightDesc, LightId};
pub use mesh::{Material, Mesh, MeshInstance, SceneObject, Vertex};
pub use post_process::ScreenComposer;
pub use programs::{BindingTable, RenderContext, ShaderProgram, UniformSlot};
pub use raster::{RasterApi, TextureUnit};
pub use render::{FrameInputs, FrameReport, Graphics, setup_graphics};

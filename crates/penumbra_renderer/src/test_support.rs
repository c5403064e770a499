//! Fixtures shared by the renderer's unit tests.

use glam::Vec3;

use crate::mesh::{Mesh, MeshInstance};
use crate::programs::ShaderProgram;
use crate::programs::scene_program::{VERTEX_SHADER, scene_fragment_source, shadow_fragment_source};
use crate::raster::recording::RecordingApi;

pub fn scene_program(api: &RecordingApi) -> ShaderProgram<RecordingApi> {
    ShaderProgram::build(api, "scene", VERTEX_SHADER, &scene_fragment_source()).unwrap()
}

pub fn shadow_program(api: &RecordingApi) -> ShaderProgram<RecordingApi> {
    ShaderProgram::build(api, "shadow", VERTEX_SHADER, &shadow_fragment_source()).unwrap()
}

pub fn quad_instance(api: &RecordingApi) -> MeshInstance<RecordingApi> {
    MeshInstance::new(Mesh::full_screen_quad(api).unwrap(), Vec3::ZERO)
}

use thiserror::Error;

use crate::raster::ShaderStage;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage:?} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
    #[error("texture '{name}' has {actual} floats, expected {expected}")]
    TexturePayload {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("at most {max} lights are supported")]
    TooManyLights { max: usize },
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

//! Engine-agnostic pieces shared by the renderer: projection math, the frame
//! clock that drives the lighting presets, settings, logging and texture payloads.

pub mod assets;
pub mod camera;
pub mod config;
pub mod lighting;
pub mod logging;
pub mod time;
pub mod transform;

pub use assets::{TextureData, TextureLayout};
pub use camera::Projection;
pub use config::{ConfigError, RenderSettings};
pub use lighting::LightingPreset;
pub use logging::{LoggingConfig, init_logging};
pub use time::FlashbackClock;
pub use transform::Orientation;

use penumbra_core::{TextureData, TextureLayout};

use crate::error::RenderError;
use crate::raster::{RasterApi, TextureDesc, TextureUnit};

/// A float colour texture with a depth renderbuffer, drawable and sampleable.
pub struct RenderTarget<A: RasterApi> {
    pub texture: A::Texture,
    pub framebuffer: A::Framebuffer,
    pub width: u32,
    pub height: u32,
    pub layout: TextureLayout,
}

impl<A: RasterApi> RenderTarget<A> {
    /// Allocates the colour texture at `unit`, where it stays bound.
    pub fn create(
        api: &A,
        unit: TextureUnit,
        layout: TextureLayout,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let desc = TextureDesc {
            width,
            height,
            layout,
            mipmapped: false,
        };
        let texture = api
            .create_texture(unit, &desc, None)
            .map_err(|reason| allocation_failed("render target texture", reason))?;
        let framebuffer = api
            .create_framebuffer(texture, width, height)
            .map_err(|reason| allocation_failed("framebuffer", reason))?;

        log::debug!("render target {width}x{height} {layout:?} at unit {}", unit.0);
        Ok(Self {
            texture,
            framebuffer,
            width,
            height,
            layout,
        })
    }
}

fn allocation_failed(what: &'static str, reason: String) -> RenderError {
    log::error!("could not allocate {what}: {reason}");
    RenderError::Allocation { what, reason }
}

/// Uploads a procedural pattern at `TextureUnit::PATTERN_UPLOAD` with mipmaps.
/// Patterns are rebound to their own units before each scene pass.
pub fn upload_pattern<A: RasterApi>(api: &A, data: &TextureData) -> Result<A::Texture, RenderError> {
    if !data.is_complete() {
        log::error!("texture '{}' payload has the wrong length", data.name);
        return Err(RenderError::TexturePayload {
            name: data.name.clone(),
            expected: data.expected_len(),
            actual: data.pixels.len(),
        });
    }
    let desc = TextureDesc {
        width: data.width,
        height: data.height,
        layout: data.layout,
        mipmapped: true,
    };
    api.create_texture(TextureUnit::PATTERN_UPLOAD, &desc, Some(&data.pixels))
        .map_err(|reason| allocation_failed("pattern texture", reason))
}

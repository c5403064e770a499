use glam::{Mat4, Vec4};
use penumbra_core::TextureLayout;

use crate::error::RenderError;
use crate::mesh::Mesh;
use crate::programs::filter_program::filter_fragment_source;
use crate::programs::scene_program::VERTEX_SHADER;
use crate::programs::slots::CAMERA_SLOT;
use crate::programs::{RenderContext, ShaderProgram, UniformSlot};
use crate::raster::{RasterApi, TextureUnit};
use crate::texture::RenderTarget;

/// Where a filter writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOutput {
    Offscreen,
    Screen,
}

/// One full-screen pass: its own program, its own target and a quad.
///
/// `post_filter` holds no per-frame state, so the same inputs and tint
/// always issue the same commands.
pub struct Filter<A: RasterApi> {
    label: String,
    program: Option<ShaderProgram<A>>,
    target: Option<RenderTarget<A>>,
    width: u32,
    height: u32,
    quad: Mesh<A>,
}

impl<A: RasterApi> Filter<A> {
    /// `code` is the body of the fragment `main`. A program the driver
    /// rejects leaves the filter inert rather than failing setup.
    pub fn new(
        api: &A,
        label: &str,
        code: &str,
        width: u32,
        height: u32,
        layout: TextureLayout,
        output: FilterOutput,
    ) -> Result<Self, RenderError> {
        let (width, height) = (width.max(1), height.max(1));
        let fragment = filter_fragment_source(code, width, height);
        let program = ShaderProgram::build_or_log(api, label, VERTEX_SHADER, &fragment);
        let target = match output {
            FilterOutput::Offscreen => Some(RenderTarget::create(
                api,
                TextureUnit::SCRATCH,
                layout,
                width,
                height,
            )?),
            FilterOutput::Screen => None,
        };
        Ok(Self {
            label: label.to_string(),
            program,
            target,
            width,
            height,
            quad: Mesh::full_screen_quad(api)?,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_defined(&self) -> bool {
        self.program.is_some()
    }

    /// The texture this filter writes, `None` when it draws to the screen.
    pub fn texture(&self) -> Option<A::Texture> {
        self.target.as_ref().map(|t| t.texture)
    }

    /// Renders the quad with `source` as input 0 and `other` as input 1,
    /// returning the texture just written.
    pub fn post_filter(
        &self,
        api: &A,
        source: Option<A::Texture>,
        other: Option<A::Texture>,
        tint: [f32; 4],
    ) -> Option<A::Texture> {
        let Some(program) = &self.program else {
            return self.texture();
        };

        api.bind_framebuffer(self.target.as_ref().map(|t| t.framebuffer));
        let mut ctx = RenderContext::bind(api, program);
        ctx.set(UniformSlot::ShiftColor, tint);
        if let Some(source) = source {
            ctx.set_sampler(0, TextureUnit::FILTER_SOURCE, source);
        }
        if let Some(other) = other {
            ctx.set_sampler(1, TextureUnit::FILTER_OTHER, other);
        }
        // The quad is already in clip space.
        ctx.set(UniformSlot::WorldPosition, Vec4::ZERO);
        ctx.set(UniformSlot::WorldRotation, Mat4::IDENTITY);
        ctx.set(UniformSlot::LightMatrix(CAMERA_SLOT), Mat4::IDENTITY);

        api.clear();
        api.set_face_culling(None);
        api.viewport(self.width, self.height);
        ctx.draw(&self.quad);

        if !ctx.missed_slots().is_empty() {
            log::trace!("filter '{}' skipped {:?}", self.label, ctx.missed_slots());
        }
        self.texture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::filter_program::{COMPOSITE, PASSTHROUGH};
    use crate::raster::UniformValue;
    use crate::raster::recording::{Command, RecordingApi};

    fn offscreen(api: &RecordingApi, code: &str) -> Filter<RecordingApi> {
        Filter::new(api, "test", code, 64, 32, TextureLayout::Rgba, FilterOutput::Offscreen).unwrap()
    }

    #[test]
    fn post_filter_is_deterministic() {
        let api = RecordingApi::new();
        let filter = offscreen(&api, COMPOSITE);
        api.take_commands();

        let first_out = filter.post_filter(&api, Some(7), Some(8), [0.1, 0.2, 0.3, 1.0]);
        let first = api.take_commands();
        let second_out = filter.post_filter(&api, Some(7), Some(8), [0.1, 0.2, 0.3, 1.0]);
        let second = api.take_commands();

        assert_eq!(first, second);
        assert_eq!(first_out, second_out);
        assert_eq!(first_out, filter.texture());
    }

    #[test]
    fn inputs_bind_to_fixed_units_and_samplers() {
        let api = RecordingApi::new();
        let filter = offscreen(&api, COMPOSITE);
        api.take_commands();

        filter.post_filter(&api, Some(7), Some(8), [0.0, 0.0, 0.0, 1.0]);
        let commands = api.take_commands();
        assert!(commands.contains(&Command::BindTexture { unit: TextureUnit::FILTER_SOURCE, texture: 7 }));
        assert!(commands.contains(&Command::BindTexture { unit: TextureUnit::FILTER_OTHER, texture: 8 }));

        let writes = api.uniform_writes(&commands);
        assert!(writes.contains(&("u_texture[0]".to_string(), UniformValue::Int(30))));
        assert!(writes.contains(&("u_texture[1]".to_string(), UniformValue::Int(29))));
        assert!(writes.contains(&("u_shift_color".to_string(), UniformValue::Vec4([0.0, 0.0, 0.0, 1.0]))));
        assert!(writes.contains(&("u_light_matrix[4]".to_string(), UniformValue::Mat4(Mat4::IDENTITY))));
    }

    #[test]
    fn pass_order_targets_own_framebuffer_first() {
        let api = RecordingApi::new();
        let filter = offscreen(&api, PASSTHROUGH);
        let framebuffer = filter.target.as_ref().map(|t| t.framebuffer);
        api.take_commands();

        filter.post_filter(&api, Some(3), None, [0.0; 4]);
        let commands = api.take_commands();
        assert_eq!(commands[0], Command::BindFramebuffer(framebuffer));
        assert!(matches!(commands[1], Command::UseProgram(_)));
        let tail = &commands[commands.len() - 4..];
        assert_eq!(tail[0], Command::Clear);
        assert_eq!(tail[1], Command::Culling(None));
        assert_eq!(tail[2], Command::Viewport { width: 64, height: 32 });
        assert!(matches!(tail[3], Command::Draw { vertex_count: 6, .. }));
        assert!(!commands.iter().any(|c| matches!(c, Command::BindTexture { unit: TextureUnit::FILTER_OTHER, .. })));
    }

    #[test]
    fn screen_filter_targets_visible_surface() {
        let api = RecordingApi::new();
        let filter = Filter::new(&api, "out", PASSTHROUGH, 64, 32, TextureLayout::Rgba, FilterOutput::Screen).unwrap();
        assert!(filter.texture().is_none());
        api.take_commands();

        assert_eq!(filter.post_filter(&api, Some(3), None, [0.0; 4]), None);
        assert_eq!(api.take_commands()[0], Command::BindFramebuffer(None));
    }

    #[test]
    fn rejected_program_draws_nothing() {
        let api = RecordingApi::new();
        api.reject_sources_containing("get_tex()");
        let filter = offscreen(&api, PASSTHROUGH);
        assert!(!filter.is_defined());
        api.take_commands();

        let out = filter.post_filter(&api, Some(3), None, [0.0; 4]);
        assert_eq!(out, filter.texture());
        assert!(api.take_commands().is_empty());
    }

    #[test]
    fn zero_sized_filters_are_clamped() {
        let api = RecordingApi::new();
        let filter = Filter::new(&api, "tiny", PASSTHROUGH, 0, 0, TextureLayout::Rg, FilterOutput::Offscreen).unwrap();
        assert_eq!(filter.dimensions(), (1, 1));
    }
}

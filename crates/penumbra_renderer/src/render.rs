//! Setup and the per-frame pass order: shadow maps, main view, post-processing.

use glam::Vec3;
use penumbra_core::{FlashbackClock, LightingPreset, Orientation, RenderSettings, TextureData};

use crate::camera::{Camera, CameraRole, FrameGlobals, LightSlot};
use crate::error::RenderError;
use crate::light::{Light, LightDesc, LightId};
use crate::mesh::SceneObject;
use crate::post_process::ScreenComposer;
use crate::programs::scene_program::{VERTEX_SHADER, scene_fragment_source, shadow_fragment_source};
use crate::programs::slots::{MAX_PATTERNS, MAX_SHADOW_LIGHTS};
use crate::programs::{ShaderProgram, UniformSlot};
use crate::raster::{RasterApi, TextureUnit};
use crate::texture::upload_pattern;

const MAIN_CAMERA_FOV: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInputs {
    pub flashback: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport<T> {
    pub preset: LightingPreset,
    pub shadow_passes: usize,
    pub objects_drawn: usize,
    /// Uniform slots the scene or shadow program could not resolve.
    pub missed: Vec<UniformSlot>,
    /// Last texture written; `None` when the frame ended on the screen.
    pub output: Option<T>,
}

pub struct Graphics<A: RasterApi> {
    settings: RenderSettings,
    scene_program: Option<ShaderProgram<A>>,
    shadow_program: Option<ShaderProgram<A>>,
    patterns: Vec<A::Texture>,
    lights: Vec<Light<A>>,
    camera: Camera<A>,
    composer: ScreenComposer<A>,
    clock: FlashbackClock,
    float_targets: bool,
}

/// Builds programs, uploads `patterns`, and creates the main camera and
/// the post-processing chain for a `width × height` screen.
pub fn setup_graphics<A: RasterApi>(
    api: &A,
    settings: &RenderSettings,
    width: u32,
    height: u32,
    patterns: &[TextureData],
) -> Result<Graphics<A>, RenderError> {
    let float_targets = api.enable_float_render_targets();
    if !float_targets {
        log::warn!("continuing without float render targets");
    }

    let scene_program = ShaderProgram::build_or_log(api, "scene", VERTEX_SHADER, &scene_fragment_source());
    let shadow_program =
        ShaderProgram::build_or_log(api, "shadow", VERTEX_SHADER, &shadow_fragment_source());

    if patterns.len() > MAX_PATTERNS {
        log::warn!("{} patterns supplied, only the first {MAX_PATTERNS} are sampled", patterns.len());
    }
    let patterns = patterns
        .iter()
        .take(MAX_PATTERNS)
        .map(|data| upload_pattern(api, data))
        .collect::<Result<Vec<_>, _>>()?;

    let mut camera = Camera::new(
        api,
        Vec3::ZERO,
        (width, height),
        MAIN_CAMERA_FOV,
        CameraRole::Viewer,
        TextureUnit::SCRATCH,
        Orientation::default(),
    )?;
    let composer = ScreenComposer::new(api, width, height, settings, &mut camera)?;

    log::info!(
        "graphics ready: {width}x{height}, quality tier {}, {} patterns",
        settings.quality_tier,
        patterns.len()
    );
    Ok(Graphics {
        settings: settings.clone(),
        scene_program,
        shadow_program,
        patterns,
        lights: Vec::new(),
        camera,
        composer,
        clock: FlashbackClock::new(),
        float_targets,
    })
}

impl<A: RasterApi> Graphics<A> {
    /// Replaces the flashback clock, e.g. to resume a strobe mid-cycle.
    pub fn with_clock(mut self, clock: FlashbackClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> FlashbackClock {
        self.clock
    }

    /// Whether the driver accepted float colour attachments at setup.
    pub fn has_float_targets(&self) -> bool {
        self.float_targets
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera<A> {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera<A> {
        &mut self.camera
    }

    pub fn lights(&self) -> &[Light<A>] {
        &self.lights
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light<A>> {
        self.lights.get_mut(id.0 as usize)
    }

    pub fn scene_program(&self) -> Option<&ShaderProgram<A>> {
        self.scene_program.as_ref()
    }

    pub fn shadow_program(&self) -> Option<&ShaderProgram<A>> {
        self.shadow_program.as_ref()
    }

    pub fn composer(&self) -> &ScreenComposer<A> {
        &self.composer
    }

    pub fn patterns(&self) -> &[A::Texture] {
        &self.patterns
    }

    /// Ids are handed out in creation order, starting at 0.
    pub fn add_light(&mut self, api: &A, desc: LightDesc) -> Result<LightId, RenderError> {
        if self.lights.len() >= MAX_SHADOW_LIGHTS {
            return Err(RenderError::TooManyLights { max: MAX_SHADOW_LIGHTS });
        }
        let id = LightId(self.lights.len() as u32);
        let light = Light::new(api, id, desc, self.settings.shadow_map_size())?;
        self.lights.push(light);
        Ok(id)
    }

    fn light_slots(&self) -> Vec<LightSlot<A::Texture>> {
        self.lights.iter().map(Light::slot).collect()
    }

    /// Ticks the flashback clock, then renders every shadow map, the main
    /// view and the post-processing chain, in that order.
    pub fn render_frame(
        &mut self,
        api: &A,
        inputs: FrameInputs,
        scene: &[&dyn SceneObject<A>],
    ) -> FrameReport<A::Texture> {
        let preset = self.clock.advance(inputs.flashback);
        for (light, brightness) in self.lights.iter_mut().zip(preset.light_brightness()) {
            light.brightness = brightness;
        }

        let mut missed = Vec::new();
        let mut shadow_passes = 0;
        for i in 0..self.lights.len() {
            let slots = self.light_slots();
            let globals = FrameGlobals {
                patterns: &self.patterns,
                preset,
                cell_shading: self.settings.cell_shading,
                neon_color: self.settings.neon_color,
                screen_tint: self.settings.screen_tint,
            };
            let mut report = self.lights[i].compute_shadowmap(
                api,
                self.shadow_program.as_ref(),
                &slots,
                &globals,
                scene,
            );
            missed.append(&mut report.missed);
            shadow_passes += 1;
        }

        let slots = self.light_slots();
        let globals = FrameGlobals {
            patterns: &self.patterns,
            preset,
            cell_shading: self.settings.cell_shading,
            neon_color: self.settings.neon_color,
            screen_tint: self.settings.screen_tint,
        };
        let mut main = self
            .camera
            .draw_scene(api, self.scene_program.as_ref(), &slots, &globals, scene);
        missed.append(&mut main.missed);

        let output = self
            .composer
            .render(api, self.camera.texture(), self.settings.screen_tint);

        if !missed.is_empty() {
            log::trace!("frame skipped {} uniform uploads", missed.len());
        }
        FrameReport {
            preset,
            shadow_passes,
            objects_drawn: main.objects_drawn,
            missed,
            output,
        }
    }
}

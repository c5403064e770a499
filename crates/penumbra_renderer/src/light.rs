use glam::Vec3;
use penumbra_core::{Orientation, TextureLayout};

use crate::camera::{Camera, CameraRole, FrameGlobals, LightSlot, PassReport};
use crate::error::RenderError;
use crate::filter::{Filter, FilterOutput};
use crate::kernel::gaussian_blur_code;
use crate::mesh::SceneObject;
use crate::programs::{RenderContext, ShaderProgram, UniformSlot};
use crate::raster::{RasterApi, TextureUnit};

/// Lights are numbered in creation order; the id doubles as the texture
/// unit the light's shadow map is sampled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub u32);

impl LightId {
    pub fn shadow_unit(self) -> TextureUnit {
        TextureUnit(self.0)
    }
}

pub const DEFAULT_BRIGHTNESS: f32 = 2.0;
const KEY_LIGHT_FOV: f32 = 1.0;
const FILL_LIGHT_FOV: f32 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDesc {
    pub position: Vec3,
    pub orientation: Orientation,
    pub casts_shadow: bool,
}

pub struct Light<A: RasterApi> {
    id: LightId,
    pub position: Vec3,
    pub brightness: f32,
    pub casts_shadow: bool,
    shadow_camera: Camera<A>,
    blur: Filter<A>,
}

impl<A: RasterApi> Light<A> {
    /// The first light is a narrow key light, later ones are wide fills.
    /// The blur runs at half the shadow map resolution.
    pub fn new(api: &A, id: LightId, desc: LightDesc, shadow_map_size: u32) -> Result<Self, RenderError> {
        let fov = if id.0 == 0 { KEY_LIGHT_FOV } else { FILL_LIGHT_FOV };
        let shadow_camera = Camera::new(
            api,
            desc.position,
            (shadow_map_size, shadow_map_size),
            fov,
            CameraRole::ShadowSource(id),
            id.shadow_unit(),
            desc.orientation,
        )?;
        let blur = Filter::new(
            api,
            &format!("light {} blur", id.0),
            &gaussian_blur_code(),
            shadow_map_size / 2,
            shadow_map_size / 2,
            TextureLayout::Rg,
            FilterOutput::Offscreen,
        )?;

        log::info!("light {} ready, {shadow_map_size}px shadow map", id.0);
        Ok(Self {
            id,
            position: desc.position,
            brightness: DEFAULT_BRIGHTNESS,
            casts_shadow: desc.casts_shadow,
            shadow_camera,
            blur,
        })
    }

    pub fn id(&self) -> LightId {
        self.id
    }

    pub fn shadow_camera(&self) -> &Camera<A> {
        &self.shadow_camera
    }

    pub fn shadow_camera_mut(&mut self) -> &mut Camera<A> {
        &mut self.shadow_camera
    }

    /// Unblurred distance moments, written by the shadow pass.
    pub fn raw_shadow_texture(&self) -> Option<A::Texture> {
        self.shadow_camera.texture()
    }

    /// The blurred map other cameras sample.
    pub fn shadow_texture(&self) -> Option<A::Texture> {
        self.blur.texture()
    }

    /// Matrix and position follow the light's current position even before
    /// the next shadow pass has synced the camera.
    pub fn slot(&self) -> LightSlot<A::Texture> {
        LightSlot {
            position: self.position,
            matrix: self.shadow_camera.view_projection_from(self.position),
            casts_shadow: self.casts_shadow,
            brightness: self.brightness,
            shadow_unit: self.id.shadow_unit(),
            shadow_texture: self.shadow_texture(),
        }
    }

    /// Renders distance moments from the light's point of view and blurs
    /// them into the texture returned by `shadow_texture`.
    pub fn compute_shadowmap(
        &mut self,
        api: &A,
        program: Option<&ShaderProgram<A>>,
        lights: &[LightSlot<A::Texture>],
        globals: &FrameGlobals<'_, A::Texture>,
        scene: &[&dyn SceneObject<A>],
    ) -> PassReport {
        self.shadow_camera.position = self.position;
        let Some(program) = program else {
            return PassReport::default();
        };

        let mut ctx = RenderContext::bind(api, program);
        // Our unit must not hold the blur target while the blur renders.
        if let Some(raw) = self.raw_shadow_texture() {
            api.bind_texture(self.id.shadow_unit(), raw);
        }
        ctx.set(UniformSlot::WhichShadowLight, self.id.0 as i32);
        let mut missed = ctx.into_missed_slots();

        let mut report = self
            .shadow_camera
            .draw_scene(api, Some(program), lights, globals, scene);
        self.blur
            .post_filter(api, self.raw_shadow_texture(), None, globals.screen_tint);

        missed.append(&mut report.missed);
        report.missed = missed;
        report
    }
}

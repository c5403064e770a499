//! Cameras render the scene into their own target: the main view, or the
//! distance map of a shadow-casting light.

use glam::{Mat4, Vec3};
use penumbra_core::{LightingPreset, Orientation, Projection, TextureLayout};

use crate::error::RenderError;
use crate::light::LightId;
use crate::mesh::SceneObject;
use crate::programs::slots::{CAMERA_SLOT, FIRST_PATTERN_SAMPLER, MAX_PATTERNS, MAX_SHADOW_LIGHTS};
use crate::programs::{RenderContext, ShaderProgram, UniformSlot};
use crate::raster::{CullFace, RasterApi, TextureUnit};
use crate::texture::RenderTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraRole {
    Viewer,
    ShadowSource(LightId),
}

/// Per-frame values every scene pass uploads.
#[derive(Clone, Copy, Debug)]
pub struct FrameGlobals<'a, T> {
    pub patterns: &'a [T],
    pub preset: LightingPreset,
    pub cell_shading: bool,
    pub neon_color: [f32; 3],
    pub screen_tint: [f32; 4],
}

/// What one light contributes to a scene pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSlot<T> {
    pub position: Vec3,
    pub matrix: Mat4,
    pub casts_shadow: bool,
    pub brightness: f32,
    pub shadow_unit: TextureUnit,
    /// The blurred shadow map other cameras sample.
    pub shadow_texture: Option<T>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub objects_drawn: usize,
    pub missed: Vec<UniformSlot>,
}

pub struct Camera<A: RasterApi> {
    pub position: Vec3,
    pub orientation: Orientation,
    pub cull: Option<CullFace>,
    projection: Projection,
    role: CameraRole,
    width: u32,
    height: u32,
    target: Option<RenderTarget<A>>,
}

impl<A: RasterApi> Camera<A> {
    /// Light cameras get a two-channel target for distance moments.
    pub fn new(
        api: &A,
        position: Vec3,
        (width, height): (u32, u32),
        fov: f32,
        role: CameraRole,
        unit: TextureUnit,
        orientation: Orientation,
    ) -> Result<Self, RenderError> {
        let layout = match role {
            CameraRole::Viewer => TextureLayout::Rgba,
            CameraRole::ShadowSource(_) => TextureLayout::Rg,
        };
        let target = RenderTarget::create(api, unit, layout, width, height)?;
        Ok(Self {
            position,
            orientation,
            cull: Some(CullFace::Front),
            projection: Projection::new(fov, width, height),
            role,
            width,
            height,
            target: Some(target),
        })
    }

    pub fn role(&self) -> CameraRole {
        self.role
    }

    pub fn is_light(&self) -> bool {
        matches!(self.role, CameraRole::ShadowSource(_))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draw straight to the visible surface from now on.
    pub fn redirect_to_screen(&mut self) {
        self.target = None;
    }

    pub fn texture(&self) -> Option<A::Texture> {
        self.target.as_ref().map(|t| t.texture)
    }

    pub fn fov(&self) -> f32 {
        self.projection.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.projection.fov = fov;
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.view_projection(&self.orientation, self.position)
    }

    pub fn view_projection_from(&self, position: Vec3) -> Mat4 {
        self.projection.view_projection(&self.orientation, position)
    }

    /// Renders `scene` into this camera's target with `program`.
    ///
    /// Slots 0..4 describe `lights` (missing lights are zeroed), slot 4 is
    /// this camera. Shadow maps are bound only for a viewer camera and only
    /// for lights that cast shadows.
    pub fn draw_scene(
        &self,
        api: &A,
        program: Option<&ShaderProgram<A>>,
        lights: &[LightSlot<A::Texture>],
        globals: &FrameGlobals<'_, A::Texture>,
        scene: &[&dyn SceneObject<A>],
    ) -> PassReport {
        let Some(program) = program else {
            log::debug!("{:?} camera has no program, skipping pass", self.role);
            return PassReport::default();
        };

        api.bind_framebuffer(self.target.as_ref().map(|t| t.framebuffer));
        let mut ctx = RenderContext::bind(api, program);

        for (i, pattern) in globals.patterns.iter().take(MAX_PATTERNS).enumerate() {
            let unit = TextureUnit::PATTERN_BASE.offset(i as u32);
            ctx.set_sampler(FIRST_PATTERN_SAMPLER + i, unit, *pattern);
        }

        for i in 0..MAX_SHADOW_LIGHTS {
            match lights.get(i) {
                Some(light) => {
                    ctx.set(UniformSlot::LightPosition(i), light.position.extend(1.0));
                    ctx.set(UniformSlot::LightMatrix(i), light.matrix);
                    ctx.set(UniformSlot::LightBrightness(i), light.brightness);
                    ctx.set(UniformSlot::IsLightShadow(i), light.casts_shadow);
                    if !self.is_light() && light.casts_shadow {
                        if let Some(texture) = light.shadow_texture {
                            ctx.set_sampler(i, light.shadow_unit, texture);
                        }
                    }
                }
                None => {
                    ctx.set(UniformSlot::LightPosition(i), Vec3::ZERO.extend(1.0));
                    ctx.set(UniformSlot::LightMatrix(i), Mat4::ZERO);
                    ctx.set(UniformSlot::LightBrightness(i), 0.0);
                    ctx.set(UniformSlot::IsLightShadow(i), false);
                }
            }
        }

        ctx.set(UniformSlot::LightPosition(CAMERA_SLOT), self.position.extend(1.0));
        ctx.set(UniformSlot::LightMatrix(CAMERA_SLOT), self.view_projection());
        ctx.set(UniformSlot::LightBrightness(CAMERA_SLOT), 0.0);
        ctx.set(UniformSlot::IsLightShadow(CAMERA_SLOT), false);

        ctx.set(UniformSlot::AmbientLight, globals.preset.ambient_light());
        ctx.set(UniformSlot::CellShading, globals.cell_shading);
        ctx.set(UniformSlot::NeonColor, globals.neon_color);

        api.clear();
        api.set_depth_test(true);
        api.set_face_culling(self.cull);
        api.viewport(self.width, self.height);

        let mut objects_drawn = 0;
        for object in scene {
            if self.is_light() && object.excluded_from_light_passes() {
                continue;
            }
            object.render(&mut ctx);
            objects_drawn += 1;
        }
        api.bind_framebuffer(None);

        log::debug!("{:?} pass drew {objects_drawn} objects", self.role);
        PassReport {
            objects_drawn,
            missed: ctx.into_missed_slots(),
        }
    }
}

use std::borrow::Cow;

/// Light slots in every scene pass: four lights plus the rendering camera.
pub const LIGHT_SLOTS: usize = 5;
/// Slot reserved for the camera issuing the pass.
pub const CAMERA_SLOT: usize = 4;
/// Lights whose shadow maps the main pass can sample.
pub const MAX_SHADOW_LIGHTS: usize = 4;
/// Entries of `u_texture`: shadow maps first, then procedural patterns.
pub const SAMPLER_SLOTS: usize = 9;
pub const FIRST_PATTERN_SAMPLER: usize = 4;
pub const MAX_PATTERNS: usize = SAMPLER_SLOTS - FIRST_PATTERN_SAMPLER;

/// Vertex attributes. Locations are bound before linking so one vertex
/// array works with every program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeSlot {
    Position,
    Normal,
    Color,
    Angle,
}

impl AttributeSlot {
    pub const ALL: [AttributeSlot; 4] = [Self::Position, Self::Normal, Self::Color, Self::Angle];

    pub fn location(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "a_position",
            Self::Normal => "a_normal",
            Self::Color => "a_color",
            Self::Angle => "a_angle",
        }
    }

    pub fn bindings() -> [(u32, &'static str); 4] {
        Self::ALL.map(|slot| (slot.location(), slot.name()))
    }
}

/// Every uniform the shared shader interface declares.
///
/// Draw code names uniforms through this enum; a program resolves each slot
/// to a location once, at link time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniformSlot {
    WorldPosition,
    WorldRotation,
    LightPosition(usize),
    LightMatrix(usize),
    LightBrightness(usize),
    IsLightShadow(usize),
    Texture(usize),
    AmbientLight,
    WhichShadowLight,
    ShiftColor,
    RenderDirect,
    TextureMux,
    RenderTexture,
    CellShading,
    NeonColor,
}

const LIGHT_POSITION_BASE: usize = 2;
const LIGHT_MATRIX_BASE: usize = LIGHT_POSITION_BASE + LIGHT_SLOTS;
const LIGHT_BRIGHTNESS_BASE: usize = LIGHT_MATRIX_BASE + LIGHT_SLOTS;
const IS_LIGHT_SHADOW_BASE: usize = LIGHT_BRIGHTNESS_BASE + LIGHT_SLOTS;
const TEXTURE_BASE: usize = IS_LIGHT_SHADOW_BASE + LIGHT_SLOTS;
const SCALAR_BASE: usize = TEXTURE_BASE + SAMPLER_SLOTS;

impl UniformSlot {
    pub const COUNT: usize = SCALAR_BASE + 8;

    /// Dense index into a program's slot table. `None` for out-of-range
    /// array elements.
    pub fn index(self) -> Option<usize> {
        let element = |base: usize, i: usize, len: usize| (i < len).then_some(base + i);
        match self {
            Self::WorldPosition => Some(0),
            Self::WorldRotation => Some(1),
            Self::LightPosition(i) => element(LIGHT_POSITION_BASE, i, LIGHT_SLOTS),
            Self::LightMatrix(i) => element(LIGHT_MATRIX_BASE, i, LIGHT_SLOTS),
            Self::LightBrightness(i) => element(LIGHT_BRIGHTNESS_BASE, i, LIGHT_SLOTS),
            Self::IsLightShadow(i) => element(IS_LIGHT_SHADOW_BASE, i, LIGHT_SLOTS),
            Self::Texture(i) => element(TEXTURE_BASE, i, SAMPLER_SLOTS),
            Self::AmbientLight => Some(SCALAR_BASE),
            Self::WhichShadowLight => Some(SCALAR_BASE + 1),
            Self::ShiftColor => Some(SCALAR_BASE + 2),
            Self::RenderDirect => Some(SCALAR_BASE + 3),
            Self::TextureMux => Some(SCALAR_BASE + 4),
            Self::RenderTexture => Some(SCALAR_BASE + 5),
            Self::CellShading => Some(SCALAR_BASE + 6),
            Self::NeonColor => Some(SCALAR_BASE + 7),
        }
    }

    /// The name the shader compiler reports for this uniform.
    pub fn name(self) -> Cow<'static, str> {
        match self {
            Self::WorldPosition => "u_world_position".into(),
            Self::WorldRotation => "u_world_rotation".into(),
            Self::LightPosition(i) => format!("u_light_position[{i}]").into(),
            Self::LightMatrix(i) => format!("u_light_matrix[{i}]").into(),
            Self::LightBrightness(i) => format!("u_light_brightness[{i}]").into(),
            Self::IsLightShadow(i) => format!("u_is_light_shadow[{i}]").into(),
            Self::Texture(i) => format!("u_texture[{i}]").into(),
            Self::AmbientLight => "u_ambient_light".into(),
            Self::WhichShadowLight => "u_which_shadow_light".into(),
            Self::ShiftColor => "u_shift_color".into(),
            Self::RenderDirect => "u_render_direct".into(),
            Self::TextureMux => "u_texture_mux".into(),
            Self::RenderTexture => "u_render_texture".into(),
            Self::CellShading => "u_cell_shading".into(),
            Self::NeonColor => "u_neon_color".into(),
        }
    }

    pub fn all() -> impl Iterator<Item = UniformSlot> {
        let per_light = (0..LIGHT_SLOTS).flat_map(|i| {
            [
                Self::LightPosition(i),
                Self::LightMatrix(i),
                Self::LightBrightness(i),
                Self::IsLightShadow(i),
            ]
        });
        [Self::WorldPosition, Self::WorldRotation]
            .into_iter()
            .chain(per_light)
            .chain((0..SAMPLER_SLOTS).map(Self::Texture))
            .chain([
                Self::AmbientLight,
                Self::WhichShadowLight,
                Self::ShiftColor,
                Self::RenderDirect,
                Self::TextureMux,
                Self::RenderTexture,
                Self::CellShading,
                Self::NeonColor,
            ])
    }
}

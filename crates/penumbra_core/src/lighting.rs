/// Length of one flashback strobe cycle, in frames.
pub const FLASHBACK_PERIOD: u64 = 200;
/// Frames at the start of each cycle that show the recovering look.
pub const RECOVERY_WINDOW: u64 = 10;

/// The two fixed lighting looks the main pass alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingPreset {
    Recovering,
    Flashback,
}

impl LightingPreset {
    /// `frame` is the flashback clock value; it is ignored outside flashback mode.
    pub fn select(flashback: bool, frame: u64) -> Self {
        if !flashback || frame % FLASHBACK_PERIOD < RECOVERY_WINDOW {
            Self::Recovering
        } else {
            Self::Flashback
        }
    }

    pub fn ambient_light(self) -> f32 {
        match self {
            Self::Recovering => 0.05,
            Self::Flashback => 1e-4,
        }
    }

    /// Brightness of the four shadow-casting light slots.
    pub fn light_brightness(self) -> [f32; 4] {
        match self {
            Self::Recovering => [1.2, 1.2, 1.5, 4.0],
            Self::Flashback => [7.0, 0.0, 8.0, 30.0],
        }
    }
}

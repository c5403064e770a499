use crate::lighting::LightingPreset;

/// Counts frames spent in flashback mode.
///
/// The counter only advances while flashback is active, so leaving and
/// re-entering flashback resumes the strobe where it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashbackClock {
    frames: u64,
}

impl FlashbackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at an arbitrary frame, mostly for replays and tests.
    pub fn starting_at(frames: u64) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Called by the frame loop exactly once per frame.
    pub fn advance(&mut self, flashback: bool) -> LightingPreset {
        if !flashback {
            return LightingPreset::Recovering;
        }
        let frame = self.frames;
        self.frames += 1;
        LightingPreset::select(true, frame)
    }
}

//! The screen-space chain the main camera's image goes through before it
//! reaches the visible surface.

use penumbra_core::{RenderSettings, TextureLayout};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::filter::{Filter, FilterOutput};
use crate::kernel::gaussian_blur_code;
use crate::programs::filter_program::{BRIGHT_PASS, COMPOSITE, PASSTHROUGH};
use crate::raster::RasterApi;

pub struct ScreenComposer<A: RasterApi> {
    filters: Vec<Filter<A>>,
}

impl<A: RasterApi> ScreenComposer<A> {
    /// Builds the bloom chain for a `width × height` screen:
    ///
    /// 1. bright pass at full resolution
    /// 2. downsample to a quarter
    /// 3. Gaussian blur at a quarter
    /// 4. upsample to full resolution
    /// 5. composite the bloom over the untouched scene
    /// 6. copy to the visible surface
    ///
    /// Quality tiers that skip post-processing redirect `camera` to the
    /// screen instead, leaving the composer empty.
    pub fn new(
        api: &A,
        width: u32,
        height: u32,
        settings: &RenderSettings,
        camera: &mut Camera<A>,
    ) -> Result<Self, RenderError> {
        if settings.bypasses_post_processing() {
            log::info!("quality tier {} renders without post-processing", settings.quality_tier);
            camera.redirect_to_screen();
            return Ok(Self { filters: Vec::new() });
        }

        let (quarter_w, quarter_h) = (width / 4, height / 4);
        let blur = gaussian_blur_code();
        let stages: [(&str, &str, u32, u32, FilterOutput); 6] = [
            ("bright pass", BRIGHT_PASS, width, height, FilterOutput::Offscreen),
            ("downsample", PASSTHROUGH, quarter_w, quarter_h, FilterOutput::Offscreen),
            ("bloom blur", &blur, quarter_w, quarter_h, FilterOutput::Offscreen),
            ("upsample", PASSTHROUGH, width, height, FilterOutput::Offscreen),
            ("composite", COMPOSITE, width, height, FilterOutput::Offscreen),
            ("present", PASSTHROUGH, width, height, FilterOutput::Screen),
        ];

        let filters = stages
            .into_iter()
            .map(|(label, code, w, h, output)| {
                Filter::new(api, label, code, w, h, TextureLayout::Rgba, output)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { filters })
    }

    pub fn is_bypassed(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filters(&self) -> &[Filter<A>] {
        &self.filters
    }

    /// Each stage reads the previous stage's output plus the original scene.
    /// Returns the last stage's output, or `source` when bypassed.
    pub fn render(&self, api: &A, source: Option<A::Texture>, tint: [f32; 4]) -> Option<A::Texture> {
        self.filters
            .iter()
            .fold(source, |previous, filter| filter.post_filter(api, previous, source, tint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraRole;
    use crate::raster::recording::{Command, RecordingApi};
    use crate::raster::TextureUnit;
    use glam::Vec3;
    use penumbra_core::Orientation;

    fn main_camera(api: &RecordingApi) -> Camera<RecordingApi> {
        Camera::new(
            api,
            Vec3::ZERO,
            (640, 480),
            1.0,
            CameraRole::Viewer,
            TextureUnit::SCRATCH,
            Orientation::default(),
        )
        .unwrap()
    }

    fn settings(quality_tier: u32) -> RenderSettings {
        RenderSettings {
            quality_tier,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn chain_has_fixed_stage_sizes() {
        let api = RecordingApi::new();
        let mut camera = main_camera(&api);
        let composer = ScreenComposer::new(&api, 640, 480, &settings(0), &mut camera).unwrap();
        let sizes: Vec<_> = composer.filters().iter().map(|f| f.dimensions()).collect();
        assert_eq!(
            sizes,
            vec![(640, 480), (160, 120), (160, 120), (640, 480), (640, 480), (640, 480)]
        );
        assert!(composer.filters()[..5].iter().all(|f| f.texture().is_some()));
        assert!(composer.filters()[5].texture().is_none());
        assert!(camera.texture().is_some());
    }

    #[test]
    fn every_stage_reads_previous_output_and_original_scene() {
        let api = RecordingApi::new();
        let mut camera = main_camera(&api);
        let composer = ScreenComposer::new(&api, 640, 480, &settings(0), &mut camera).unwrap();
        let scene = camera.texture();
        api.take_commands();

        let out = composer.render(&api, scene, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(out, None);
        let commands = api.take_commands();

        let mut previous = scene;
        for filter in composer.filters() {
            let source = previous.unwrap();
            assert!(commands.contains(&Command::BindTexture { unit: TextureUnit::FILTER_SOURCE, texture: source }));
            previous = filter.texture();
        }
        let other_binds = commands
            .iter()
            .filter(|c| matches!(c, Command::BindTexture { unit: TextureUnit::FILTER_OTHER, .. }))
            .collect::<Vec<_>>();
        assert_eq!(other_binds.len(), 6);
        assert!(other_binds.iter().all(|c| **c == Command::BindTexture {
            unit: TextureUnit::FILTER_OTHER,
            texture: scene.unwrap(),
        }));
        assert_eq!(commands.iter().filter(|c| matches!(c, Command::Draw { .. })).count(), 6);
    }

    #[test]
    fn stages_run_in_reduction_order() {
        let api = RecordingApi::new();
        let mut camera = main_camera(&api);
        let composer = ScreenComposer::new(&api, 640, 480, &settings(2), &mut camera).unwrap();
        api.take_commands();

        composer.render(&api, camera.texture(), [0.0; 4]);
        let targets: Vec<_> = api
            .take_commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::BindFramebuffer(fb) => Some(fb),
                _ => None,
            })
            .collect();
        assert_eq!(targets.len(), 6);
        assert_eq!(targets[5], None);
        assert!(targets[..5].iter().all(Option::is_some));
    }

    #[test]
    fn low_quality_bypasses_chain() {
        let api = RecordingApi::new();
        let mut camera = main_camera(&api);
        let composer = ScreenComposer::new(&api, 640, 480, &settings(4), &mut camera).unwrap();
        assert!(composer.is_bypassed());
        assert!(camera.texture().is_none());
        api.take_commands();

        assert_eq!(composer.render(&api, Some(9), [0.0; 4]), Some(9));
        assert!(api.take_commands().is_empty());
    }
}

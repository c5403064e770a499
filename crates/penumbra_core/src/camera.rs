use glam::{Mat4, Vec3, Vec4};

use crate::transform::Orientation;

/// Distance of the near plane. There is no far plane.
pub const NEAR_PLANE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov: f32,
    pub aspect_ratio: f32,
}

impl Projection {
    pub fn new(fov: f32, width: u32, height: u32) -> Self {
        Self {
            fov,
            aspect_ratio: width as f32 / height.max(1) as f32,
        }
    }

    /// Infinite perspective: depth -1 at the near plane, approaching +1 at infinity.
    pub fn compute_projection_matrix(&self) -> Mat4 {
        let f = (std::f32::consts::FRAC_PI_2 - self.fov / 2.0).tan();
        Mat4::from_cols(
            Vec4::new(f / self.aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0, -1.0),
            Vec4::new(0.0, 0.0, -2.0 * NEAR_PLANE, 0.0),
        )
    }

    /// World -> clip for an eye at `position` turned by `orientation`.
    pub fn view_projection(&self, orientation: &Orientation, position: Vec3) -> Mat4 {
        self.compute_projection_matrix() * orientation.view_matrix(position)
    }
}

use glam::{Mat4, Vec3};

/// Rotation inside the xy plane (about the z axis).
pub fn matrix_rotate_xy(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}

/// Rotation inside the yz plane (about the x axis).
pub fn matrix_rotate_yz(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(angle)
}

/// Rotation inside the xz plane (about the y axis).
pub fn matrix_rotate_xz(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

/// Three independent rotation angles, applied yaw first.
///
/// `theta` turns in the xy plane, `theta2` in the yz plane and `theta3` in the
/// xz plane. Cameras and lights both carry one of these.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub theta: f32,
    pub theta2: f32,
    pub theta3: f32,
}

impl Orientation {
    pub fn new(theta: f32, theta2: f32) -> Self {
        Self {
            theta,
            theta2,
            theta3: 0.0,
        }
    }

    /// roll * pitch * yaw, so a vector is turned by `theta` before the others.
    pub fn compute_matrix(&self) -> Mat4 {
        matrix_rotate_xz(self.theta3) * matrix_rotate_yz(self.theta2) * matrix_rotate_xy(self.theta)
    }

    /// Rotation followed by moving the world opposite to `position`.
    pub fn view_matrix(&self, position: Vec3) -> Mat4 {
        self.compute_matrix() * Mat4::from_translation(-position)
    }
}

use foundation::math::{Quat, Vec3};

use crate::picking::Ray;

/// Perspective camera in scene space.
///
/// The camera looks down its local `-Z` axis with `+Y` up, so `orientation`
/// maps those local axes into the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view (degrees).
    pub fov_y_deg: f64,
    /// Viewport width / height.
    pub aspect: f64,
}

impl Camera {
    pub fn new(position: Vec3, orientation: Quat, fov_y_deg: f64, aspect: f64) -> Self {
        Self {
            position,
            orientation,
            fov_y_deg,
            aspect,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation.rotate(-Vec3::Z)
    }

    /// Ray through the middle of the viewport.
    pub fn center_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }
}

/// Orientation that points a camera at `eye` towards `target`.
///
/// Follows the usual right-handed look-at: local `+Z` points from the target
/// back to the eye, local `+X` is `up × z`. When `up` is parallel to the view
/// direction a perpendicular fallback is used. Returns `None` if `eye` and
/// `target` coincide.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let z = (eye - target).try_normalize()?;
    let x = up
        .cross(z)
        .try_normalize()
        .or_else(|| {
            let fallback = if z.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
            fallback.cross(z).try_normalize()
        })?;
    let y = z.cross(x);
    Some(Quat::from_basis(x, y, z))
}

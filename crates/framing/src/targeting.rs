use foundation::math::{LatLng, Quat, Vec3, lat_lng_to_scene};
use foundation::time::Time;
use scene::camera::look_at_rotation;
use scene::lighting::LightRig;
use scene::prefabs::globe::Globe;

use crate::ephemeris::SunEphemeris;
use crate::pose::{GroundTarget, OrbitalPose};

/// Where the preview camera sits and which way it faces after a look-at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPlacement {
    pub position: Vec3,
    pub target: Vec3,
    pub orientation: Quat,
}

impl CameraPlacement {
    pub fn forward(&self) -> Vec3 {
        self.orientation.rotate(-Vec3::Z)
    }

    /// Elevation of the view direction against the local horizon at the
    /// camera (degrees). Straight down is -90.
    pub fn pitch_deg(&self) -> f64 {
        let Some(up) = self.position.try_normalize() else {
            return 0.0;
        };
        self.forward().dot(up).clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// Put the camera at the satellite and aim it at the ground target.
///
/// Returns `None` when the pose and target resolve to the same scene point
/// (zero altitude directly over the target), where no direction exists.
pub fn look_at(globe: &Globe, pose: &OrbitalPose, target: &GroundTarget) -> Option<CameraPlacement> {
    let position = globe.position(pose.lat_lng(), pose.height_km);
    let target_pos = globe.surface_point(target.lat_lng());
    let orientation = look_at_rotation(position, target_pos, Vec3::Y)?;
    Some(CameraPlacement {
        position,
        target: target_pos,
        orientation,
    })
}

/// Aim the directional light of `lights` from the subsolar point at `at`,
/// `distance_radii` Earth radii from the globe center.
pub fn place_sun(
    lights: &mut LightRig,
    ephemeris: &dyn SunEphemeris,
    globe: &Globe,
    at: Time,
    distance_radii: f64,
) -> LatLng {
    let subsolar = ephemeris.subsolar_point(at);
    lights.sun.position = globe.center + lat_lng_to_scene(subsolar, globe.radius * distance_radii);
    lights.sun.target = globe.center;
    subsolar
}

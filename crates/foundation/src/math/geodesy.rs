use super::Vec3;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// Equatorial circumference (meters).
pub const EQUATOR_LENGTH_M: f64 = 2.0 * std::f64::consts::PI * WGS84_A;
/// Pole-to-pole length along a meridian (meters), i.e. 180 degrees of latitude.
pub const MERIDIAN_LENGTH_M: f64 = 20_003_931.458_6;

/// Mean Earth radius (kilometers). Scene space uses this as its unit length.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Longitude folded into `[-180, 180)`.
    pub fn wrapped(self) -> Self {
        Self::new(self.lat, wrap_lng(self.lng))
    }
}

pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Scene position of a point on (or above) a spherical Earth of unit radius.
///
/// The scene frame is Y-up: ECEF `(x, y, z)` maps to scene `(x, z, -y)`.
/// `radius` is measured in Earth radii (1.0 is the surface).
pub fn lat_lng_to_scene(p: LatLng, radius: f64) -> Vec3 {
    let lat = p.lat.to_radians();
    let lng = p.lng.to_radians();
    let cos_lat = lat.cos();
    Vec3::new(
        radius * cos_lat * lng.cos(),
        radius * lat.sin(),
        -radius * cos_lat * lng.sin(),
    )
}

/// Inverse of [`lat_lng_to_scene`]; returns `None` for the origin.
pub fn scene_to_lat_lng(p: Vec3) -> Option<LatLng> {
    let r = p.length();
    if r <= 1e-12 || !r.is_finite() {
        return None;
    }
    let lat = (p.y / r).clamp(-1.0, 1.0).asin().to_degrees();
    let lng = (-p.z).atan2(p.x).to_degrees();
    Some(LatLng::new(lat, lng))
}

/// Geocentric radius in Earth radii for an altitude in kilometers.
pub fn altitude_km_to_radius(height_km: f64) -> f64 {
    1.0 + height_km / EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::{LatLng, altitude_km_to_radius, lat_lng_to_scene, scene_to_lat_lng, wrap_lng};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_is_plus_x() {
        let p = lat_lng_to_scene(LatLng::new(0.0, 0.0), 1.0);
        assert_close(p.x, 1.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 0.0, 1e-12);
    }

    #[test]
    fn north_pole_is_plus_y() {
        let p = lat_lng_to_scene(LatLng::new(90.0, 12.0), 2.0);
        assert_close(p.y, 2.0, 1e-12);
    }

    #[test]
    fn ninety_east_is_minus_z() {
        let p = lat_lng_to_scene(LatLng::new(0.0, 90.0), 1.0);
        assert_close(p.z, -1.0, 1e-12);
    }

    #[test]
    fn scene_round_trip() {
        let ll = LatLng::new(49.1584, -122.9288);
        let back = scene_to_lat_lng(lat_lng_to_scene(ll, 1.3)).unwrap();
        assert_close(back.lat, ll.lat, 1e-9);
        assert_close(back.lng, ll.lng, 1e-9);
    }

    #[test]
    fn origin_has_no_coordinate() {
        assert!(scene_to_lat_lng(super::Vec3::ZERO).is_none());
    }

    #[test]
    fn wraps_longitude() {
        assert_close(wrap_lng(190.0), -170.0, 1e-12);
        assert_close(wrap_lng(-180.0), -180.0, 1e-12);
        assert_close(wrap_lng(540.0), -180.0, 1e-12);
    }

    #[test]
    fn altitude_is_normalized_by_earth_radius() {
        assert_close(altitude_km_to_radius(6_371.0), 2.0, 1e-12);
    }
}

//! Ground footprint of a rectangular field of view.
//!
//! Corners are laid out in a local east/north plane and converted to
//! latitude/longitude with an equirectangular approximation around the
//! rectangle's center. The approximation holds for footprints of tens of
//! kilometers at moderate latitudes. Longitude scale grows as `1 / cos(lat)`,
//! so results degrade towards the poles and for very large rectangles; this is
//! a boundary of the model, not something to clamp here.

use super::{EQUATOR_LENGTH_M, LatLng, MERIDIAN_LENGTH_M, Vec2};

/// Four ground corners in ring order: north-west, north-east, south-east,
/// south-west (before rotation).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FootprintPolygon {
    pub corners: [LatLng; 4],
}

impl FootprintPolygon {
    /// Closed ring: the four corners followed by the first one again.
    pub fn closed_ring(&self) -> [LatLng; 5] {
        let [a, b, c, d] = self.corners;
        [a, b, c, d, a]
    }

    /// Arithmetic mean of the corners.
    pub fn centroid(&self) -> LatLng {
        let (lat, lng) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));
        LatLng::new(lat / 4.0, lng / 4.0)
    }

    /// East-west span in degrees of longitude.
    pub fn lng_extent(&self) -> f64 {
        let (min, max) = self
            .corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.lng), hi.max(c.lng))
            });
        max - min
    }
}

/// Rotate a planar point counter-clockwise by `angle_deg`.
pub fn rotate_point(p: Vec2, angle_deg: f64) -> Vec2 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Vec2::new(p.x * c - p.y * s, p.x * s + p.y * c)
}

/// Offset `origin` by a planar displacement in meters (x east, y north).
pub fn offset_to_lat_lng(origin: LatLng, offset: Vec2) -> LatLng {
    let d_lat = offset.y * (180.0 / MERIDIAN_LENGTH_M);
    let d_lng = offset.x * (360.0 / (EQUATOR_LENGTH_M * origin.lat.to_radians().cos()));
    LatLng::new(origin.lat + d_lat, origin.lng + d_lng)
}

/// Corners of a `width_m` by `height_m` rectangle centered on `center`, turned
/// clockwise by `rotation_deg` (a compass heading for the rectangle's top edge).
pub fn rect_bounds(center: LatLng, width_m: f64, height_m: f64, rotation_deg: f64) -> FootprintPolygon {
    let hw = width_m / 2.0;
    let hh = height_m / 2.0;
    let local = [
        Vec2::new(-hw, hh),
        Vec2::new(hw, hh),
        Vec2::new(hw, -hh),
        Vec2::new(-hw, -hh),
    ];
    let corners = local.map(|p| offset_to_lat_lng(center, rotate_point(p, -rotation_deg)));
    FootprintPolygon { corners }
}

/// Point `distance_m` away from `start` along compass `heading_deg`.
pub fn destination(start: LatLng, distance_m: f64, heading_deg: f64) -> LatLng {
    let ahead = rotate_point(Vec2::new(0.0, distance_m), -heading_deg);
    offset_to_lat_lng(start, ahead)
}

/// Two-point line from `start` along `heading_deg`, for bearing overlays.
pub fn bearing_line(start: LatLng, distance_m: f64, heading_deg: f64) -> [LatLng; 2] {
    [start, destination(start, distance_m, heading_deg)]
}

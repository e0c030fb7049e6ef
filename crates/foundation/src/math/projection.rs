//! Web-Mercator slippy-tile math.
//!
//! Forward conversions floor to the containing tile and are clamped to the
//! grid; inverse conversions return the tile's north-west corner. A round trip
//! therefore lands on a tile corner, not on the original coordinate.

use std::f64::consts::PI;

/// Latitude limit of the square Web-Mercator world (degrees).
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Number of tiles along one axis at `zoom`. Saturates at `u32::MAX` for
/// zoom levels of 32 and above.
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32.checked_shl(u32::from(zoom)).unwrap_or(u32::MAX)
}

pub fn lon_to_tile_x(lng: f64, zoom: u8) -> u32 {
    let n = tiles_per_axis(zoom);
    let x = ((lng + 180.0) / 360.0 * n as f64).floor();
    clamp_index(x, n)
}

pub fn lat_to_tile_y(lat: f64, zoom: u8) -> u32 {
    let n = tiles_per_axis(zoom);
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n as f64).floor();
    clamp_index(y, n)
}

/// Western edge of tile column `x`.
pub fn tile_x_to_lon(x: u32, zoom: u8) -> f64 {
    x as f64 / tiles_per_axis(zoom) as f64 * 360.0 - 180.0
}

/// Northern edge of tile row `y`.
pub fn tile_y_to_lat(y: u32, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * y as f64 / tiles_per_axis(zoom) as f64;
    n.sinh().atan().to_degrees()
}

/// Tile width in degrees of longitude (constant for a zoom level).
pub fn tile_width_deg(zoom: u8) -> f64 {
    360.0 / tiles_per_axis(zoom) as f64
}

/// Tile height in degrees of latitude for row `y`.
///
/// Mercator rows shrink towards the poles, so this is the correction needed to
/// place a tile on the globe.
pub fn tile_height_deg(y: u32, zoom: u8) -> f64 {
    tile_y_to_lat(y, zoom) - tile_y_to_lat(y + 1, zoom)
}

fn clamp_index(v: f64, n: u32) -> u32 {
    if v.is_nan() || v < 0.0 {
        0
    } else if v >= n as f64 {
        n - 1
    } else {
        v as u32
    }
}

use foundation::math::{
    LatLng, lat_to_tile_y, lon_to_tile_x, tile_height_deg, tile_width_deg, tile_x_to_lon,
    tile_y_to_lat, tiles_per_axis,
};
use serde::{Deserialize, Serialize};

/// Tile coordinate in ZXY scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Geographic extent of a tile in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tile containing `p` at `zoom`.
    pub fn containing(p: LatLng, zoom: u8) -> Self {
        Self::new(zoom, lon_to_tile_x(p.lng, zoom), lat_to_tile_y(p.lat, zoom))
    }

    pub fn bounds(&self) -> TileBounds {
        let north = tile_y_to_lat(self.y, self.z);
        TileBounds {
            west: tile_x_to_lon(self.x, self.z),
            south: north - tile_height_deg(self.y, self.z),
            east: tile_x_to_lon(self.x, self.z) + tile_width_deg(self.z),
            north,
        }
    }

    /// Neighbor at `(dx, dy)` tiles away.
    ///
    /// Columns wrap around the antimeridian; rows outside the grid yield `None`.
    pub fn offset(&self, dx: i64, dy: i64) -> Option<Self> {
        let n = tiles_per_axis(self.z) as i64;
        let y = self.y as i64 + dy;
        if !(0..n).contains(&y) {
            return None;
        }
        let x = (self.x as i64 + dx).rem_euclid(n);
        Some(Self::new(self.z, x as u32, y as u32))
    }
}

/// Imagery variant draped on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileLayer {
    /// Albedo imagery.
    Day,
    /// Emissive city lights.
    Night,
}

impl TileLayer {
    pub const ALL: [TileLayer; 2] = [TileLayer::Day, TileLayer::Night];
}

#[cfg(test)]
mod tests {
    use super::{TileCoord, TileLayer};
    use foundation::math::LatLng;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn tile_coord_bounds() {
        let tile = TileCoord::new(0, 0, 0);
        let b = tile.bounds();
        assert_close(b.west, -180.0, 1e-9);
        assert_close(b.east, 180.0, 1e-9);
        assert!(b.south < b.north);
    }

    #[test]
    fn containing_tile_contains_point() {
        let p = LatLng::new(49.1584, -122.9288);
        let tile = TileCoord::containing(p, 8);
        assert_eq!(tile, TileCoord::new(8, 40, 87));
        let b = tile.bounds();
        assert!(p.lng >= b.west && p.lng < b.east);
        assert!(p.lat > b.south && p.lat <= b.north);
    }

    #[test]
    fn offset_wraps_columns() {
        let edge = TileCoord::new(8, 255, 100);
        assert_eq!(edge.offset(1, 0), Some(TileCoord::new(8, 0, 100)));
        assert_eq!(TileCoord::new(8, 0, 100).offset(-2, 1), Some(TileCoord::new(8, 254, 101)));
    }

    #[test]
    fn offset_rejects_rows_outside_grid() {
        assert_eq!(TileCoord::new(8, 10, 0).offset(0, -1), None);
        assert_eq!(TileCoord::new(8, 10, 255).offset(0, 1), None);
    }

    #[test]
    fn layers_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&TileLayer::Night).unwrap(), "\"night\"");
    }
}

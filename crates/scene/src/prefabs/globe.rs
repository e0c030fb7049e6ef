use foundation::math::{LatLng, Vec3, altitude_km_to_radius, lat_lng_to_scene};

/// Spherical Earth in scene space. One scene unit is one mean Earth radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Globe {
    pub center: Vec3,
    pub radius: f64,
}

impl Default for Globe {
    fn default() -> Self {
        Self::unit()
    }
}

impl Globe {
    pub fn unit() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }

    /// Scene position for a geographic coordinate at `height_km` above the surface.
    pub fn position(&self, at: LatLng, height_km: f64) -> Vec3 {
        self.center + lat_lng_to_scene(at, self.radius * altitude_km_to_radius(height_km))
    }

    pub fn surface_point(&self, at: LatLng) -> Vec3 {
        self.position(at, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Globe;
    use foundation::math::LatLng;

    #[test]
    fn satellite_sits_above_surface() {
        let globe = Globe::unit();
        let p = globe.position(LatLng::new(0.0, 0.0), 550.0);
        assert!((p.x - (1.0 + 550.0 / 6_371.0)).abs() < 1e-12);
        assert_eq!(globe.surface_point(LatLng::new(0.0, 0.0)).x, 1.0);
    }
}

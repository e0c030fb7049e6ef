use std::path::Path;

use foundation::math::tiles_per_axis;
use serde::{Deserialize, Serialize};
use streaming::TileSourceConfig;

use crate::error::FramingError;

/// Environment variable overriding [`TileSourceConfig::access_token`].
pub const ENV_TILE_TOKEN: &str = "FRAMING_TILE_TOKEN";
/// Environment variable overriding [`TileSourceConfig::zoom`].
pub const ENV_TILE_ZOOM: &str = "FRAMING_TILE_ZOOM";

/// Deepest zoom level the tile providers serve.
pub const MAX_TILE_ZOOM: u8 = 22;

/// Check that a tile source can produce a full neighborhood grid.
pub fn validate_tile_source(tiles: &TileSourceConfig) -> Result<(), FramingError> {
    if tiles.zoom > MAX_TILE_ZOOM {
        return Err(FramingError::InvalidConfig(format!(
            "tile zoom {} is above {MAX_TILE_ZOOM}",
            tiles.zoom
        )));
    }
    let side = tiles.grid_side();
    if side > u64::from(tiles_per_axis(tiles.zoom)) {
        return Err(FramingError::InvalidConfig(format!(
            "a {side}x{side} neighborhood needs zoom >= {min}, got {zoom}",
            min = side.next_power_of_two().trailing_zeros(),
            zoom = tiles.zoom
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub tiles: TileSourceConfig,
    pub optics: CameraOptics,
    pub controls: ControlConfig,
    pub lighting: LightingConfig,
    pub viewport: Viewport,
}

/// Simulated imaging camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptics {
    /// Vertical field of view (degrees).
    pub fov_y_deg: f64,
    /// Distance from the camera to the plane that pointer motion is mapped
    /// onto, in scene units.
    pub view_distance: f64,
}

impl Default for CameraOptics {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            view_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Multiplier on the field-of-view-derived rotation per pointer delta.
    pub rotation_speed: f64,
    /// Key that switches dragging from pan to roll while held.
    pub modifier_key: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            modifier_key: "Shift".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Distance of the sun light from the globe center, in Earth radii.
    pub sun_distance_radii: f64,
    pub directional_intensity: f64,
    pub ambient_intensity: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_distance_radii: 50.0,
            directional_intensity: 1.0,
            ambient_intensity: 0.1,
        }
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            (self.width / self.height).max(1e-6)
        }
    }

    pub fn half_size(&self) -> (f64, f64) {
        (0.5 * self.width.max(1.0), 0.5 * self.height.max(1.0))
    }
}

impl FramingConfig {
    pub fn from_json_str(s: &str) -> Result<Self, FramingError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, FramingError> {
        let text = std::fs::read_to_string(path).map_err(|source| FramingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Overlay `FRAMING_TILE_TOKEN` / `FRAMING_TILE_ZOOM` from the process
    /// environment.
    pub fn apply_env(&mut self) -> Result<(), FramingError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), FramingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TILE_TOKEN) {
            self.tiles.access_token = token;
        }
        if let Some(zoom) = lookup(ENV_TILE_ZOOM) {
            self.tiles.zoom = zoom.trim().parse().map_err(|_| {
                FramingError::InvalidConfig(format!("{ENV_TILE_ZOOM}={zoom:?} is not a zoom level"))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), FramingError> {
        let invalid = |msg: String| -> Result<(), FramingError> {
            Err(FramingError::InvalidConfig(msg))
        };

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        if !(self.optics.fov_y_deg > 0.0 && self.optics.fov_y_deg < 180.0) {
            return invalid(format!(
                "fov_y_deg must be in (0, 180), got {}",
                self.optics.fov_y_deg
            ));
        }
        if !(self.optics.view_distance > 0.0) {
            return invalid(format!(
                "view_distance must be positive, got {}",
                self.optics.view_distance
            ));
        }
        if !(self.controls.rotation_speed.is_finite() && self.controls.rotation_speed > 0.0) {
            return invalid(format!(
                "rotation_speed must be positive, got {}",
                self.controls.rotation_speed
            ));
        }
        if self.controls.modifier_key.trim().is_empty() {
            return invalid("modifier_key must not be empty".to_string());
        }
        validate_tile_source(&self.tiles)?;
        if !(self.lighting.sun_distance_radii > 1.0) {
            return invalid(format!(
                "sun_distance_radii must be above the surface, got {}",
                self.lighting.sun_distance_radii
            ));
        }
        Ok(())
    }
}

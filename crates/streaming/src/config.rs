use serde::{Deserialize, Serialize};

use crate::tile::{TileCoord, TileLayer};

/// Where tile imagery comes from and how much of it is kept around the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSourceConfig {
    /// Fixed zoom level of the neighborhood.
    pub zoom: u8,

    /// URL templates with `{z}`, `{x}`, `{y}` and `{token}` placeholders.
    pub day_url_template: String,
    pub night_url_template: String,

    /// Provider access token substituted for `{token}`.
    pub access_token: String,

    /// Tiles on each side of the center tile (2 gives a 5×5 grid).
    pub neighborhood_radius: u32,
}

impl Default for TileSourceConfig {
    fn default() -> Self {
        Self {
            zoom: 8,
            day_url_template:
                "https://api.mapbox.com/v4/mapbox.satellite/tiles/{z}/{x}/{y}?access_token={token}"
                    .to_string(),
            night_url_template:
                "https://api.mapbox.com/styles/v1/mapbox/dark-v11/tiles/{z}/{x}/{y}?access_token={token}"
                    .to_string(),
            access_token: String::new(),
            neighborhood_radius: 2,
        }
    }
}

impl TileSourceConfig {
    pub fn template(&self, layer: TileLayer) -> &str {
        match layer {
            TileLayer::Day => &self.day_url_template,
            TileLayer::Night => &self.night_url_template,
        }
    }

    pub fn url_for(&self, layer: TileLayer, coord: TileCoord) -> String {
        self.template(layer)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{token}", &self.access_token)
    }

    /// Side length of the neighborhood grid.
    pub fn grid_side(&self) -> u64 {
        2 * u64::from(self.neighborhood_radius) + 1
    }
}

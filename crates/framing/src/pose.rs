use foundation::math::LatLng;
use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// Predicted satellite position for a pass, as supplied by orbit propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalPose {
    pub lat: f64,
    pub lng: f64,
    pub height_km: f64,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: f64,
}

impl OrbitalPose {
    pub fn new(lat: f64, lng: f64, height_km: f64, timestamp: f64) -> Self {
        Self {
            lat,
            lng,
            height_km,
            timestamp,
        }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn time(&self) -> Time {
        Time(self.timestamp)
    }
}

/// Operator-selected point on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTarget {
    pub lat: f64,
    pub lng: f64,
}

impl GroundTarget {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

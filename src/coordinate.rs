use serde::{Deserialize, Serialize};

/// A single nav sample. Longitude and latitude are treated as planar x/y
/// by the simplifier; altitude and label are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
    pub label: String,
}

/// An ordered sequence of samples.
pub type Track = Vec<Coordinate>;

impl Coordinate {
    /// Builds a coordinate with its longitude normalised to (-180, 180].
    pub fn new(longitude: f64, latitude: f64, label: impl Into<String>) -> Self {
        Coordinate {
            longitude: normalize_longitude(longitude),
            latitude,
            altitude: None,
            label: label.into(),
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// True when both samples sit on the same lon/lat position.
    pub fn same_position(&self, other: &Coordinate) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }
}

/// Maps longitudes expressed in [0, 360) onto (-180, 180].
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

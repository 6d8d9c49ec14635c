use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed location. Immutable once created; the timestamp
/// defaults to the creation time when the source does not supply one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Range check for callers sitting at the intake boundary. The route
/// aggregate itself does not re-check.
pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

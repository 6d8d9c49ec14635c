use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

use crate::{
    distance::haversine_distance,
    format::{humanize_duration, humanize_number},
    geo_point::GeoPoint,
};

/// How many of the most recent points `summary` renders before
/// eliding the rest.
pub const SUMMARY_POINT_LIMIT: usize = 9;

/// Version tag written into every persisted coordinate blob.
pub const COORDINATES_VERSION: u16 = 1;

/// One tracking session's worth of ordered points. `id` stays `None`
/// until the route has been persisted; points are append-only while
/// the session is live and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub points: Vec<GeoPoint>,
}

impl Route {
    pub fn new() -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            points: Vec::new(),
        }
    }

    pub fn add(&mut self, latitude: f64, longitude: f64, timestamp: Option<DateTime<Utc>>) {
        self.points.push(GeoPoint::new(latitude, longitude, timestamp));
    }

    /// Cumulative path length in kilometers. An out-and-back route
    /// reports double the one-way distance.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Seconds between the first and last point. Intermediate timing
    /// irregularities are ignored.
    pub fn duration(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let first = &self.points[0];
        let last = &self.points[self.points.len() - 1];
        (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
    }

    /// Average speed in km/h. Returns 0 for routes with fewer than two
    /// points and for routes whose first and last timestamps coincide,
    /// so callers never see a non-finite value.
    pub fn average_speed(&self) -> f64 {
        let duration = self.duration();
        if duration == 0.0 {
            return 0.0;
        }
        self.length() / (duration / 3600.0)
    }

    /// Human-readable rendering of the most recent points (newest
    /// first) plus the derived metrics.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for point in self.points.iter().rev().take(SUMMARY_POINT_LIMIT) {
            out.push_str(&format!(
                "{:.5}, {:.5} @ {}\n",
                point.latitude,
                point.longitude,
                point.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        if self.points.len() > SUMMARY_POINT_LIMIT {
            out.push_str(&format!(
                "... {} earlier points not shown\n",
                self.points.len() - SUMMARY_POINT_LIMIT
            ));
        }
        let duration = humanize_duration(self.duration());
        out.push_str(&format!("Distance: {} km\n", humanize_number(self.length())));
        out.push_str(&format!(
            "Duration: {}\n",
            if duration.is_empty() { "0 s" } else { duration.as_str() }
        ));
        out.push_str(&format!(
            "Average speed: {} km/h\n",
            humanize_number(self.average_speed())
        ));
        out
    }

    pub fn to_record(&self) -> RouteRecord {
        RouteRecord {
            route_id: self.id,
            created_at: self.created_at,
            coordinates: self
                .points
                .iter()
                .map(|point| PersistedPoint {
                    lat: point.latitude,
                    lon: point.longitude,
                    timestamp: point.timestamp,
                })
                .collect(),
        }
    }

    pub fn from_record(record: RouteRecord) -> Self {
        Self {
            id: record.route_id,
            created_at: record.created_at,
            points: record
                .coordinates
                .into_iter()
                .map(|point| GeoPoint {
                    latitude: point.lat,
                    longitude: point.lon,
                    timestamp: point.timestamp,
                })
                .collect(),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable form of a [`Route`]. The coordinate list travels as a
/// version-tagged blob so the on-disk shape can evolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub coordinates: Vec<PersistedPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPoint {
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct CoordinateBlob {
    version: u16,
    points: Vec<PersistedPoint>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("unsupported coordinate record version {0}")]
    UnsupportedVersion(u16),
    #[error("coordinate blob codec error: {0}")]
    Codec(#[from] bincode::Error),
}

pub fn encode_points(points: &[PersistedPoint]) -> Result<Vec<u8>, RecordError> {
    let blob = CoordinateBlob {
        version: COORDINATES_VERSION,
        points: points.to_vec(),
    };
    Ok(bincode::serialize(&blob)?)
}

pub fn decode_points(blob: &[u8]) -> Result<Vec<PersistedPoint>, RecordError> {
    let blob: CoordinateBlob = bincode::deserialize(blob)?;
    if blob.version != COORDINATES_VERSION {
        return Err(RecordError::UnsupportedVersion(blob.version));
    }
    Ok(blob.points)
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for RouteRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let blob: Vec<u8> = row.try_get(2)?;
        let coordinates = decode_points(&blob).map_err(|err| sqlx::Error::ColumnDecode {
            index: "coordinates".into(),
            source: Box::new(err),
        })?;

        Ok(Self {
            route_id: row.try_get(0)?,
            created_at: row.try_get(1)?,
            coordinates,
        })
    }
}

/// Failures of the persistence layer. Each variant carries the
/// underlying cause; none of them is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open route store: {0}")]
    Open(#[source] sqlx::Error),

    #[error("route store schema version {found} is newer than supported version {supported}")]
    VersionTooNew { found: i64, supported: i64 },

    #[error("route store metadata is corrupt: {0}")]
    Corrupt(String),

    #[error("write transaction failed: {0}")]
    Write(#[source] sqlx::Error),

    #[error("read transaction failed: {0}")]
    Read(#[source] sqlx::Error),

    #[error("failed to encode route coordinates: {0}")]
    Encode(#[source] route_tracker_lib::route::RecordError),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a tracking session is already active")]
    AlreadyActive,

    #[error("no tracking session is active")]
    NotActive,

    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reported by the upstream location source instead of a position.
/// These never terminate a session on their own.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("location source unavailable: {0}")]
    Unavailable(String),

    #[error("location permission denied")]
    PermissionDenied,
}

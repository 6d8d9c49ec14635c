use std::path::Path;

use const_format::concatcp;
use route_tracker_lib::route::{Route, RouteRecord, encode_points};
use sqlx::{
    Connection, query, query_as, query_scalar,
    sqlite::{SqliteConnectOptions, SqliteConnection},
};

use super::constants::*;
use crate::StorageError;

/// Per-version schema upgrade statements. The recorded version equals
/// the number of entries already applied, so appending a new entry is
/// all a future upgrade needs.
const MIGRATIONS: &[&[&str]] = &[
    // v1: the routes collection and its creation-time index
    &[
        concatcp!(
            "CREATE TABLE ",
            ROUTES_TABLE_NAME,
            " (",
            ROUTE_ID,
            " INTEGER PRIMARY KEY AUTOINCREMENT, ",
            CREATED_AT,
            " TIMESTAMP NOT NULL, ",
            COORDINATES,
            " BLOB NOT NULL)"
        ),
        concatcp!(
            "CREATE INDEX ",
            CREATED_AT_INDEX_NAME,
            " ON ",
            ROUTES_TABLE_NAME,
            " (",
            CREATED_AT,
            ")"
        ),
    ],
];

/// Persistent collection of completed routes, one SQLite file. Every
/// operation acquires its own connection and releases it before
/// returning, so no connection outlives a call.
#[derive(Debug, Clone)]
pub struct RouteStore {
    options: SqliteConnectOptions,
}

impl RouteStore {
    /// Opens the store at `path`, creating the file and upgrading the
    /// schema if needed. Upgrades run inside one transaction and are
    /// idempotent; a database written by newer code is refused.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let store = Self { options };
        store.migrate().await?;
        Ok(store)
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(StorageError::Open)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await.map_err(StorageError::Open)?;

        let version = schema_version(&mut tx).await?;
        let target = MIGRATIONS.len() as i64;
        if version > target {
            return Err(StorageError::VersionTooNew {
                found: version,
                supported: target,
            });
        }
        if version < target {
            tracing::info!(version, target, "upgrading route store schema");
            for step in &MIGRATIONS[version as usize..] {
                for &statement in *step {
                    query(statement)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::Open)?;
                }
            }
            set_schema_version(&mut tx, target).await?;
        }

        tx.commit().await.map_err(StorageError::Open)?;
        Ok(())
    }

    /// Persists a route and returns its newly assigned id. The store
    /// is the sole source of ids, so any id already on the route is
    /// ignored. The insert either commits as one record or not at all.
    pub async fn insert(&self, route: &Route) -> Result<i64, StorageError> {
        let record = route.to_record();
        let blob = encode_points(&record.coordinates).map_err(StorageError::Encode)?;

        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await.map_err(StorageError::Write)?;

        let id: i64 = query_scalar(concatcp!(
            "INSERT INTO ",
            ROUTES_TABLE_NAME,
            " (",
            ROUTE_ID,
            ", ",
            CREATED_AT,
            ", ",
            COORDINATES,
            ") VALUES (NULL, ?1, ?2) RETURNING ",
            ROUTE_ID
        ))
        .bind(record.created_at)
        .bind(blob)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::Write)?;

        tx.commit().await.map_err(StorageError::Write)?;
        tracing::debug!(route_id = id, points = record.coordinates.len(), "route stored");
        Ok(id)
    }

    /// Reads every persisted route in creation order inside one read
    /// transaction.
    pub async fn list(&self) -> Result<Vec<Route>, StorageError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await.map_err(StorageError::Read)?;

        let records = query_as::<_, RouteRecord>(concatcp!(
            "SELECT ",
            ROUTE_ID,
            ", ",
            CREATED_AT,
            ", ",
            COORDINATES,
            " FROM ",
            ROUTES_TABLE_NAME,
            " ORDER BY ",
            CREATED_AT,
            ", ",
            ROUTE_ID
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(StorageError::Read)?;

        tx.commit().await.map_err(StorageError::Read)?;
        Ok(records.into_iter().map(Route::from_record).collect())
    }
}

async fn schema_version(conn: &mut SqliteConnection) -> Result<i64, StorageError> {
    query(concatcp!(
        "CREATE TABLE IF NOT EXISTS ",
        METADATA_TABLE_NAME,
        " (",
        KEY,
        " TEXT PRIMARY KEY, ",
        VALUE,
        " TEXT NOT NULL)"
    ))
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Open)?;

    let version: Option<String> = query_scalar(concatcp!(
        "SELECT ",
        VALUE,
        " FROM ",
        METADATA_TABLE_NAME,
        " WHERE ",
        KEY,
        " = '",
        VERSION_KEY,
        "'"
    ))
    .fetch_optional(&mut *conn)
    .await
    .map_err(StorageError::Open)?;

    match version {
        None => Ok(0),
        Some(text) => text
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("schema version is not a number: {text}"))),
    }
}

async fn set_schema_version(conn: &mut SqliteConnection, version: i64) -> Result<(), StorageError> {
    query(concatcp!(
        "INSERT OR REPLACE INTO ",
        METADATA_TABLE_NAME,
        " (",
        KEY,
        ", ",
        VALUE,
        ") VALUES ('",
        VERSION_KEY,
        "', ?1)"
    ))
    .bind(version.to_string())
    .execute(&mut *conn)
    .await
    .map_err(StorageError::Open)?;
    Ok(())
}

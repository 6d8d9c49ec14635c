use assert_float_eq::assert_float_absolute_eq;
use chrono::{Duration, Utc};
use route_tracker_data_management::{StorageError, database::RouteStore};
use route_tracker_lib::route::Route;
use sqlx::{
    Connection,
    sqlite::{SqliteConnectOptions, SqliteConnection},
};
use tempdir::TempDir;

fn sample_route(offset_secs: i64) -> Route {
    let start = Utc::now() + Duration::seconds(offset_secs);
    let mut route = Route::new();
    route.created_at = start;
    route.add(52.0, 13.0, Some(start));
    route.add(52.01, 13.01, Some(start + Duration::seconds(60)));
    route
}

#[tokio::test]
async fn insert_assigns_monotonic_ids() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let store = RouteStore::open(temp_dir.path().join("routes.db")).await.unwrap();

    let first = store.insert(&sample_route(0)).await.unwrap();
    let second = store.insert(&sample_route(60)).await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn insert_strips_existing_id() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let store = RouteStore::open(temp_dir.path().join("routes.db")).await.unwrap();

    let mut route = sample_route(0);
    route.id = Some(999);
    let assigned = store.insert(&route).await.unwrap();
    assert_ne!(assigned, 999);

    // Inserting the same route again still yields a fresh id.
    let again = store.insert(&route).await.unwrap();
    assert!(again > assigned);
}

#[tokio::test]
async fn list_reconstructs_all_routes() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let store = RouteStore::open(temp_dir.path().join("routes.db")).await.unwrap();

    let originals: Vec<Route> = (0..3).map(|i| sample_route(i * 120)).collect();
    let mut ids = Vec::new();
    for route in &originals {
        ids.push(store.insert(route).await.unwrap());
    }

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), originals.len());
    for (stored, original) in listed.iter().zip(&originals) {
        assert_float_absolute_eq!(stored.length(), original.length(), 1e-9);
        assert_eq!(stored.duration(), original.duration());
        assert_float_absolute_eq!(stored.average_speed(), original.average_speed(), 1e-9);
        assert_eq!(stored.points.len(), original.points.len());
        for (a, b) in stored.points.iter().zip(&original.points) {
            assert_eq!(a, b);
        }
    }
}

#[tokio::test]
async fn list_orders_by_creation_time_and_reverses_to_newest_first() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let store = RouteStore::open(temp_dir.path().join("routes.db")).await.unwrap();

    for i in 0..3 {
        store.insert(&sample_route(i * 60)).await.unwrap();
    }
    let last_id = store.insert(&sample_route(300)).await.unwrap();

    let mut listed = store.list().await.unwrap();
    assert_eq!(listed.last().and_then(|route| route.id), Some(last_id));
    assert_eq!(
        listed.iter().filter_map(|route| route.id).max(),
        Some(last_id)
    );

    listed.reverse();
    assert_eq!(listed.first().and_then(|route| route.id), Some(last_id));
}

#[tokio::test]
async fn empty_route_round_trips() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let store = RouteStore::open(temp_dir.path().join("routes.db")).await.unwrap();

    let route = Route::new();
    let id = store.insert(&route).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, Some(id));
    assert!(listed[0].points.is_empty());
    assert_eq!(
        listed[0].created_at.timestamp_micros(),
        route.created_at.timestamp_micros()
    );
}

#[tokio::test]
async fn reopening_is_idempotent() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let path = temp_dir.path().join("routes.db");

    let store = RouteStore::open(&path).await.unwrap();
    let id = store.insert(&sample_route(0)).await.unwrap();
    drop(store);

    let reopened = RouteStore::open(&path).await.unwrap();
    let listed = reopened.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, Some(id));
}

#[tokio::test]
async fn refuses_database_from_newer_code() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let path = temp_dir.path().join("routes.db");
    RouteStore::open(&path).await.unwrap();

    let mut conn = SqliteConnection::connect_with(&SqliteConnectOptions::new().filename(&path))
        .await
        .unwrap();
    sqlx::query("UPDATE Metadata SET value = '99' WHERE key = 'version'")
        .execute(&mut conn)
        .await
        .unwrap();
    drop(conn);

    match RouteStore::open(&path).await {
        Err(StorageError::VersionTooNew { found: 99, .. }) => (),
        other => panic!("expected version refusal, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn corrupt_coordinate_blob_fails_the_read() {
    let temp_dir = TempDir::new("route_store").unwrap();
    let path = temp_dir.path().join("routes.db");
    let store = RouteStore::open(&path).await.unwrap();
    store.insert(&sample_route(0)).await.unwrap();

    let mut conn = SqliteConnection::connect_with(&SqliteConnectOptions::new().filename(&path))
        .await
        .unwrap();
    sqlx::query("UPDATE Routes SET coordinates = ?1")
        .bind(vec![0xffu8; 4])
        .execute(&mut conn)
        .await
        .unwrap();
    drop(conn);

    match store.list().await {
        Err(StorageError::Read(_)) => (),
        other => panic!("expected read failure, got {:?}", other.map(|routes| routes.len())),
    }
}

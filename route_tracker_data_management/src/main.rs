use std::path::PathBuf;

use chrono::{Duration, Utc};
use route_tracker_data_management::{
    DATA_DIR, DATABASE_PATH,
    database::RouteStore,
    location::{LocationEvent, LocationUpdate, location_channel},
    session::SessionController,
};
use route_tracker_lib::{
    format::{humanize_duration, humanize_number},
    stats::RouteStats,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// CLI smoke path: replays a short simulated location stream through a
// session and prints the stored history.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root: PathBuf = project_root::get_project_root()?;
    let data_dir = root.join(DATA_DIR);
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
    }

    let store = RouteStore::open(root.join(DATABASE_PATH)).await?;
    let mut controller = SessionController::new(store.clone());

    let (tx, rx) = location_channel(16);
    let feeder = tokio::spawn(async move {
        let start = Utc::now();
        let leg = [(52.0, 13.0), (52.004, 13.004), (52.01, 13.01)];
        for (i, (latitude, longitude)) in leg.into_iter().enumerate() {
            let update = LocationUpdate {
                latitude,
                longitude,
                accuracy: Some(5.0),
                timestamp: Some(start + Duration::seconds(30 * i as i64)),
            };
            if tx.send(LocationEvent::Position(update)).await.is_err() {
                break;
            }
        }
    });

    let route_id = controller.run(rx).await?;
    feeder.await?;
    tracing::info!(route_id, "demo session stored");

    let routes = store.list().await?;
    for route in routes.iter().rev() {
        if let Some(id) = route.id {
            println!("route {id}:");
        }
        println!("{}", route.summary());
    }

    let stats = RouteStats::collect(&routes);
    println!("total distance: {} km", humanize_number(stats.total_length_km));
    let total_duration = humanize_duration(stats.total_duration_secs);
    println!(
        "total duration: {}",
        if total_duration.is_empty() { "0 s" } else { total_duration.as_str() }
    );
    println!("mean speed: {} km/h", humanize_number(stats.mean_speed_kmh));

    Ok(())
}

use crate::route::Route;

/// Aggregate statistics over stored routes, as shown on the history
/// view. `mean_speed_kmh` is the arithmetic mean of the per-route
/// average speeds, not total length over total duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteStats {
    pub total_length_km: f64,
    pub total_duration_secs: f64,
    pub mean_speed_kmh: f64,
}

impl RouteStats {
    pub fn collect(routes: &[Route]) -> Self {
        if routes.is_empty() {
            return Self::default();
        }
        Self {
            total_length_km: routes.iter().map(Route::length).sum(),
            total_duration_secs: routes.iter().map(Route::duration).sum(),
            mean_speed_kmh: routes.iter().map(Route::average_speed).sum::<f64>()
                / routes.len() as f64,
        }
    }
}

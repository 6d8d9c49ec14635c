use route_tracker_lib::{geo_point::coordinates_in_range, route::Route};

use crate::{
    SessionError,
    database::RouteStore,
    location::{LocationEvent, LocationReceiver, LocationUpdate},
};

/// State of one live tracking session. Owned by the controller, never
/// held as a process-wide global.
#[derive(Debug, Default)]
pub struct SessionState {
    tracking: bool,
    route: Option<Route>,
}

/// Orchestrates a tracking session: feeds location updates into the
/// active route and hands the route to the store on stop. The route
/// is exclusively owned here while the session is live.
pub struct SessionController {
    state: SessionState,
    store: RouteStore,
}

impl SessionController {
    pub fn new(store: RouteStore) -> Self {
        Self {
            state: SessionState::default(),
            store,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.state.tracking
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.state.route.as_ref()
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state.tracking {
            return Err(SessionError::AlreadyActive);
        }
        self.state.route = Some(Route::new());
        self.state.tracking = true;
        tracing::info!("tracking session started");
        Ok(())
    }

    /// Appends one location update to the active route. Out-of-range
    /// coordinates are rejected here, at the intake boundary; the
    /// route aggregate itself does not validate.
    pub fn record(&mut self, update: LocationUpdate) -> Result<(), SessionError> {
        if !self.state.tracking {
            return Err(SessionError::NotActive);
        }
        if !coordinates_in_range(update.latitude, update.longitude) {
            return Err(SessionError::InvalidCoordinates {
                latitude: update.latitude,
                longitude: update.longitude,
            });
        }
        let route = self.state.route.as_mut().ok_or(SessionError::NotActive)?;
        route.add(update.latitude, update.longitude, update.timestamp);
        Ok(())
    }

    /// Ends the session and persists the route as one record,
    /// returning its assigned id. After this the route is history and
    /// only reachable through the store.
    pub async fn stop(&mut self) -> Result<i64, SessionError> {
        if !self.state.tracking {
            return Err(SessionError::NotActive);
        }
        self.state.tracking = false;
        let route = self.state.route.take().ok_or(SessionError::NotActive)?;
        let id = self.store.insert(&route).await?;
        tracing::info!(route_id = id, points = route.points.len(), "tracking session stored");
        Ok(id)
    }

    /// Drives one full session from a location event stream. Each
    /// event is handled to completion before the next is taken, so
    /// route points keep delivery order. Source errors are logged and
    /// leave the session active; the stream ending (sender dropped)
    /// stops the session and persists the route.
    pub async fn run(&mut self, mut events: LocationReceiver) -> Result<i64, SessionError> {
        self.start()?;
        while let Some(event) = events.recv().await {
            match event {
                LocationEvent::Position(update) => {
                    if let Err(err) = self.record(update) {
                        tracing::warn!("dropping location update: {err}");
                    }
                }
                LocationEvent::Unavailable(err) => {
                    tracing::warn!("location source error: {err}");
                }
            }
        }
        self.stop().await
    }
}

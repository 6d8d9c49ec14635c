use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::LocationError;

/// One observation from the device location source. The core only
/// consumes the coordinates; `accuracy` is a pass-through hint and the
/// timestamp is assigned on receipt when the source omits it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f32>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// What the upstream subscription delivers: either a position or an
/// error report. Dropping the sender ends the subscription; that is
/// the only cancellation surface and it is independent of any
/// in-flight persistence call.
#[derive(Debug, Clone)]
pub enum LocationEvent {
    Position(LocationUpdate),
    Unavailable(LocationError),
}

pub type LocationSender = mpsc::Sender<LocationEvent>;
pub type LocationReceiver = mpsc::Receiver<LocationEvent>;

pub fn location_channel(capacity: usize) -> (LocationSender, LocationReceiver) {
    mpsc::channel(capacity)
}

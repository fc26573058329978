use tokio::sync::broadcast;

use crate::models::assignment::AssignmentEvent;
use crate::observability::metrics::Metrics;
use crate::store::Store;

/// Process-lifetime services shared by the HTTP handlers and the matcher.
pub struct AppState {
    pub store: Store,
    pub assignment_events_tx: broadcast::Sender<AssignmentEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (assignment_events_tx, _unused_rx) = broadcast::channel(event_buffer_size.max(1));

        Self {
            store: Store::new(),
            assignment_events_tx,
            metrics: Metrics::new(),
        }
    }
}

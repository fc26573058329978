use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEvent {
    pub order_id: String,
    pub driver_id: String,
    pub assigned_at: DateTime<Utc>,
}

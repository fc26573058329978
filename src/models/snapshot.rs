use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::driver::Driver;
use crate::models::order::Order;

/// Point-in-time copy of every record in the store.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub drivers: HashMap<String, Driver>,
    pub orders: HashMap<String, Order>,
    pub timestamp: DateTime<Utc>,
}

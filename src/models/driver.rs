use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    Busy,
    Offline,
}

impl DriverStatus {
    pub const ALL: [DriverStatus; 3] = [
        DriverStatus::Available,
        DriverStatus::Busy,
        DriverStatus::Offline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
            DriverStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        DriverStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| StoreError::InvalidStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub status: DriverStatus,
    pub location: Location,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied driver record for an upsert. The status stays a raw
/// string so the store is the one place that validates it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverUpsert {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::DriverStatus;
    use crate::error::StoreError;

    #[test]
    fn parses_every_known_status() {
        for status in DriverStatus::ALL {
            assert_eq!(status.as_str().parse::<DriverStatus>(), Ok(status));
        }
    }

    #[test]
    fn rejects_unknown_and_miscased_status() {
        for raw in ["", "Available", "idle", "busy "] {
            assert_eq!(
                raw.parse::<DriverStatus>(),
                Err(StoreError::InvalidStatus(raw.to_string()))
            );
        }
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical service location. `district` carries the district name; the
/// district's province is resolved through the lookup index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub district: String,
    pub province: Option<String>,
}

/// A type of service offered somewhere in the branch network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Administrative geography. District names are unique system-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub province: String,
}

/// The fact that a given branch offers a given service. Its id is the
/// foreign key appointments carry; branch/service are never referenced
/// from an appointment directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchService {
    #[serde(default)]
    pub id: i64,
    pub branch_id: i64,
    pub service_id: i64,
}

/// Status is an opaque caller-defined string ("on-queue", "COMPLETED", ...).
/// Analytics buckets compare it case-sensitively, filter matching does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub branch_service_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
}

/// Singleton application-wide configuration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub id: i64,
    pub booking_window_days: i32,
    pub min_booking_notice_hours: i32,
    pub default_queue_threshold_low: i32,
    pub default_queue_threshold_moderate: i32,
    pub default_slot_duration_mins: i32,
    pub allow_cancellation_hours: i32,
    pub maintenance_mode_enabled: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Zero-or-one record per branch. A `None` field inherits the global value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfigOverride {
    #[serde(default)]
    pub id: i64,
    pub branch_id: i64,
    pub queue_threshold_low: Option<i32>,
    pub queue_threshold_moderate: Option<i32>,
    pub slot_duration_mins: Option<i32>,
    pub max_appointments_per_slot: Option<i32>,
    pub last_updated: Option<DateTime<Utc>>,
}

use serde::{Deserialize, Serialize};

/// The numeric knobs a branch override may set; anything left out inherits
/// the global value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBranchOverrideRequest {
    pub queue_threshold_low: Option<i32>,
    pub queue_threshold_moderate: Option<i32>,
    pub slot_duration_mins: Option<i32>,
    pub max_appointments_per_slot: Option<i32>,
}

/// Global defaults with any branch override already folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveBranchSettings {
    pub branch_id: i64,
    pub booking_window_days: i32,
    pub min_booking_notice_hours: i32,
    pub queue_threshold_low: i32,
    pub queue_threshold_moderate: i32,
    pub slot_duration_mins: i32,
    pub allow_cancellation_hours: i32,
    pub max_appointments_per_slot: Option<i32>,
    pub maintenance_mode_enabled: bool,
}

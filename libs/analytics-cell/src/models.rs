use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeakGrouping {
    Hour,
    DayOfWeek,
}

impl FromStr for PeakGrouping {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("hour") {
            Ok(PeakGrouping::Hour)
        } else if raw.eq_ignore_ascii_case("dayOfWeek") {
            Ok(PeakGrouping::DayOfWeek)
        } else {
            Err(format!("unknown grouping '{}'", raw))
        }
    }
}

/// One ranked bucket: the hour of day (0-23) or ISO day of week (1=Monday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakBucket {
    pub bucket: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakTimesReport {
    pub group_by: PeakGrouping,
    pub district: Option<String>,
    pub branch_id: Option<i64>,
    pub service_id: Option<i64>,
    pub buckets: Vec<PeakBucket>,
}

/// Outcome counts for one service. Statuses outside the three recognized
/// outcomes contribute to totals only.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcomes {
    pub service_id: i64,
    pub service_name: Option<String>,
    pub completed: u64,
    pub cancelled: u64,
    pub no_show: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchActivityReport {
    pub branch_id: i64,
    pub branch_name: Option<String>,
    pub appointment_count: usize,
    pub services: Vec<ServiceOutcomes>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceActivityReport {
    pub district: String,
    pub service_id: i64,
    pub service_name: Option<String>,
    pub appointment_count: usize,
    pub completed: u64,
    pub cancelled: u64,
    pub no_show: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchActivityQuery {
    pub branch_id: i64,
    pub period: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceActivityQuery {
    pub district: String,
    pub service_id: i64,
    pub period: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeakTimesQuery {
    pub period: String,
    pub group_by: String,
    pub district: Option<String>,
    pub branch_id: Option<i64>,
    pub service_id: Option<i64>,
}

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Appointment enriched with the branch/service identities resolved through
/// the lookup index. Unknown associations leave the derived fields empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: i64,
    pub user_id: i64,
    pub branch_service_id: i64,
    pub branch_id: Option<i64>,
    pub branch_name: Option<String>,
    pub service_id: Option<i64>,
    pub service_name: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: i64,
    pub branch_service_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Filter dimensions for the composite appointment query. Every field is
/// optional; the resolver picks the narrowest store query the supplied
/// subset allows.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub branch_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
    pub district: Option<String>,
}

fn default_page_size() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilteredAppointmentsQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub branch_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
    pub district: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateAndBranchQuery {
    pub date: NaiveDate,
    pub branch_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateAndBranchServiceQuery {
    pub date: NaiveDate,
    pub branch_service_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentPage {
    pub items: Vec<AppointmentView>,
    pub page: usize,
    pub size: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub input_index: usize,
    pub input: CreateAppointmentRequest,
    pub error: String,
}

/// Outcome of a batch booking: items are attempted independently, failures
/// never abort the rest.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCreateOutcome {
    pub total_submitted: usize,
    pub successfully_created: usize,
    pub failed_count: usize,
    pub failures: Vec<BatchFailure>,
}

pub mod booking;
pub mod query;

pub use booking::BookingService;
pub use query::AppointmentQueryService;

use lookup_cell::LookupIndex;
use shared_models::entities::Appointment;

use crate::models::AppointmentView;

/// Resolves the appointment's association through the index and attaches
/// the denormalized branch/service identities.
pub async fn to_view(lookup: &LookupIndex, appointment: &Appointment) -> AppointmentView {
    let key = lookup
        .resolve_branch_service(appointment.branch_service_id)
        .await;

    let (branch_id, branch_name, service_id, service_name) = match key {
        Some(key) => (
            Some(key.branch_id),
            lookup.branch_name(key.branch_id).await,
            Some(key.service_id),
            lookup.service_name(key.service_id).await,
        ),
        None => (None, None, None, None),
    };

    AppointmentView {
        id: appointment.id,
        user_id: appointment.user_id,
        branch_service_id: appointment.branch_service_id,
        branch_id,
        branch_name,
        service_id,
        service_name,
        date: appointment.date,
        time: appointment.time,
        status: appointment.status.clone(),
    }
}

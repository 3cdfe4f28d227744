pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use lookup_cell::LookupIndex;
use shared_store::EntityStore;

pub use models::*;
pub use router::create_appointment_router;
pub use services::{AppointmentQueryService, BookingService};

#[derive(Clone)]
pub struct AppointmentCellState {
    pub store: Arc<dyn EntityStore>,
    pub lookup: Arc<LookupIndex>,
}

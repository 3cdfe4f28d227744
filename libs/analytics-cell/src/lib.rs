pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use lookup_cell::LookupIndex;
use shared_store::EntityStore;

pub use models::*;
pub use router::create_analytics_router;
pub use services::AnalyticsService;

#[derive(Clone)]
pub struct AnalyticsCellState {
    pub store: Arc<dyn EntityStore>,
    pub lookup: Arc<LookupIndex>,
}

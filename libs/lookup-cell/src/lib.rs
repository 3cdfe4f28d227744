pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_store::EntityStore;

pub use error::LookupError;
pub use models::*;
pub use router::create_lookup_router;
pub use services::index::LookupIndex;

#[derive(Clone)]
pub struct LookupCellState {
    pub store: Arc<dyn EntityStore>,
    pub lookup: Arc<LookupIndex>,
}

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

pub use models::*;
pub use router::create_settings_router;
pub use services::SettingsCache;

#[derive(Clone)]
pub struct SettingsCellState {
    pub settings: Arc<SettingsCache>,
}

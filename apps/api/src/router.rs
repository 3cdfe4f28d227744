use std::sync::Arc;

use axum::{routing::get, Router};

use analytics_cell::{create_analytics_router, AnalyticsCellState};
use appointment_cell::{create_appointment_router, AppointmentCellState};
use lookup_cell::{create_lookup_router, LookupCellState, LookupIndex};
use settings_cell::{create_settings_router, SettingsCache, SettingsCellState};
use shared_store::EntityStore;

pub fn create_router(
    store: Arc<dyn EntityStore>,
    lookup: Arc<LookupIndex>,
    settings: Arc<SettingsCache>,
) -> Router {
    let api = Router::new()
        .merge(create_lookup_router(LookupCellState {
            store: store.clone(),
            lookup: lookup.clone(),
        }))
        .nest(
            "/appointments",
            create_appointment_router(AppointmentCellState {
                store: store.clone(),
                lookup: lookup.clone(),
            }),
        )
        .nest(
            "/analytics",
            create_analytics_router(AnalyticsCellState {
                store: store.clone(),
                lookup,
            }),
        )
        .nest(
            "/settings",
            create_settings_router(SettingsCellState { settings }),
        );

    Router::new()
        .route("/", get(|| async { "Queueline API is running!" }))
        .nest("/api", api)
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use lookup_cell::LookupIndex;
use settings_cell::SettingsCache;
use shared_config::AppConfig;
use shared_store::seed::SeedData;
use shared_store::{EntityStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Queueline API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Build the entity store and warm the caches
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    if let Some(path) = &config.seed_path {
        SeedData::from_file(path)?.apply(store.as_ref()).await?;
    }
    let lookup = Arc::new(LookupIndex::load(store.clone()).await?);
    let settings = Arc::new(SettingsCache::load(store.clone()).await?);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(store, lookup, settings)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::new(config.bind_host.parse()?, config.bind_port);
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

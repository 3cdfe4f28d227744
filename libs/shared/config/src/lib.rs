use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub seed_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let bind_port = env::var("BIND_PORT")
            .ok()
            .and_then(|raw| match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("BIND_PORT is not a valid port number, using default");
                    None
                }
            })
            .unwrap_or(3000);

        let seed_path = match env::var("SEED_FILE") {
            Ok(path) if !path.is_empty() => Some(path),
            _ => None,
        };

        Self {
            bind_host,
            bind_port,
            seed_path,
        }
    }
}

//! Process configuration, read from the environment at startup.

use std::path::PathBuf;

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Address the server binds to.
    pub bind_addr: String,
    /// Directory uploaded pictures are written to and served from.
    pub upload_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from environment variables, with dev defaults.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Self {
            jwt_secret,
            bind_addr,
            upload_dir,
        }
    }
}

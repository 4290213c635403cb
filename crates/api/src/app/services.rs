//! Infrastructure wiring shared by all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use connectlife_auth::TokenCodec;
use connectlife_store::Documents;

use crate::config::AppConfig;

/// Shared application services: the document store, the token codec, and the
/// upload directory. One instance per process, behind an `Arc` extension.
pub struct AppServices {
    pub docs: Documents,
    pub codec: Arc<TokenCodec>,
    pub upload_dir: PathBuf,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    if let Err(e) = std::fs::create_dir_all(&config.upload_dir) {
        tracing::warn!(
            "could not create upload dir {}: {e}",
            config.upload_dir.display()
        );
    }

    AppServices {
        docs: Documents::new(),
        codec: Arc::new(TokenCodec::new(config.jwt_secret.as_bytes())),
        upload_dir: config.upload_dir.clone(),
    }
}

//! Backend entry-point: settings, seeding, and server run.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::IdentityStore;
use backend::server::{create_server, Settings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::from_env().map_err(std::io::Error::other)?;

    let store = Arc::new(IdentityStore::new());
    if settings.is_local() {
        store
            .initialize(&settings.seed)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        info!("development fixture seeded");
    }

    create_server(settings, store)?.await
}

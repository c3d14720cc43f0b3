//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain core and remain testable without a running server.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::{IdentityStore, SeedPasswords, TokenCodec};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime store shared by every worker.
    pub store: Arc<IdentityStore>,
    /// Token signer/verifier built from the configured secret.
    pub tokens: TokenCodec,
    /// Lifetime applied to issued access tokens.
    pub token_ttl: Duration,
    /// Passwords for the development fixture accounts.
    pub seed: SeedPasswords,
}

impl AppState {
    /// Build a state bundle around an existing store.
    pub fn new(
        store: Arc<IdentityStore>,
        tokens: TokenCodec,
        token_ttl: Duration,
        seed: SeedPasswords,
    ) -> Self {
        Self {
            store,
            tokens,
            token_ttl,
            seed,
        }
    }
}

//! Helpers shared by handler tests.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use crate::domain::{Email, IdentityStore, SeedPasswords, TokenCodec, User, UserCreate};
use crate::inbound::http::state::AppState;

/// Fresh state bundle around an empty store.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(IdentityStore::new()),
        TokenCodec::new(b"test-secret"),
        Duration::minutes(5),
        SeedPasswords::default(),
    ))
}

/// Create an active user directly in the store.
pub fn spawn_user(
    state: &web::Data<AppState>,
    email: &str,
    password: &str,
    superuser: bool,
) -> User {
    state
        .store
        .create_user(UserCreate {
            email: Email::new(email).expect("valid email"),
            full_name: None,
            is_active: true,
            is_superuser: superuser,
            password: password.into(),
        })
        .expect("create user")
}

/// `Authorization` header value for `user`.
pub fn bearer_for(state: &web::Data<AppState>, user: &User) -> String {
    let token = state
        .tokens
        .issue(user.id(), Duration::minutes(5))
        .expect("issue token");
    format!("Bearer {token}")
}

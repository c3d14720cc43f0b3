//! Bearer-token extractors for authenticated requests.
//!
//! Handlers declare [`CurrentUser`] (or [`CurrentSuperuser`]) as a
//! parameter; extraction reads the `Authorization` header, verifies the
//! token, and resolves the user before the handler body runs. Token
//! resolution is synchronous because the store is in-process.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::domain::{auth, Error, User};
use crate::inbound::http::state::AppState;

/// The authenticated user behind the presented bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Consume the extractor, yielding the resolved user.
    pub fn into_inner(self) -> User {
        self.0
    }
}

fn resolve(req: &HttpRequest) -> Result<User, Error> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| Error::internal("application state not configured"))?;
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthorized("Not authenticated"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("Not authenticated"))?;
    auth::resolve_bearer(&state.store, &state.tokens, token)
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(Self))
    }
}

/// A [`CurrentUser`] that must also hold the superuser flag.
#[derive(Debug, Clone)]
pub struct CurrentSuperuser(pub User);

impl CurrentSuperuser {
    /// Consume the extractor, yielding the resolved superuser.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentSuperuser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).and_then(|user| {
            auth::require_superuser(&user)?;
            Ok(Self(user))
        }))
    }
}

//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod items;
pub mod login;
pub mod private;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod utils;

pub use error::ApiResult;

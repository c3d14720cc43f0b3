//! Backend library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod server;

pub use middleware::SecurityHeaders;

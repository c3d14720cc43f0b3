//! Request middleware.
//!
//! Purpose: define middleware components for response lifecycle concerns
//! such as security headers.

pub mod headers;

pub use headers::SecurityHeaders;

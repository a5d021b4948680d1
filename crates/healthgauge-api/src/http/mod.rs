//! HTTP surface: router, handlers, and middleware.

pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod health;
pub mod router;
pub(crate) mod score;
pub(crate) mod telemetry;

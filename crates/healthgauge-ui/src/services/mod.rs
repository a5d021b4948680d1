//! Network services used by the gauge.

pub mod api;

//! Command handlers.

pub(crate) mod assess;
pub(crate) mod show;

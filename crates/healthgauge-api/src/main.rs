#![forbid(unsafe_code)]
#![deny(
    unused_imports,
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]

//! Binary entrypoint for the health score server.

use healthgauge_api::{AppResult, run};

/// Serve the score API until shutdown.
#[tokio::main]
async fn main() -> AppResult<()> {
    run().await
}

#![forbid(unsafe_code)]
#![deny(
    unused_imports,
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]

//! Binary entrypoint for the `healthgauge` command.

/// Run the CLI and exit with its status code.
#[tokio::main]
async fn main() {
    let code = healthgauge_cli::run().await;
    std::process::exit(code);
}

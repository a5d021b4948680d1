#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Gauge wasm entry point and native stub fallback.

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), std::io::Error> {
    healthgauge_ui::run_app();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), std::io::Error> {
    use std::io::{self, Write};

    const NATIVE_NOTICE: &str = concat!(
        "The healthgauge-ui binary targets wasm32; build with `trunk build` ",
        "or `cargo build --target wasm32-unknown-unknown`.\n"
    );
    let mut stderr = io::stderr().lock();
    stderr.write_all(NATIVE_NOTICE.as_bytes())?;
    Ok(())
}

//! Page lifecycle wiring.

use gloo::events::EventListener;
use healthgauge_core::GaugeUpdater;
use tracing::debug;
use web_sys::DocumentReadyState;

use crate::dom::DomGauge;
use crate::logging;
use crate::services::api::ApiClient;

/// Entrypoint invoked by Trunk for wasm32 builds.
///
/// Refreshes the gauge once: immediately when the document has finished
/// parsing, otherwise on `DOMContentLoaded`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    logging::install();

    let document = gloo::utils::document();
    if matches!(document.ready_state(), DocumentReadyState::Loading) {
        EventListener::once(&document, "DOMContentLoaded", |_| spawn_refresh()).forget();
    } else {
        spawn_refresh();
    }
}

fn spawn_refresh() {
    wasm_bindgen_futures::spawn_local(async {
        let document = gloo::utils::document();
        let updater = GaugeUpdater::new(ApiClient::from_document(&document));
        let mut gauge = DomGauge::new(document);
        match updater.boot(&mut gauge).await {
            Some(outcome) => debug!(?outcome, "gauge refresh finished"),
            None => debug!("gauge not present on this page"),
        }
    });
}

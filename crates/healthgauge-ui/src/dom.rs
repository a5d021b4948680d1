//! Gauge target backed by the live document.

use healthgauge_core::{GAUGE_FILL_ID, GAUGE_VALUE_ID, GaugeTarget};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Looks the gauge elements up by id on every access.
pub struct DomGauge {
    document: Document,
}

impl DomGauge {
    /// Wrap a document.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl GaugeTarget for DomGauge {
    fn has_value_element(&self) -> bool {
        self.element(GAUGE_VALUE_ID).is_some()
    }

    fn has_fill_element(&self) -> bool {
        self.element(GAUGE_FILL_ID).is_some()
    }

    fn set_value_text(&mut self, text: &str) {
        if let Some(element) = self.element(GAUGE_VALUE_ID) {
            element.set_text_content(Some(text));
        }
    }

    fn set_fill_transform(&mut self, transform: &str) {
        let Some(element) = self.element(GAUGE_FILL_ID) else {
            return;
        };
        let Some(fill) = element.dyn_ref::<HtmlElement>() else {
            warn!("gauge fill is not an HTML element; transform skipped");
            return;
        };
        if let Err(err) = fill.style().set_property("transform", transform) {
            warn!(error = ?err, "failed to set gauge fill transform");
        }
    }
}

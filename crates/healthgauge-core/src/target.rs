//! Rendering seam for the gauge.
//!
//! # Design
//! - The updater never reaches for global page state; it writes through a target.
//! - Element presence is queried at write time, after the fetch resolves.
//! - `GaugeModel` is the in-memory target used by the terminal client and tests.

/// Surface that can display a gauge reading.
pub trait GaugeTarget {
    /// Whether the numeric label element is mounted.
    fn has_value_element(&self) -> bool;

    /// Whether the rotating fill element is mounted.
    fn has_fill_element(&self) -> bool;

    /// Replace the label text.
    fn set_value_text(&mut self, text: &str);

    /// Replace the fill's CSS transform.
    fn set_fill_transform(&mut self, transform: &str);
}

/// In-memory gauge holding the last written label and transform.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GaugeModel {
    value_mounted: bool,
    fill_mounted: bool,
    value_text: Option<String>,
    fill_transform: Option<String>,
    writes: usize,
}

impl GaugeModel {
    /// A gauge with both elements mounted and nothing rendered yet.
    #[must_use]
    pub const fn mounted() -> Self {
        Self::with_elements(true, true)
    }

    /// A gauge with the given elements mounted.
    #[must_use]
    pub const fn with_elements(value_mounted: bool, fill_mounted: bool) -> Self {
        Self {
            value_mounted,
            fill_mounted,
            value_text: None,
            fill_transform: None,
            writes: 0,
        }
    }

    /// Last label written, if any.
    #[must_use]
    pub fn value_text(&self) -> Option<&str> {
        self.value_text.as_deref()
    }

    /// Last transform written, if any.
    #[must_use]
    pub fn fill_transform(&self) -> Option<&str> {
        self.fill_transform.as_deref()
    }

    /// Number of element writes performed.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Whether anything has been written.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        self.writes > 0
    }
}

impl GaugeTarget for GaugeModel {
    fn has_value_element(&self) -> bool {
        self.value_mounted
    }

    fn has_fill_element(&self) -> bool {
        self.fill_mounted
    }

    fn set_value_text(&mut self, text: &str) {
        self.value_text = Some(text.to_string());
        self.writes += 1;
    }

    fn set_fill_transform(&mut self, transform: &str) {
        self.fill_transform = Some(transform.to_string());
        self.writes += 1;
    }
}

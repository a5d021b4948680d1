//! Gauge geometry and CSS formatting.
//!
//! # Design
//! - The fill sweeps a half circle: score 0 sits at -90 degrees, 100 at +90.
//! - No clamping; out-of-range scores rotate past the ends.

use crate::score::ScoreValue;

/// Rotation in degrees for a score, `(score / 100) * 180 - 90`.
#[must_use]
pub fn rotation_degrees(score: f64) -> f64 {
    (score / 100.0) * 180.0 - 90.0
}

/// Format a number the way a browser stringifies it into CSS text.
#[must_use]
pub fn format_css_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    exponent_form(value)
}

/// `1e-7`, `1.5e+21`: shortest digits with an explicitly signed exponent.
fn exponent_form(value: f64) -> String {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// CSS transform value for a rotation.
#[must_use]
pub fn fill_transform(degrees: f64) -> String {
    format!("rotate({}deg)", format_css_number(degrees))
}

/// What one refresh writes into the gauge.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeReading {
    /// Text placed in the value element.
    pub label: String,
    /// Fill rotation in degrees.
    pub rotation_deg: f64,
}

impl GaugeReading {
    /// Derive the label and rotation from a raw score.
    #[must_use]
    pub fn from_score(score: &ScoreValue) -> Self {
        Self {
            label: score.display_text(),
            rotation_deg: rotation_degrees(score.as_number()),
        }
    }

    /// CSS transform for the fill element.
    #[must_use]
    pub fn transform(&self) -> String {
        fill_transform(self.rotation_deg)
    }
}

//! The raw `health_score` value as delivered by the backend.
//!
//! # Design
//! - Keep the JSON value untouched; the gauge shows whatever arrived.
//! - Text and numeric coercions mirror what a browser does when the value is
//!   assigned to `textContent` or divided by 100.
//! - No range or type validation.

use serde_json::Value;

use crate::api::HEALTH_SCORE_FIELD;
use crate::gauge::format_css_number;

/// The `health_score` field of a response body in its raw JSON form.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreValue(Value);

impl ScoreValue {
    /// Wrap a raw JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Pull the score out of a response body.
    ///
    /// Returns `None` when the body is not an object or lacks the field. An
    /// explicit JSON `null` counts as present.
    #[must_use]
    pub fn extract(body: &Value) -> Option<Self> {
        body.as_object()?
            .get(HEALTH_SCORE_FIELD)
            .cloned()
            .map(Self)
    }

    /// Borrow the raw JSON value.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.0
    }

    /// Text shown in the value element.
    #[must_use]
    pub fn display_text(&self) -> String {
        display_value(&self.0)
    }

    /// Numeric coercion used for the rotation; `NaN` when nothing numeric is found.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match &self.0 {
            Value::Null | Value::Bool(false) => 0.0,
            Value::Bool(true) => 1.0,
            Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
            Value::String(text) => parse_numeric_text(text),
            Value::Array(_) | Value::Object(_) => parse_numeric_text(&self.display_text()),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        // text content set to null clears the node; array holes print empty
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                number.to_string()
            } else {
                format_css_number(number.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, u64_to_f64);
        }
    }
    // reject spellings the browser does not accept, like "inf" or "nan"
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn u64_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high).mul_add(4_294_967_296.0, f64::from(low))
}

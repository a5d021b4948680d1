//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use healthgauge_core::{GaugeModel, HealthScoreResponse, RefreshOutcome, Severity};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const NEEDLE_WIDTH: u8 = 20;

/// Machine-readable view of the gauge after a refresh.
#[derive(Debug, Serialize)]
pub(crate) struct GaugeView<'a> {
    pub(crate) status: &'static str,
    pub(crate) label: Option<&'a str>,
    pub(crate) transform: Option<&'a str>,
    pub(crate) rotation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<&'a str>,
}

impl<'a> GaugeView<'a> {
    pub(crate) fn new(gauge: &'a GaugeModel, outcome: Option<&'a RefreshOutcome>) -> Self {
        let (status, rotation_deg, detail) = match outcome {
            None => ("skipped", None, None),
            Some(RefreshOutcome::Rendered(reading)) => {
                ("rendered", Some(reading.rotation_deg), None)
            }
            Some(RefreshOutcome::MissingScore) => ("missing_score", None, None),
            Some(RefreshOutcome::MissingElements) => ("missing_elements", None, None),
            Some(RefreshOutcome::Failed(err)) => ("failed", None, Some(err.detail())),
        };
        Self {
            status,
            label: gauge.value_text(),
            transform: gauge.fill_transform(),
            rotation_deg,
            detail,
        }
    }
}

pub(crate) fn render_gauge(view: &GaugeView<'_>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(view)?),
        OutputFormat::Table => print!("{}", format_gauge(view)),
    }
    Ok(())
}

pub(crate) fn render_assessment(
    severity: Severity,
    response: &HealthScoreResponse,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(response)?),
        OutputFormat::Table => {
            println!("severity: {}", severity.as_str());
            println!("health score: {}", response.health_score);
        }
    }
    Ok(())
}

/// Text rendering of a gauge view.
pub(crate) fn format_gauge(view: &GaugeView<'_>) -> String {
    let Some(rotation) = view.rotation_deg else {
        let mut text = format!("gauge not updated ({})\n", view.status);
        if let Some(detail) = view.detail {
            text.push_str("reason: ");
            text.push_str(detail);
            text.push('\n');
        }
        return text;
    };
    format!(
        "score: {}\nangle: {}\ngauge: {}\n",
        view.label.unwrap_or_default(),
        view.transform.unwrap_or_default(),
        needle_bar(rotation, NEEDLE_WIDTH)
    )
}

/// Horizontal bar filled in proportion to the needle sweep from -90 to 90 degrees.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn needle_bar(rotation_deg: f64, width: u8) -> String {
    let filled = if rotation_deg.is_nan() {
        0
    } else {
        let fraction = ((rotation_deg + 90.0) / 180.0).clamp(0.0, 1.0);
        (fraction * f64::from(width)).round() as u8
    };
    let mut bar = String::with_capacity(usize::from(width) + 2);
    bar.push('[');
    for cell in 0..width {
        bar.push(if cell < filled { '#' } else { '.' });
    }
    bar.push(']');
    bar
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

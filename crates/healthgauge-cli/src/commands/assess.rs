use anyhow::anyhow;
use healthgauge_core::api::ASSESSMENTS_PATH;
use healthgauge_core::{AssessmentRequest, HealthScoreResponse, Severity};

use crate::cli::{AssessArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::output::render_assessment;

pub(crate) async fn handle_assess(
    ctx: &AppContext,
    args: AssessArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let severity = Severity::from(args.severity);
    let response = submit_assessment(ctx, severity).await?;
    render_assessment(severity, &response, format)
}

pub(crate) async fn submit_assessment(
    ctx: &AppContext,
    severity: Severity,
) -> CliResult<HealthScoreResponse> {
    let url = ctx.endpoint(ASSESSMENTS_PATH)?;
    let payload = AssessmentRequest {
        severity: severity.as_str().to_string(),
    };

    let response = ctx
        .authorize(ctx.client.post(url))
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!("request to {ASSESSMENTS_PATH} failed: {err}"))
        })?;

    if response.status().is_success() {
        response
            .json::<HealthScoreResponse>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse health score: {err}")))
    } else {
        Err(classify_problem(response).await)
    }
}

use healthgauge_core::{GaugeModel, GaugeUpdater, RefreshOutcome};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult, ReqwestScoreSource};
use crate::output::{GaugeView, render_gauge};

pub(crate) async fn handle_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let (gauge, outcome) = load_gauge(ctx).await;
    render_gauge(&GaugeView::new(&gauge, outcome.as_ref()), format)
}

/// Run one refresh against a fully mounted in-memory gauge.
pub(crate) async fn load_gauge(ctx: &AppContext) -> (GaugeModel, Option<RefreshOutcome>) {
    let updater = GaugeUpdater::new(ReqwestScoreSource::new(ctx.clone()));
    let mut gauge = GaugeModel::mounted();
    let outcome = updater.boot(&mut gauge).await;
    (gauge, outcome)
}

//! Single-shot gauge refresh.
//!
//! # Design
//! - One fetch, one render, no retries, no caching, no cancellation.
//! - Every failure is contained: logged once and reported as [`RefreshOutcome::Failed`].
//! - Both elements are checked together; either missing means no writes at all.
//! - Concurrent refreshes are not coordinated; the last one to resolve wins.

use tracing::{debug, error};

use crate::error::FetchError;
use crate::gauge::GaugeReading;
use crate::score::ScoreValue;
use crate::source::ScoreSource;
use crate::target::GaugeTarget;

/// What a refresh ended up doing.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshOutcome {
    /// Both elements were updated with this reading.
    Rendered(GaugeReading),
    /// The body had no `health_score`; nothing was touched.
    MissingScore,
    /// A score arrived but one of the elements was not mounted.
    MissingElements,
    /// Fetching or parsing failed; the failure was logged.
    Failed(FetchError),
}

/// Fetches the score and writes it into a gauge target.
#[derive(Clone, Debug)]
pub struct GaugeUpdater<S> {
    source: S,
}

impl<S: ScoreSource> GaugeUpdater<S> {
    /// Build an updater over a score source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Page-ready entry point.
    ///
    /// Skips the fetch entirely when the value element is not mounted and
    /// returns `None` in that case.
    pub async fn boot<T: GaugeTarget + ?Sized>(&self, target: &mut T) -> Option<RefreshOutcome> {
        if !target.has_value_element() {
            debug!("gauge value element not mounted; skipping refresh");
            return None;
        }
        Some(self.refresh(target).await)
    }

    /// Fetch the score once and render it.
    pub async fn refresh<T: GaugeTarget + ?Sized>(&self, target: &mut T) -> RefreshOutcome {
        match self.load_score().await {
            Ok(Some(score)) => render(target, &score),
            Ok(None) => {
                debug!("response carried no health score");
                RefreshOutcome::MissingScore
            }
            Err(err) => {
                error!(error = %err, detail = err.detail(), "Error updating health score");
                RefreshOutcome::Failed(err)
            }
        }
    }

    async fn load_score(&self) -> Result<Option<ScoreValue>, FetchError> {
        let body = self.source.fetch_score_body().await?;
        if body.is_null() {
            return Err(FetchError::NullBody);
        }
        Ok(ScoreValue::extract(&body))
    }
}

fn render<T: GaugeTarget + ?Sized>(target: &mut T, score: &ScoreValue) -> RefreshOutcome {
    if !(target.has_value_element() && target.has_fill_element()) {
        debug!("gauge elements missing; leaving page untouched");
        return RefreshOutcome::MissingElements;
    }
    let reading = GaugeReading::from_score(score);
    target.set_value_text(&reading.label);
    target.set_fill_transform(&reading.transform());
    debug!(
        label = %reading.label,
        rotation_deg = reading.rotation_deg,
        "gauge updated"
    );
    RefreshOutcome::Rendered(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::GaugeModel;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    enum Scripted {
        Body(Value),
        Fail(FetchError),
    }

    struct ScriptedSource {
        response: Scripted,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn body(body: Value) -> Self {
            Self {
                response: Scripted::Body(body),
                calls: Cell::new(0),
            }
        }

        fn failing(err: FetchError) -> Self {
            Self {
                response: Scripted::Fail(err),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl ScoreSource for ScriptedSource {
        async fn fetch_score_body(&self) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            match &self.response {
                Scripted::Body(body) => Ok(body.clone()),
                Scripted::Fail(err) => Err(err.clone()),
            }
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            self.0
                .lock()
                .map(|buf| String::from_utf8_lossy(&buf).into_owned())
                .unwrap_or_default()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| io::Error::other("poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn renders_score_into_both_elements() {
        let updater = GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": 75 })));
        let mut gauge = GaugeModel::mounted();

        let outcome = updater.refresh(&mut gauge).await;

        assert!(matches!(outcome, RefreshOutcome::Rendered(_)));
        assert_eq!(gauge.value_text(), Some("75"));
        assert_eq!(gauge.fill_transform(), Some("rotate(45deg)"));
    }

    #[tokio::test]
    async fn boundary_scores_map_to_gauge_ends() {
        for (score, transform) in [
            (0, "rotate(-90deg)"),
            (50, "rotate(0deg)"),
            (100, "rotate(90deg)"),
        ] {
            let updater =
                GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": score })));
            let mut gauge = GaugeModel::mounted();
            updater.refresh(&mut gauge).await;
            assert_eq!(gauge.fill_transform(), Some(transform));
        }
    }

    #[tokio::test]
    async fn missing_score_leaves_gauge_untouched() {
        let updater = GaugeUpdater::new(ScriptedSource::body(
            json!({ "error": "Not authenticated" }),
        ));
        let mut gauge = GaugeModel::mounted();

        let outcome = updater.refresh(&mut gauge).await;

        assert_eq!(outcome, RefreshOutcome::MissingScore);
        assert_eq!(gauge.writes(), 0);
    }

    #[tokio::test]
    async fn either_missing_element_blocks_all_writes() {
        for (value, fill) in [(true, false), (false, true), (false, false)] {
            let updater =
                GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": 30 })));
            let mut gauge = GaugeModel::with_elements(value, fill);

            let outcome = updater.refresh(&mut gauge).await;

            assert_eq!(outcome, RefreshOutcome::MissingElements);
            assert_eq!(gauge.writes(), 0);
        }
    }

    #[tokio::test]
    async fn boot_skips_fetch_without_value_element() {
        let source = ScriptedSource::body(json!({ "health_score": 30 }));
        let updater = GaugeUpdater::new(source);
        let mut gauge = GaugeModel::with_elements(false, true);

        let outcome = updater.boot(&mut gauge).await;

        assert!(outcome.is_none());
        assert_eq!(updater.source.calls.get(), 0);
    }

    #[tokio::test]
    async fn boot_fetches_when_value_element_present() {
        let updater = GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": 20 })));
        let mut gauge = GaugeModel::mounted();

        let outcome = updater.boot(&mut gauge).await;

        assert!(matches!(outcome, Some(RefreshOutcome::Rendered(_))));
        assert_eq!(updater.source.calls.get(), 1);
        assert_eq!(gauge.value_text(), Some("20"));
    }

    #[tokio::test]
    async fn failures_are_contained_and_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        for err in [
            FetchError::transport("connection refused"),
            FetchError::decode("expected value at line 1 column 1"),
        ] {
            let updater = GaugeUpdater::new(ScriptedSource::failing(err.clone()));
            let mut gauge = GaugeModel::mounted();

            let outcome = updater.refresh(&mut gauge).await;

            assert_eq!(outcome, RefreshOutcome::Failed(err));
            assert_eq!(gauge.writes(), 0);
        }

        let output = logs.contents();
        assert!(output.contains("Error updating health score"));
        assert!(output.contains("connection refused"));
        assert!(output.contains("expected value at line 1 column 1"));
    }

    #[tokio::test]
    async fn null_body_is_a_failure() {
        let updater = GaugeUpdater::new(ScriptedSource::body(Value::Null));
        let mut gauge = GaugeModel::mounted();

        let outcome = updater.refresh(&mut gauge).await;

        assert_eq!(outcome, RefreshOutcome::Failed(FetchError::NullBody));
        assert_eq!(gauge.writes(), 0);
    }

    #[tokio::test]
    async fn string_scores_are_displayed_verbatim() {
        let updater = GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": "n/a" })));
        let mut gauge = GaugeModel::mounted();

        updater.refresh(&mut gauge).await;

        assert_eq!(gauge.value_text(), Some("n/a"));
        assert_eq!(gauge.fill_transform(), Some("rotate(NaNdeg)"));
    }

    #[tokio::test]
    async fn later_refresh_overwrites_earlier_one() {
        let mut gauge = GaugeModel::mounted();
        GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": 10 })))
            .refresh(&mut gauge)
            .await;
        GaugeUpdater::new(ScriptedSource::body(json!({ "health_score": 90 })))
            .refresh(&mut gauge)
            .await;

        assert_eq!(gauge.value_text(), Some("90"));
        assert_eq!(gauge.fill_transform(), Some("rotate(72deg)"));
        assert_eq!(gauge.writes(), 4);
    }
}

//! JSON output formatter for machine processing
//!
//! Nothing is printed while the run is in progress; the whole document is
//! written once every outcome and error record is known.

use crate::classify::Classifier;
use crate::domain::{Classification, ErrorRecord, RegistrySource, ResolutionOutcome};
use crate::orchestrator::RunReport;
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full run
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Per-library results in completion order
    results: Vec<JsonResult<'a>>,
    /// Error records in arrival order
    errors: &'a [ErrorRecord],
    /// Wall-clock duration of the run
    elapsed_ms: u128,
}

/// JSON representation of one library
#[derive(Serialize)]
struct JsonResult<'a> {
    name: &'a str,
    current_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<RegistrySource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
    classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_id: Option<u32>,
}

impl<'a> JsonResult<'a> {
    fn from_outcome(outcome: &'a ResolutionOutcome, classifier: &Classifier) -> Self {
        let result = outcome.result.as_ref();
        Self {
            name: &outcome.spec.name,
            current_version: &outcome.spec.current_version,
            latest_version: result.and_then(|r| r.latest()),
            source: result.map(|r| r.source),
            published_at: result.and_then(|r| r.published_at),
            classification: classifier.classify(outcome),
            failure_id: outcome.failure_id,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn begin(&self, _writer: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn outcome(
        &self,
        _outcome: &ResolutionOutcome,
        _classifier: &Classifier,
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }

    fn finish(
        &self,
        report: &RunReport,
        classifier: &Classifier,
        elapsed: Duration,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonOutput {
            results: report
                .outcomes
                .iter()
                .map(|o| JsonResult::from_outcome(o, classifier))
                .collect(),
            errors: &report.errors,
            elapsed_ms: elapsed.as_millis(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}

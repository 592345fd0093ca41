//! Output formatting for resolution results
//!
//! This module provides:
//! - Text output: a colored table streamed row by row
//! - JSON output for machine processing, written once the run completes

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::classify::Classifier;
use crate::domain::ResolutionOutcome;
use crate::orchestrator::RunReport;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Whether to use colors (when supported)
    pub color: bool,
    /// Config file named in the migration legend
    pub config_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            config_path: None,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, no_color: bool, config_path: Option<PathBuf>) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        Self {
            format,
            color: !no_color,
            config_path,
        }
    }
}

/// Trait for output formatters
///
/// `begin` runs before dispatch, `outcome` once per completed resolution
/// and `finish` after the error list has been collected.
pub trait OutputFormatter {
    /// Write anything that precedes the results
    fn begin(&self, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Write a single completed outcome
    fn outcome(
        &self,
        outcome: &ResolutionOutcome,
        classifier: &Classifier,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Write the closing section for the whole run
    fn finish(
        &self,
        report: &RunReport,
        classifier: &Classifier,
        elapsed: Duration,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.color, config.config_path)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

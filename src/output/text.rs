//! Text output formatter for human-readable display
//!
//! Prints a fixed-width table, one row per library as soon as its lookup
//! completes, colored by classification. The legend, elapsed time and the
//! error listing follow once the run is finished.

use crate::classify::Classifier;
use crate::domain::{Classification, ResolutionOutcome};
use crate::orchestrator::RunReport;
use crate::output::OutputFormatter;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Horizontal rule matching the column widths
const RULE: &str = "|------------------------------|----------|----------|----------|------------|";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
    /// Config file named in the migration legend
    config_path: Option<PathBuf>,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::with_color(true, None)
    }

    /// Create a new text formatter with color option
    pub fn with_color(color: bool, config_path: Option<PathBuf>) -> Self {
        Self { color, config_path }
    }

    /// Format one table row
    fn format_row(columns: [&str; 5]) -> String {
        format!(
            "|{:>30}|{:>10}|{:>10}|{:>10}|{:>12}|",
            columns[0], columns[1], columns[2], columns[3], columns[4]
        )
    }

    /// Build the row for an outcome in its tier
    pub fn row(outcome: &ResolutionOutcome, classification: Classification) -> String {
        let spec = &outcome.spec;
        let latest = outcome
            .result
            .as_ref()
            .and_then(|r| r.latest())
            .unwrap_or("");
        let source = outcome
            .result
            .as_ref()
            .map(|r| r.source.display_name())
            .unwrap_or("");

        match classification {
            Classification::FlaggedForRemoval | Classification::UpToDate => {
                Self::format_row([&spec.name, &spec.current_version, latest, source, ""])
            }
            Classification::Unresolvable => {
                let marker = outcome
                    .failure_id
                    .map(|id| format!("err[{}]", id))
                    .unwrap_or_else(|| "err".to_string());
                Self::format_row([&spec.name, &spec.current_version, &marker, "", ""])
            }
            Classification::Outdated => {
                let updated = outcome
                    .result
                    .as_ref()
                    .and_then(|r| r.published_at)
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                Self::format_row([&spec.name, &spec.current_version, latest, source, &updated])
            }
        }
    }

    /// Apply the tier color to a line
    fn paint(&self, line: &str, classification: Classification) -> String {
        if !self.color {
            return line.to_string();
        }
        match classification {
            Classification::UpToDate => line.green().to_string(),
            Classification::Outdated => line.red().to_string(),
            Classification::Unresolvable => line.yellow().to_string(),
            Classification::FlaggedForRemoval => line.magenta().to_string(),
        }
    }

    /// Write the color legend
    fn write_legend(&self, migration: bool, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "So colorful! What does it mean?")?;
        writeln!(
            writer,
            "{}",
            self.paint("Library up to date!", Classification::UpToDate)
        )?;
        writeln!(
            writer,
            "{}",
            self.paint("Ouch! Not the latest...", Classification::Outdated)
        )?;
        writeln!(
            writer,
            "{}",
            self.paint(
                "Something went wrong! If the library is only on the secondary registry, make sure it is reachable.",
                Classification::Unresolvable
            )
        )?;

        if migration {
            let described_by = self
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the configuration".to_string());
            writeln!(
                writer,
                "{}",
                self.paint(
                    &format!("To be removed for upgrade described by {}", described_by),
                    Classification::FlaggedForRemoval
                )
            )?;
        }

        Ok(())
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TextFormatter {
    fn begin(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", RULE)?;
        writeln!(
            writer,
            "{}",
            Self::format_row(["Library", "Current", "Latest", "On", "Updated"])
        )?;
        writeln!(writer, "{}", RULE)
    }

    fn outcome(
        &self,
        outcome: &ResolutionOutcome,
        classifier: &Classifier,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let classification = classifier.classify(outcome);
        let row = Self::row(outcome, classification);
        writeln!(writer, "{}", self.paint(&row, classification))
    }

    fn finish(
        &self,
        report: &RunReport,
        classifier: &Classifier,
        elapsed: Duration,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "{}", RULE)?;
        self.write_legend(classifier.migration_mode(), writer)?;
        writeln!(writer)?;
        writeln!(writer, "Elapsed: {:?}", elapsed)?;

        if !report.errors.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Errors:")?;
            for record in &report.errors {
                writeln!(writer, "{}", record)?;
            }
        }

        Ok(())
    }
}

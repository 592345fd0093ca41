//! Library declaration extraction from sbt-style build descriptors
//!
//! Declarations look like:
//! `"uk.gov.hmrc" %% "play-ui" % "7.2.0"`
//!
//! Only libraries published under the configured organization are picked up.

use crate::domain::LibrarySpec;
use crate::error::ExtractError;
use regex::Regex;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::debug;

/// Default organization whose libraries are checked
pub const DEFAULT_ORGANIZATION: &str = "uk.gov.hmrc";

/// Channel capacity between the scanner and the dispatcher
const CHANNEL_CAPACITY: usize = 16;

/// Scans descriptor text for library declarations
#[derive(Debug, Clone)]
pub struct DeclarationScanner {
    pattern: Regex,
}

impl DeclarationScanner {
    /// Create a scanner for an organization
    pub fn new(organization: &str) -> Result<Self, ExtractError> {
        let pattern = format!(
            r#"{}".*?%%.*?"(.*?)".*?%.*?"(.*?)""#,
            regex::escape(organization)
        );
        let pattern = Regex::new(&pattern).map_err(|e| ExtractError::InvalidPattern {
            organization: organization.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { pattern })
    }

    /// Extract every declaration in order of appearance
    pub fn scan(&self, content: &str) -> Vec<LibrarySpec> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                let version = caps.get(2)?.as_str();
                Some(LibrarySpec::new(name, version))
            })
            .collect()
    }

    /// Stream declarations into a channel from a background task
    ///
    /// The receiver yields declarations incrementally and closes once the
    /// content has been fully scanned.
    pub fn stream(&self, content: String) -> mpsc::Receiver<LibrarySpec> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let scanner = self.clone();

        tokio::spawn(async move {
            for spec in scanner.scan(&content) {
                debug!(library = %spec.name, version = %spec.current_version, "found declaration");
                if tx.send(spec).await.is_err() {
                    break;
                }
            }
        });

        rx
    }
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        Self::new(DEFAULT_ORGANIZATION).expect("default organization pattern is valid")
    }
}

/// Read a build descriptor from disk
pub async fn read_descriptor(path: &Path) -> Result<String, ExtractError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })
}

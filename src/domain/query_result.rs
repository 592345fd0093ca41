//! Registry query result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which registry produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrySource {
    /// Structured-data registry, always consulted first
    Primary,
    /// Directory listing registry, consulted when the primary reports 404
    Secondary,
}

impl RegistrySource {
    /// Returns the short label shown in the "On" column
    pub fn display_name(&self) -> &'static str {
        match self {
            RegistrySource::Primary => "Primary",
            RegistrySource::Secondary => "Secondary",
        }
    }
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of a single successful registry lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryQueryResult {
    /// Registry that answered
    pub source: RegistrySource,
    /// Latest published version; `None` means no usable version was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// Publish time of the latest version, when the registry reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl RegistryQueryResult {
    /// Creates a result carrying a latest version
    pub fn new(source: RegistrySource, latest_version: impl Into<String>) -> Self {
        Self {
            source,
            latest_version: Some(latest_version.into()),
            published_at: None,
        }
    }

    /// Sets the publish timestamp (builder pattern)
    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    /// Returns the latest version if one was found
    pub fn latest(&self) -> Option<&str> {
        self.latest_version.as_deref()
    }
}

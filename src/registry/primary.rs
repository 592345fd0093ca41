//! Primary registry adapter
//!
//! Fetches the latest release from a structured-data endpoint.
//! Response shape: `{"name": "0.14.0", "updated": "2017-03-08T10:34:03.000Z"}`

use crate::domain::{RegistryQueryResult, RegistrySource};
use crate::error::RegistryError;
use crate::registry::{expand_template, HttpClient, Registry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Default latest-version endpoint
pub const DEFAULT_PRIMARY_URL: &str =
    "https://api.bintray.com/packages/hmrc/releases/{name}/versions/_latest";

/// Primary registry adapter
pub struct PrimaryRegistry {
    client: HttpClient,
    url_template: String,
}

/// Latest version response
#[derive(Debug, Deserialize)]
struct LatestVersionResponse {
    /// Version string
    name: String,
    /// Publish timestamp
    #[serde(default, alias = "updatedAt")]
    updated: Option<String>,
}

impl PrimaryRegistry {
    /// Create a new primary adapter for a URL template
    pub fn new(client: HttpClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Build the URL for a library
    fn build_url(&self, name: &str) -> String {
        expand_template(&self.url_template, name)
    }

    /// Parse the publish timestamp, ignoring malformed values
    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[async_trait]
impl Registry for PrimaryRegistry {
    fn source(&self) -> RegistrySource {
        RegistrySource::Primary
    }

    async fn fetch_latest(&self, name: &str) -> Result<RegistryQueryResult, RegistryError> {
        let registry = self.source().display_name();
        let url = self.build_url(name);
        let response: LatestVersionResponse = self.client.get_json(&url, name, registry).await?;

        let version = response.name.trim();
        if version.is_empty() {
            return Err(RegistryError::decode(name, registry, "empty version name"));
        }

        let published_at = response.updated.as_deref().and_then(Self::parse_timestamp);
        debug!(library = name, version, "primary registry resolved");

        Ok(RegistryQueryResult::new(self.source(), version).with_published_at(published_at))
    }
}

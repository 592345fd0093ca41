//! Secondary registry adapter
//!
//! Fetches a repository directory listing and selects the highest
//! semantic version among its directory entries. Each release appears as
//! an anchor whose text is the version followed by a slash:
//! `<a href=".../play-ui_2.11/7.2.0/">7.2.0/</a>`
//!
//! The listing carries no publish dates.

use crate::classify::max_version;
use crate::domain::{RegistryQueryResult, RegistrySource};
use crate::error::RegistryError;
use crate::registry::{expand_template, HttpClient, Registry};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Default repository listing endpoint
pub const DEFAULT_SECONDARY_URL: &str =
    "https://nexus-dev.tax.service.gov.uk/content/repositories/hmrc-releases/uk/gov/hmrc/{name}_2.11/";

/// Directory entry: anchor text ending with a slash
static DIRECTORY_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a\s[^>]*>\s*([^<>/\s]+)/\s*</a>").unwrap());

/// Secondary registry adapter
pub struct SecondaryRegistry {
    client: HttpClient,
    url_template: String,
}

impl SecondaryRegistry {
    /// Create a new secondary adapter for a URL template
    pub fn new(client: HttpClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Build the listing URL for a library
    fn build_url(&self, name: &str) -> String {
        expand_template(&self.url_template, name)
    }
}

/// Extract every directory entry token from a listing body
pub fn extract_versions(body: &str) -> Vec<&str> {
    DIRECTORY_ENTRY_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[async_trait]
impl Registry for SecondaryRegistry {
    fn source(&self) -> RegistrySource {
        RegistrySource::Secondary
    }

    async fn fetch_latest(&self, name: &str) -> Result<RegistryQueryResult, RegistryError> {
        let registry = self.source().display_name();
        let url = self.build_url(name);
        let body = self.client.get_text(&url, name, registry).await?;

        let tokens = extract_versions(&body);
        debug!(library = name, entries = tokens.len(), "parsed listing");

        let latest = max_version(tokens)
            .ok_or_else(|| RegistryError::no_versions_found(name, registry))?;

        Ok(RegistryQueryResult::new(self.source(), latest.to_string()))
    }
}

//! Registry adapters for fetching the latest library version
//!
//! This module provides:
//! - HTTP client shared foundation with a per-request deadline
//! - Primary adapter for the structured-data endpoint
//! - Secondary adapter for the HTML directory listing

mod client;
mod primary;
mod secondary;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use primary::{PrimaryRegistry, DEFAULT_PRIMARY_URL};
pub use secondary::{extract_versions, SecondaryRegistry, DEFAULT_SECONDARY_URL};

use crate::domain::{RegistryQueryResult, RegistrySource};
use crate::error::RegistryError;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Placeholder substituted with the library name in URL templates
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Trait for registry adapters
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Which registry this adapter talks to
    fn source(&self) -> RegistrySource;

    /// Fetch the latest published version for a library
    async fn fetch_latest(&self, name: &str) -> Result<RegistryQueryResult, RegistryError>;
}

/// Expand a URL template for a library name
pub fn expand_template(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

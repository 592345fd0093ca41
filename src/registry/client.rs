//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - A short per-request deadline and User-Agent
//! - Status code mapping to registry errors
//! - A single attempt per request (no retries)

use crate::error::RegistryError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("libcheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper shared by both registries
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::transport(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client, timeout })
    }

    /// Get the configured request deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform a GET request, mapping failures to registry errors
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        debug!(registry, package, url, "sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::transport(
                    package,
                    registry,
                    format!("request timed out after {:?}", self.timeout),
                )
            } else {
                RegistryError::transport(package, registry, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(registry, package, status = status.as_u16(), "non-success status");
            return Err(RegistryError::unavailable(
                package,
                registry,
                status.as_u16(),
            ));
        }

        Ok(response)
    }

    /// Perform a GET request and decode a JSON response
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let body = self.get_text(url, package, registry).await?;

        serde_json::from_str(&body).map_err(|e| {
            RegistryError::decode(package, registry, format!("failed to parse JSON: {}", e))
        })
    }

    /// Perform a GET request and read the body as text
    pub async fn get_text(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<String, RegistryError> {
        let response = self.get_with_context(url, package, registry).await?;

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::transport(package, registry, "timed out reading response body")
            } else {
                RegistryError::transport(
                    package,
                    registry,
                    format!("failed to read response body: {}", e),
                )
            }
        })
    }
}

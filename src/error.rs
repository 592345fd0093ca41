//! Application error types using thiserror
//!
//! Error hierarchy:
//! - RegistryError: Issues with registry communication (per-dependency, never fatal)
//! - ConfigError: Issues with the configuration file
//! - ExtractError: Issues reading the build descriptor

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Connection refused, timeout or other transport failure
    #[error("failed to reach {registry} for '{package}': {message}")]
    Transport {
        package: String,
        registry: String,
        message: String,
    },

    /// Non-success HTTP status
    #[error("{registry} responded with [{status}] for '{package}'")]
    Unavailable {
        package: String,
        registry: String,
        status: u16,
    },

    /// Malformed structured payload
    #[error("invalid response from {registry} for '{package}': {message}")]
    Decode {
        package: String,
        registry: String,
        message: String,
    },

    /// Listing contained no parseable version
    #[error("no versions found in {registry} listing for '{package}'")]
    NoVersionsFound { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Registry URL template lacks the name placeholder
    #[error("invalid {registry} URL template '{template}': missing {{name}} placeholder")]
    InvalidTemplate { registry: String, template: String },

    /// Invalid option combination or value
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Errors related to reading the build descriptor
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Descriptor could not be read
    #[error("couldn't open file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Organization produced an unusable pattern
    #[error("invalid declaration pattern for organization '{organization}': {message}")]
    InvalidPattern {
        organization: String,
        message: String,
    },
}

impl RegistryError {
    /// Creates a new Transport error
    pub fn transport(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::Transport {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Unavailable error
    pub fn unavailable(package: impl Into<String>, registry: impl Into<String>, status: u16) -> Self {
        RegistryError::Unavailable {
            package: package.into(),
            registry: registry.into(),
            status,
        }
    }

    /// Creates a new Decode error
    pub fn decode(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::Decode {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoVersionsFound error
    pub fn no_versions_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NoVersionsFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true for a 404 response, the only failure that triggers fallback
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::Unavailable { status: 404, .. })
    }

    /// Returns the HTTP status for Unavailable errors
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::Unavailable { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ConfigError {
    /// Creates a new Parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

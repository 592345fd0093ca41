//! Resolution outcome and error record types

use super::{LibrarySpec, RegistryQueryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final state of one dependency's lookup
///
/// Exactly one of `result` and `failure_id` is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// The declaration that was resolved
    pub spec: LibrarySpec,
    /// Registry answer, when the lookup succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RegistryQueryResult>,
    /// Id of the matching [`ErrorRecord`], when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_id: Option<u32>,
}

impl ResolutionOutcome {
    /// Creates a successful outcome
    pub fn resolved(spec: LibrarySpec, result: RegistryQueryResult) -> Self {
        Self {
            spec,
            result: Some(result),
            failure_id: None,
        }
    }

    /// Creates a failed outcome referencing an error record
    pub fn failed(spec: LibrarySpec, failure_id: u32) -> Self {
        Self {
            spec,
            result: None,
            failure_id: Some(failure_id),
        }
    }

    /// Returns true if the lookup failed
    pub fn is_failure(&self) -> bool {
        self.failure_id.is_some()
    }
}

/// A failed lookup, recorded once per failing dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Failure id, shown as `err[N]` in the table
    pub id: u32,
    /// Library that failed to resolve
    pub library_name: String,
    /// Version pinned for that library
    pub current_version: String,
    /// Human-readable failure message
    pub message: String,
}

impl ErrorRecord {
    /// Creates a new error record for a declaration
    pub fn new(id: u32, spec: &LibrarySpec, message: impl Into<String>) -> Self {
        Self {
            id,
            library_name: spec.name.clone(),
            current_version: spec.current_version.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] - {} [{}]\n\tCouldn't get version because of error {}",
            self.id, self.library_name, self.current_version, self.message
        )
    }
}

//! Library declaration structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared library dependency with its currently pinned version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibrarySpec {
    /// Library name as published to the registries
    pub name: String,
    /// Version currently pinned in the build descriptor
    pub current_version: String,
}

impl LibrarySpec {
    /// Creates a new library declaration
    pub fn new(name: impl Into<String>, current_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
        }
    }
}

impl fmt::Display for LibrarySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.current_version)
    }
}

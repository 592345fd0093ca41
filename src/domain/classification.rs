//! Classification tiers for presentation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation tier assigned to a resolved dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Current version is the latest
    UpToDate,
    /// A newer version is published
    Outdated,
    /// No registry could provide a version
    Unresolvable,
    /// Library is listed for removal in migration mode
    FlaggedForRemoval,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::UpToDate => "up to date",
            Classification::Outdated => "outdated",
            Classification::Unresolvable => "unresolvable",
            Classification::FlaggedForRemoval => "flagged for removal",
        };
        write!(f, "{}", label)
    }
}

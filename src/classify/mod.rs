//! Classification of resolution outcomes
//!
//! This module provides:
//! - Lenient semantic version parsing and ordering
//! - The classifier that maps an outcome to a presentation tier

mod version;

pub use version::{is_older, max_version, parse_version};

use crate::domain::{Classification, ResolutionOutcome};
use std::collections::HashSet;

/// Maps resolution outcomes to classification tiers
///
/// The removal set and migration flag are fixed for the lifetime of a run.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    /// Libraries slated for removal
    removal_set: HashSet<String>,
    /// Whether removal flagging is active
    migration_mode: bool,
}

impl Classifier {
    /// Create a new classifier
    pub fn new(removal_set: HashSet<String>, migration_mode: bool) -> Self {
        Self {
            removal_set,
            migration_mode,
        }
    }

    /// Returns true if migration mode is enabled
    pub fn migration_mode(&self) -> bool {
        self.migration_mode
    }

    /// Classify a single outcome
    pub fn classify(&self, outcome: &ResolutionOutcome) -> Classification {
        classify(outcome, &self.removal_set, self.migration_mode)
    }
}

/// Classify an outcome against a removal set and mode flag
pub fn classify(
    outcome: &ResolutionOutcome,
    removal_set: &HashSet<String>,
    migration_mode: bool,
) -> Classification {
    if migration_mode && removal_set.contains(&outcome.spec.name) {
        return Classification::FlaggedForRemoval;
    }

    let Some(latest) = outcome.result.as_ref().and_then(|r| r.latest()) else {
        return Classification::Unresolvable;
    };

    if is_older(&outcome.spec.current_version, latest) {
        Classification::Outdated
    } else {
        Classification::UpToDate
    }
}

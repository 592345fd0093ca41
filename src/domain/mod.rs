//! Core domain models for libcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Library declarations read from the build descriptor
//! - Registry query results and their source
//! - Per-dependency resolution outcomes and error records
//! - Classification tiers for presentation

mod classification;
mod library;
mod outcome;
mod query_result;

pub use classification::Classification;
pub use library::LibrarySpec;
pub use outcome::{ErrorRecord, ResolutionOutcome};
pub use query_result::{RegistryQueryResult, RegistrySource};

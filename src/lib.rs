//! libcheck - Library version checker
//!
//! This library checks the library versions pinned in a build descriptor
//! against two release registries:
//! - Primary: structured-data endpoint returning the latest release
//! - Secondary: repository directory listing, consulted when the primary answers 404
//!
//! Lookups run concurrently, one task per declared library, and every
//! failure is collected with an id that links it back to its table row.

pub mod aggregator;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod output;
pub mod registry;
pub mod resolver;

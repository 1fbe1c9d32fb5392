//! Core domain types for the review relay.
//!
//! This module contains the fundamental types used throughout the service,
//! designed to encode invariants via the type system.

pub mod ids;
pub mod job;

// Re-export commonly used types at the module level
pub use ids::{InstallationId, PrNumber, RepoId, ReviewId, Sha};
pub use job::{PrSummary, ReviewJob, ReviewType};

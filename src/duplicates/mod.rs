//! Duplicate detection over the vector and metadata indexes.
//!
//! Groups are rebuilt from scratch on every call and never stored.

mod finder;
pub mod scoring;
mod types;

pub use finder::DuplicateGroupFinder;
pub use scoring::{DuplicateScore, duplicate_score, size_ratio};
pub use types::{DuplicateGroup, GroupMember, GroupingOptions, SearchOptions};

/// Similarity thresholds used as option defaults
pub mod thresholds {
    /// Minimum anchor similarity for two chunks to count as duplicates
    pub const DUPLICATE: f32 = 0.85;

    /// Default floor for location and query searches
    pub const SEARCH: f32 = 0.5;
}

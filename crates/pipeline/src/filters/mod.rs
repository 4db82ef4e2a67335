//! Hard filter implementations for the scoring pipeline.
//!
//! This module contains all the concrete filters that can be composed
//! into a FilterPipeline.

pub mod topical_link;
pub mod vote_count;

// Re-export for convenience
pub use topical_link::TopicalLinkFilter;
pub use vote_count::MinimumVoteCountFilter;

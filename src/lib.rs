//! fzf v1 fuzzy matching, ranking and highlighting for search suggestions.
//!
//! [`fuzzy::fuzzy_match`] is the core operation: it returns the match
//! window, an alignment score, and merged ranges of matched characters.
//! [`rank`] orders candidate lists by that score and [`highlight`] renders
//! the ranges for display.

pub mod fuzzy;
pub mod highlight;
pub mod rank;

pub use fuzzy::{MatchResult, fuzzy_match};
pub use rank::{CaseMode, FieldSelector, Query, Ranked, rank};

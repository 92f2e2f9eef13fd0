//! Engine error types

use thiserror::Error;

use crate::types::BracketSide;

pub type Result<T> = std::result::Result<T, BracketError>;

/// Conditions that stop a bracket side from being resolved at all.
///
/// Missing or partial data never lands here; it degrades to unresolved slots
/// and null scores instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// The slot references form a cycle, so no processing order exists
    #[error("cyclic or unresolvable {side} bracket: matches {matches:?} reference each other")]
    CyclicReference { side: BracketSide, matches: Vec<u32> },
}

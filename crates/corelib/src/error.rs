//! Error types for the core library.
//!
//! Absence is never an error here: lookups return `Option` and removing an
//! unknown key is a no-op. Only invalid configuration is reported.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Node weights must lie in `1..=MAX_SLOTS_PER_NODE`.
    #[error(
        "invalid weight {weight} for node {key:?}: weight must be in 1..={}",
        crate::node::MAX_SLOTS_PER_NODE
    )]
    InvalidWeight { key: String, weight: usize },
    /// `weight * replicas` overflows or exceeds `MAX_SLOTS_PER_NODE`.
    #[error(
        "node {key:?} needs {weight} x {replicas} virtual slots, more than the limit of {}",
        crate::node::MAX_SLOTS_PER_NODE
    )]
    TooManySlots {
        key: String,
        weight: usize,
        replicas: usize,
    },
}

//! Error types for the parity crate.

use thiserror::Error;

/// Errors that can occur when assembling engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParityError {
    /// A field that takes part in ordering has no comparator.
    #[error("field {index} ({value_type}) of {owner} has no comparator; ordering is unavailable")]
    InvalidFieldConfiguration {
        owner: &'static str,
        index: usize,
        value_type: &'static str,
    },
}

/// Result type for parity operations.
pub type Result<T> = std::result::Result<T, ParityError>;

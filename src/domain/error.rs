//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the row contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing field '{field}' at line {line}")]
    MissingField { field: String, line: u64 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

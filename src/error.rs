//! Error types for comprehension construction and evaluation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or materializing a comprehension
///
/// Registration errors (`DuplicateVariable`, `InvalidBinding`, `Finalized`)
/// surface at the chain call that detects them; evaluation errors
/// (`UnboundVariable`, `TypeMismatch`) surface at the first materializing
/// call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A filter or projection looked up a name no clause declares. Lookup
    /// never falls back to any outer scope.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    /// A clause was declared with a name an earlier clause already uses
    #[error("duplicate variable '{0}'")]
    DuplicateVariable(String),

    /// The declare/bind protocol was violated (source without a declared
    /// variable, declaration left unbound, etc.)
    #[error("invalid binding: {0}")]
    InvalidBinding(String),

    /// A clause or filter was added after the result had been materialized
    #[error("builder already finalized")]
    Finalized,

    /// A typed environment accessor was used on a value of another type
    #[error("type mismatch for variable '{name}': expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

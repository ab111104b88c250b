// crates/soul-core/src/error.rs

use thiserror::Error;

/// Protocol-wide error types for the Soul reward ledger.
///
/// Every entry point rejects synchronously with one of these and leaves no
/// partial state behind. Retrying is the caller's decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoulError {
    /// A pool for this deposit token is already registered.
    #[error("Duplicate pool: {0}")]
    DuplicatePool(String),

    /// The referenced pool id is out of range.
    #[error("Pool not found: {0}")]
    PoolNotFound(usize),

    /// Withdrawal or burn exceeds the recorded balance.
    #[error("Insufficient balance: requested {requested} but only {available} available")]
    InsufficientBalance { requested: u128, available: u128 },

    /// `transfer_from` exceeds the spender's allowance.
    #[error("Insufficient allowance: requested {requested} but only {approved} approved")]
    InsufficientAllowance { requested: u128, approved: u128 },

    /// Caller lacks the role or identity an operation requires.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The ledger has been toggled inactive.
    #[error("Ledger is inactive")]
    Inactive,

    /// The vault is paused.
    #[error("Vault is paused")]
    Paused,

    /// Overflow, underflow, or division by zero in ledger math.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// An argument is outside its accepted range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A collaborator was re-entered while already in use.
    #[error("Reentrant call: {0}")]
    Reentrancy(String),

    /// Configuration could not be read or failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SoulError {
    /// Shorthand for an arithmetic failure in the named operation.
    pub fn overflow(operation: &str) -> Self {
        SoulError::Arithmetic(format!("overflow in {}", operation))
    }
}

impl From<serde_json::Error> for SoulError {
    fn from(e: serde_json::Error) -> Self {
        SoulError::Serialization(e.to_string())
    }
}

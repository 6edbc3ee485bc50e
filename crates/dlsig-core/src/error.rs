//! Error types for signature operations

use thiserror::Error;

/// Result type alias for signature operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating parameters, keys or signatures
#[derive(Debug, Error)]
pub enum Error {
    /// Modular arithmetic invoked with a zero modulus
    #[error("Invalid modulus: modulus must be positive")]
    InvalidModulus,

    /// Modular inverse requested for values that share a factor
    #[error("No modular inverse exists: value and modulus are not coprime")]
    NoInverseExists,

    /// Invalid generator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Domain parameters or keys violate a group invariant
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Caller-supplied nonce outside [1, q-1]
    #[error("Invalid nonce: must lie in [1, q-1]")]
    InvalidNonce,

    /// A fixed nonce produced a zero signature component
    #[error("Degenerate signature: a component is zero")]
    DegenerateSignature,

    /// Signature components outside [1, q-1]
    #[error("Invalid signature")]
    InvalidSignature,

    /// Parameter search hit the caller's iteration cap
    #[error("Parameter search exhausted after {iterations} iterations")]
    SearchExhausted { iterations: u64 },

    /// Parameter search passed the caller's deadline
    #[error("Parameter search timed out after {iterations} iterations")]
    SearchTimedOut { iterations: u64 },

    /// Parameter search was cancelled through its token
    #[error("Parameter search cancelled after {iterations} iterations")]
    SearchCancelled { iterations: u64 },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

//! Errors from configuring fakes and mocks.

use alloy_primitives::Address;

/// A configuration request the factories reject.
///
/// Configuration failures are local to the failing call; rules that were
/// already installed are never disturbed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The function is not declared by the contract's interface.
    #[error("function `{0}` is not declared by this contract's interface")]
    UnknownFunction(String),
    /// A bare name matched several overloads.
    #[error("function name `{0}` is ambiguous here; use the full signature")]
    AmbiguousFunction(String),
    /// The signature string does not parse.
    #[error("`{0}` is not a function signature")]
    InvalidSignature(String),
    /// The ABI JSON document does not parse.
    #[error("invalid ABI JSON: {0}")]
    InvalidAbiJson(#[from] serde_json::Error),
    /// Mocking requires deployed code at the target address.
    #[error("no code at {0}: only deployed contracts can be mocked")]
    NotDeployed(Address),
}

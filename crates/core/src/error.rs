//! Transaction failures, as the host reports them.

use alloy_primitives::Bytes;
use revm::primitives::{EVMError, Halt};
use std::convert::Infallible;

/// A failed transaction.
///
/// Synthetic reverts surface through the same variant as genuine ones; test
/// assertions cannot, and should not, tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction reverted.
    #[error("VM Exception while processing transaction: revert {reason}")]
    Revert {
        /// Decoded human-readable reason; empty when the payload carried
        /// none.
        reason: String,
        /// The raw revert payload.
        output: Bytes,
    },
    /// The VM halted the transaction without producing a revert payload.
    #[error("VM Exception while processing transaction: {reason:?}")]
    Halt {
        /// The halt reason reported by the VM.
        reason: Halt,
        /// Gas consumed up to the halt.
        gas_used: u64,
    },
    /// The VM rejected the transaction before executing it.
    #[error("EVM processing error: {0:?}")]
    Evm(EVMError<Infallible>),
}

impl From<EVMError<Infallible>> for TransactionError {
    fn from(err: EVMError<Infallible>) -> Self {
        Self::Evm(err)
    }
}

impl TransactionError {
    /// The decoded revert reason, if this failure is a revert.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::Revert { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

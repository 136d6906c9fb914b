//! Bridging synthetic reverts into host-native failure reporting.

use crate::{
    decode::{decode_revert, RevertDecoder},
    error::TransactionError,
    observer::CallOutput,
};
use alloy_primitives::Bytes;
use parking_lot::Mutex;
use revm::primitives::{ExecutionResult, Output};
use std::{fmt, sync::Arc};

/// Marker attached to reverts synthesized by the interception layer.
///
/// Armed with the synthesized payload when the observer short-circuits a
/// call, cleared at every top-level dispatch. Matching is by payload
/// equality, so a synthetic revert is still recognized after bubbling up
/// through intervening real frames: propagation preserves the payload byte
/// for byte.
#[derive(Clone, Debug, Default)]
pub struct SyntheticTag {
    payload: Arc<Mutex<Option<Bytes>>>,
}

impl SyntheticTag {
    /// A disarmed tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the tag with a synthesized revert payload.
    pub fn arm(&self, payload: Bytes) {
        *self.payload.lock() = Some(payload);
    }

    /// Disarms the tag; called at the start of every top-level dispatch.
    pub fn clear(&self) {
        *self.payload.lock() = None;
    }

    /// Whether `output` is the payload of a synthesized revert.
    pub fn matches(&self, output: &[u8]) -> bool {
        self.payload.lock().as_deref().map_or(false, |payload| payload == output)
    }
}

/// Classifies a finished transaction into the host's reporting surface.
pub trait ErrorClassifier: fmt::Debug {
    /// Turns an execution result into the value surfaced to the caller.
    fn classify(&self, result: ExecutionResult) -> Result<CallOutput, TransactionError>;
}

/// The host's native classification.
///
/// Reverts are reported with a best-effort decoded reason; halts and
/// pre-execution failures pass through unreinterpreted.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeClassifier;

impl ErrorClassifier for NativeClassifier {
    fn classify(&self, result: ExecutionResult) -> Result<CallOutput, TransactionError> {
        match result {
            ExecutionResult::Success { gas_used, logs, output, .. } => Ok(CallOutput {
                result: match output {
                    Output::Call(data) => data,
                    Output::Create(data, _) => data,
                },
                gas_used,
                logs,
            }),
            ExecutionResult::Revert { output, .. } => {
                Err(TransactionError::Revert { reason: decode_revert(&output), output })
            }
            ExecutionResult::Halt { reason, gas_used } => {
                Err(TransactionError::Halt { reason, gas_used })
            }
        }
    }
}

/// Decorator over the native classifier that reports synthesized reverts
/// exactly as the host reports genuine ones.
///
/// Results that never touched the interception layer delegate to the native
/// path unchanged, so installing the bridge is behavior-preserving for
/// ordinary execution.
#[derive(Debug)]
pub struct SyntheticRevertBridge {
    tag: SyntheticTag,
    decoder: RevertDecoder,
    inner: NativeClassifier,
}

impl SyntheticRevertBridge {
    /// Installs the bridge, resolving the revert-reason decoder once.
    pub fn install(tag: SyntheticTag) -> Self {
        let decoder = RevertDecoder::resolve();
        trace!(target: "mimic::bridge", ?decoder, "installed revert reason bridge");
        Self { tag, decoder, inner: NativeClassifier }
    }

    /// The decoder strategy resolved at installation.
    pub fn decoder(&self) -> RevertDecoder {
        self.decoder
    }
}

impl ErrorClassifier for SyntheticRevertBridge {
    fn classify(&self, result: ExecutionResult) -> Result<CallOutput, TransactionError> {
        if let ExecutionResult::Revert { output, .. } = &result {
            if self.tag.matches(output) {
                debug!(target: "mimic::bridge", "re-wrapping synthetic revert");
                return Err(TransactionError::Revert {
                    reason: self.decoder.decode(output),
                    output: output.clone(),
                });
            }
        }
        self.inner.classify(result)
    }
}

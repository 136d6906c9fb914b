//! Ordered per-address logs of every call the observer routes.

use crate::constants::SELECTOR_LEN;
use alloy_primitives::{Address, Bytes, Selector, U256};
use parking_lot::RwLock;
use revm::interpreter::{return_ok, InstructionResult};
use std::{collections::HashMap, sync::Arc};

/// The call log as shared between the observer and contract handles.
pub type SharedRecords = Arc<RwLock<CallRecords>>;

/// Block context a call was dispatched under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Block number.
    pub number: U256,
    /// Block timestamp.
    pub timestamp: U256,
}

/// How an observed call ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedOutcome {
    /// Completed successfully (really or synthetically) with return data.
    Returned(Bytes),
    /// Reverted, carrying the raw revert payload.
    Reverted(Bytes),
    /// Halted by the VM without a revert payload.
    Halted,
}

impl RecordedOutcome {
    pub(crate) fn from_status(status: InstructionResult, output: Bytes) -> Self {
        if matches!(status, return_ok!()) {
            Self::Returned(output)
        } else if status.is_revert() {
            Self::Reverted(output)
        } else {
            Self::Halted
        }
    }
}

/// One observed call to a registered address.
#[derive(Clone, Debug)]
pub struct CallRecord {
    /// Full calldata, selector included.
    pub calldata: Bytes,
    /// Value sent with the call.
    pub value: U256,
    /// The caller as the callee saw it.
    pub caller: Address,
    /// Block context at dispatch time.
    pub block: BlockContext,
    /// Result of the call; `None` while the call is in flight.
    pub outcome: Option<RecordedOutcome>,
    /// Call depth at dispatch; pairs completions with their records.
    depth: u64,
}

impl CallRecord {
    pub(crate) fn new(
        calldata: Bytes,
        value: U256,
        caller: Address,
        block: BlockContext,
        depth: u64,
        outcome: Option<RecordedOutcome>,
    ) -> Self {
        Self { calldata, value, caller, block, outcome, depth }
    }

    /// Selector of the called function, if the calldata carries one.
    pub fn selector(&self) -> Option<Selector> {
        self.calldata.get(..SELECTOR_LEN).map(Selector::from_slice)
    }

    /// Encoded arguments past the selector.
    pub fn args(&self) -> &[u8] {
        self.calldata.get(SELECTOR_LEN..).unwrap_or_default()
    }
}

/// Append-only call logs for every registered address, in dispatch order.
///
/// Records are appended when a call is routed and never reordered or pruned;
/// pass-through records are completed once the real execution finishes.
#[derive(Debug, Default)]
pub struct CallRecords {
    logs: HashMap<Address, Vec<CallRecord>>,
}

impl CallRecords {
    /// An empty log set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record for `address`; in-flight records are completed later
    /// by [`finish`](Self::finish).
    pub(crate) fn push(&mut self, address: Address, record: CallRecord) {
        self.logs.entry(address).or_default().push(record);
    }

    /// Completes the most recent in-flight record for `(address, depth)`.
    ///
    /// Records of short-circuited calls are already complete and are never
    /// touched, whether or not the VM reports their frames here.
    pub(crate) fn finish(
        &mut self,
        address: Address,
        depth: u64,
        status: InstructionResult,
        output: Bytes,
    ) {
        let Some(log) = self.logs.get_mut(&address) else { return };
        if let Some(record) =
            log.iter_mut().rev().find(|r| r.depth == depth && r.outcome.is_none())
        {
            record.outcome = Some(RecordedOutcome::from_status(status, output));
        }
    }

    /// All records for `address`, oldest first.
    pub fn for_address(&self, address: Address) -> &[CallRecord] {
        self.logs.get(&address).map(Vec::as_slice).unwrap_or_default()
    }
}

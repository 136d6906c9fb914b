//! The VM observer: the choke point every outgoing message call passes
//! through, and the wrapper that drives observed transactions.

use crate::{
    backend::Backend,
    bridge::{ErrorClassifier, SyntheticRevertBridge, SyntheticTag},
    constants::{DEFAULT_SYNTHETIC_GAS_COST, TRANSACTION_GAS_LIMIT},
    decode::encode_error_string,
    error::TransactionError,
    records::{BlockContext, CallRecord, CallRecords, RecordedOutcome, SharedRecords},
    registry::{InterceptRegistry, Outcome, SharedRegistry},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use parking_lot::RwLock;
use revm::{
    db::{CacheDB, EmptyDB},
    interpreter::{CallInputs, Gas, InstructionResult},
    primitives::{Env, Log, ResultAndState, SpecId, TransactTo},
    Database, DatabaseCommit, EVMData, Inspector, EVM,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunables for synthesized call outcomes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Gas charged for a synthesized outcome, in place of metering bytecode
    /// that never ran. Charged against the intercepted frame's gas limit.
    pub synthetic_gas_cost: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { synthetic_gas_cost: DEFAULT_SYNTHETIC_GAS_COST }
    }
}

/// Successful transaction output.
#[derive(Clone, Debug)]
pub struct CallOutput {
    /// Returned data.
    pub result: Bytes,
    /// Total gas spent by the transaction.
    pub gas_used: u64,
    /// Logs emitted during execution.
    pub logs: Vec<Log>,
}

/// Inspector consulted before every message call the VM dispatches.
///
/// Instances are cheap to clone: one is created per transaction, and all of
/// them share the registry, call log and synthetic tag owned by the
/// [`ObservableVm`]. Nested calls reach the same hook recursively, so
/// interception has no depth limit beyond the VM's own.
#[derive(Clone, Debug)]
pub struct Observer {
    registry: SharedRegistry,
    records: SharedRecords,
    tag: SyntheticTag,
    config: ObserverConfig,
}

impl Observer {
    fn record(&self, call: &CallInputs, env: &Env, depth: u64, outcome: Option<RecordedOutcome>) {
        let block = BlockContext { number: env.block.number, timestamp: env.block.timestamp };
        let record = CallRecord::new(
            call.input.clone(),
            call.transfer.value,
            call.context.caller,
            block,
            depth,
            outcome,
        );
        self.records.write().push(call.contract, record);
    }
}

impl<DB: Database> Inspector<DB> for Observer {
    fn call(
        &mut self,
        data: &mut EVMData<'_, DB>,
        call: &mut CallInputs,
    ) -> (InstructionResult, Gas, Bytes) {
        let mut gas = Gas::new(call.gas_limit);
        let decision =
            self.registry.write().decide(call.contract, &call.input, call.transfer.value);
        let Some(outcome) = decision else {
            return (InstructionResult::Continue, gas, Bytes::new());
        };

        let depth = data.journaled_state.depth();
        match outcome {
            Outcome::PassThrough => {
                trace!(target: "mimic::observer", callee = %call.contract, depth, "pass-through call");
                self.record(call, data.env, depth, None);
                (InstructionResult::Continue, gas, Bytes::new())
            }
            Outcome::Return(output) => {
                if !gas.record_cost(self.config.synthetic_gas_cost) {
                    self.record(call, data.env, depth, Some(RecordedOutcome::Halted));
                    return (InstructionResult::OutOfGas, gas, Bytes::new());
                }
                debug!(target: "mimic::observer", callee = %call.contract, depth, "synthesizing return");
                self.record(call, data.env, depth, Some(RecordedOutcome::Returned(output.clone())));
                (InstructionResult::Return, gas, output)
            }
            Outcome::Revert(reason) => {
                if !gas.record_cost(self.config.synthetic_gas_cost) {
                    self.record(call, data.env, depth, Some(RecordedOutcome::Halted));
                    return (InstructionResult::OutOfGas, gas, Bytes::new());
                }
                debug!(target: "mimic::observer", callee = %call.contract, depth, %reason, "synthesizing revert");
                let payload = encode_error_string(&reason);
                self.tag.arm(payload.clone());
                self.record(
                    call,
                    data.env,
                    depth,
                    Some(RecordedOutcome::Reverted(payload.clone())),
                );
                (InstructionResult::Revert, gas, payload)
            }
        }
    }

    fn call_end(
        &mut self,
        data: &mut EVMData<'_, DB>,
        call: &CallInputs,
        remaining_gas: Gas,
        status: InstructionResult,
        retdata: Bytes,
    ) -> (InstructionResult, Gas, Bytes) {
        self.records.write().finish(
            call.contract,
            data.journaled_state.depth(),
            status,
            retdata.clone(),
        );
        (status, remaining_gas, retdata)
    }
}

/// A VM whose message-dispatch path runs under the observer.
///
/// Owns the backend, a deterministic block environment, and the state shared
/// with contract handles; hands a fresh observer to every transaction it
/// drives and reports failures through the installed revert reason bridge.
#[derive(Debug)]
pub struct ObservableVm {
    backend: Backend,
    env: Env,
    registry: SharedRegistry,
    records: SharedRecords,
    tag: SyntheticTag,
    config: ObserverConfig,
    bridge: SyntheticRevertBridge,
}

impl ObservableVm {
    /// Wraps `backend` with the default observer configuration.
    pub fn new(backend: Backend) -> Self {
        Self::with_config(backend, ObserverConfig::default())
    }

    /// Wraps `backend`, installing the revert reason bridge and preparing a
    /// deterministic block environment.
    pub fn with_config(backend: Backend, config: ObserverConfig) -> Self {
        let tag = SyntheticTag::new();
        let bridge = SyntheticRevertBridge::install(tag.clone());
        let mut env = Env::default();
        env.cfg.spec_id = SpecId::SHANGHAI;
        env.block.number = U256::from(1);
        env.block.timestamp = U256::from(1);
        env.block.prevrandao = Some(B256::ZERO);
        Self {
            backend,
            env,
            registry: Arc::new(RwLock::new(InterceptRegistry::new())),
            records: Arc::new(RwLock::new(CallRecords::new())),
            tag,
            config,
            bridge,
        }
    }

    /// The shared rule registry. Factories register targets and install rules
    /// through this handle; rules are never duplicated outside it.
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// The shared call log.
    pub fn records(&self) -> SharedRecords {
        self.records.clone()
    }

    /// The backend holding account state.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Mutable access to the backend, for seeding accounts.
    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    /// The block environment template used for every dispatch.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Mutable access to the block environment template.
    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    fn observer(&self) -> Observer {
        Observer {
            registry: self.registry.clone(),
            records: self.records.clone(),
            tag: self.tag.clone(),
            config: self.config,
        }
    }

    /// Executes a message call as a transaction, committing state changes.
    ///
    /// Failures, synthetic or genuine, surface through the installed
    /// classifier so callers observe a single uniform error channel.
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> Result<CallOutput, TransactionError> {
        self.tag.clear();

        let mut env = self.env.clone();
        env.tx.caller = from;
        env.tx.transact_to = TransactTo::Call(to);
        env.tx.data = calldata;
        env.tx.value = value;
        env.tx.gas_limit = TRANSACTION_GAS_LIMIT;

        let mut evm: EVM<CacheDB<EmptyDB>> = EVM::new();
        evm.env = env;
        evm.database(self.backend.take_db());
        let outcome = evm.inspect(self.observer());
        let db = evm.db.take().expect("database is set for the duration of the call");
        self.backend.restore_db(db);

        let ResultAndState { result, state } = outcome?;
        self.backend.db_mut().commit(state);
        self.bridge.classify(result)
    }
}

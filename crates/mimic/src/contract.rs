//! Shared plumbing for programmable contract handles.

use crate::{
    error::ConfigError,
    interface::{ContractInterface, FunctionSig},
};
use alloy_primitives::{Address, Bytes};
use mimic_core::{
    constants::SELECTOR_LEN,
    records::{CallRecord, SharedRecords},
    registry::{CallPattern, InterceptRule, Outcome, SharedRegistry},
};

/// State common to fake and mock handles: the target address, its declared
/// interface, and the observer state the handle programs against.
#[derive(Clone, Debug)]
pub(crate) struct Inner {
    pub address: Address,
    pub interface: ContractInterface,
    pub registry: SharedRegistry,
    pub records: SharedRecords,
}

impl Inner {
    pub fn resolve(&self, function: &str) -> Result<&FunctionSig, ConfigError> {
        self.interface.resolve(function)
    }

    /// Installs an unconditional outcome, replacing every previously
    /// programmed outcome for the function.
    pub fn set(&self, function: &str, outcome: Outcome) -> Result<(), ConfigError> {
        let selector = self.resolve(function)?.selector;
        self.registry.write().set(self.address, selector, outcome);
        Ok(())
    }

    /// Installs a conditional outcome alongside the function's other rules.
    pub fn set_when(
        &self,
        function: &str,
        pattern: CallPattern,
        outcome: Outcome,
    ) -> Result<(), ConfigError> {
        let selector = self.resolve(function)?.selector;
        self.registry.write().install(self.address, InterceptRule { selector, pattern, outcome });
        Ok(())
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.records.read().for_address(self.address).to_vec()
    }

    pub fn calls_to(&self, function: &str) -> Result<Vec<CallRecord>, ConfigError> {
        let selector = self.resolve(function)?.selector;
        Ok(self.calls().into_iter().filter(|r| r.selector() == Some(selector)).collect())
    }

    /// Builds calldata for a declared function from pre-encoded arguments.
    pub fn encode_input(&self, function: &str, args: &[u8]) -> Result<Bytes, ConfigError> {
        let selector = self.resolve(function)?.selector;
        let mut input = Vec::with_capacity(SELECTOR_LEN + args.len());
        input.extend_from_slice(selector.as_slice());
        input.extend_from_slice(args);
        Ok(input.into())
    }
}

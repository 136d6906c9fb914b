//! Mock contracts: deployed contracts with per-function overrides.

use crate::{contract::Inner, error::ConfigError, interface::ContractInterface};
use alloy_primitives::{Address, Bytes};
use mimic_core::{
    observer::ObservableVm,
    records::CallRecord,
    registry::{CallPattern, Outcome, TargetKind},
};

/// A real, deployed contract whose calls can be selectively overridden.
///
/// With no overrides set, every call passes through to the deployed code and
/// is byte-identical to calling the contract directly. Overrides apply per
/// function and can be removed again, individually or wholesale; every call
/// routed through the handle's address is recorded either way.
#[derive(Clone, Debug)]
pub struct MockContract {
    inner: Inner,
}

impl MockContract {
    pub(crate) fn create(
        vm: &mut ObservableVm,
        address: Address,
        interface: ContractInterface,
    ) -> Result<Self, ConfigError> {
        if !vm.backend().has_code(address) {
            return Err(ConfigError::NotDeployed(address));
        }
        let registry = vm.registry();
        registry.write().register(address, TargetKind::Mock);
        debug!(target: "mimic::mock", %address, "created mock contract");
        Ok(Self { inner: Inner { address, interface, registry, records: vm.records() } })
    }

    /// The mocked contract's address.
    pub fn address(&self) -> Address {
        self.inner.address
    }

    /// The declared interface.
    pub fn interface(&self) -> &ContractInterface {
        &self.inner.interface
    }

    /// Overrides `function` to return `data` on every call.
    pub fn set_return(&self, function: &str, data: impl Into<Bytes>) -> Result<(), ConfigError> {
        self.inner.set(function, Outcome::Return(data.into()))
    }

    /// Overrides `function` to return `data` for calls matching `pattern`,
    /// keeping its other rules in place.
    pub fn set_return_when(
        &self,
        function: &str,
        pattern: CallPattern,
        data: impl Into<Bytes>,
    ) -> Result<(), ConfigError> {
        self.inner.set_when(function, pattern, Outcome::Return(data.into()))
    }

    /// Overrides `function` to revert with `reason` on every call.
    pub fn set_revert(&self, function: &str, reason: &str) -> Result<(), ConfigError> {
        self.inner.set(function, Outcome::Revert(reason.to_string()))
    }

    /// Overrides `function` to revert with `reason` for calls matching
    /// `pattern`, keeping its other rules in place.
    pub fn set_revert_when(
        &self,
        function: &str,
        pattern: CallPattern,
        reason: &str,
    ) -> Result<(), ConfigError> {
        self.inner.set_when(function, pattern, Outcome::Revert(reason.to_string()))
    }

    /// Removes any override from `function`, restoring pass-through behavior
    /// identical to the pre-override contract.
    pub fn reset(&self, function: &str) -> Result<(), ConfigError> {
        let selector = self.inner.resolve(function)?.selector;
        self.inner.registry.write().remove(self.inner.address, selector);
        Ok(())
    }

    /// Removes every override, restoring full pass-through behavior.
    pub fn reset_all(&self) {
        self.inner.registry.write().clear(self.inner.address);
    }

    /// Every call routed through this address, oldest first.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.calls()
    }

    /// Calls to one declared function, oldest first.
    pub fn calls_to(&self, function: &str) -> Result<Vec<CallRecord>, ConfigError> {
        self.inner.calls_to(function)
    }

    /// Number of calls observed for `function`.
    pub fn call_count(&self, function: &str) -> Result<usize, ConfigError> {
        Ok(self.calls_to(function)?.len())
    }

    /// The most recent call to `function`.
    pub fn last_call(&self, function: &str) -> Result<Option<CallRecord>, ConfigError> {
        Ok(self.calls_to(function)?.pop())
    }

    /// Builds calldata for a declared function from pre-encoded arguments.
    pub fn encode_input(&self, function: &str, args: &[u8]) -> Result<Bytes, ConfigError> {
        self.inner.encode_input(function, args)
    }
}

//! Fake contracts: synthetic addresses whose every call is intercepted.

use crate::{
    contract::Inner,
    error::ConfigError,
    interface::{ContractInterface, FunctionSig},
};
use alloy_primitives::{Address, Bytes};
use mimic_core::{
    constants::FAKE_RUNTIME_CODE,
    observer::ObservableVm,
    records::CallRecord,
    registry::{CallPattern, Outcome, TargetKind},
};

/// A contract that never runs real code.
///
/// Every declared function starts out reverting with a diagnostic that names
/// it, and can be reprogrammed or restored at any time; calls outside the
/// declared interface revert naming the unmatched selector. Nothing ever
/// falls through to real execution. Handles are cheap to clone and share the
/// observer's registry.
#[derive(Clone, Debug)]
pub struct FakeContract {
    inner: Inner,
}

impl FakeContract {
    pub(crate) fn create(
        vm: &mut ObservableVm,
        address: Address,
        interface: ContractInterface,
    ) -> Self {
        // Code-size probes must see a deployed account; the byte itself never
        // executes because every call is intercepted first.
        vm.backend_mut().insert_code(address, FAKE_RUNTIME_CODE);
        let registry = vm.registry();
        {
            let mut registry = registry.write();
            registry.register(address, TargetKind::Fake);
            for function in interface.functions() {
                registry.set(address, function.selector, default_outcome(address, function));
            }
        }
        debug!(
            target: "mimic::fake",
            %address,
            functions = interface.functions().len(),
            "created fake contract"
        );
        Self { inner: Inner { address, interface, registry, records: vm.records() } }
    }

    /// The fake's address.
    pub fn address(&self) -> Address {
        self.inner.address
    }

    /// The declared interface.
    pub fn interface(&self) -> &ContractInterface {
        &self.inner.interface
    }

    /// Programs `function` to return `data` on every call.
    pub fn set_return(&self, function: &str, data: impl Into<Bytes>) -> Result<(), ConfigError> {
        self.inner.set(function, Outcome::Return(data.into()))
    }

    /// Programs `function` to return `data` for calls matching `pattern`,
    /// keeping its other rules in place.
    pub fn set_return_when(
        &self,
        function: &str,
        pattern: CallPattern,
        data: impl Into<Bytes>,
    ) -> Result<(), ConfigError> {
        self.inner.set_when(function, pattern, Outcome::Return(data.into()))
    }

    /// Programs `function` to revert with `reason` on every call.
    pub fn set_revert(&self, function: &str, reason: &str) -> Result<(), ConfigError> {
        self.inner.set(function, Outcome::Revert(reason.to_string()))
    }

    /// Programs `function` to revert with `reason` for calls matching
    /// `pattern`, keeping its other rules in place.
    pub fn set_revert_when(
        &self,
        function: &str,
        pattern: CallPattern,
        reason: &str,
    ) -> Result<(), ConfigError> {
        self.inner.set_when(function, pattern, Outcome::Revert(reason.to_string()))
    }

    /// Restores `function` to its diagnostic default.
    pub fn reset(&self, function: &str) -> Result<(), ConfigError> {
        let function = self.inner.resolve(function)?.clone();
        self.inner.registry.write().set(
            self.inner.address,
            function.selector,
            default_outcome(self.inner.address, &function),
        );
        Ok(())
    }

    /// Restores every declared function to its diagnostic default.
    pub fn reset_all(&self) {
        let mut registry = self.inner.registry.write();
        for function in self.inner.interface.functions() {
            registry.set(
                self.inner.address,
                function.selector,
                default_outcome(self.inner.address, function),
            );
        }
    }

    /// Every call observed at this address, oldest first.
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

fn default_outcome(address: Address, function: &FunctionSig) -> Outcome {
    Outcome::Revert(format!(
        "function {} on fake contract {address} has no programmed behavior",
        function.signature
    ))
}

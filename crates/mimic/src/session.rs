//! Session bootstrap: attaching the interception layer to a host VM.

use crate::{
    error::ConfigError, fake::FakeContract, interface::ContractInterface, mock::MockContract,
};
use alloy_primitives::{Address, Bytes, U256};
use mimic_core::{
    allocator::NonceAllocator,
    backend::Backend,
    error::TransactionError,
    observer::{CallOutput, ObservableVm, ObserverConfig},
};

/// Where a session's VM lives.
#[derive(Debug)]
pub enum Host {
    /// An in-process VM whose state this process owns.
    Local(Backend),
    /// A remote execution endpoint, identified by its URL.
    ///
    /// Unsupported: interception operates below the contract-call
    /// abstraction and needs direct access to the VM's dispatch path.
    Remote(String),
}

/// Errors creating a [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The host is not an in-process development VM.
    #[error("mimic can only attach to an in-process development VM, got: {0}")]
    UnsupportedHost(String),
}

/// A mocking session bound to one VM.
///
/// Owns the observed VM, the revert reason bridge and the address allocator,
/// and hands out [`FakeContract`] and [`MockContract`] handles whose rules
/// live in the observer's registry.
#[derive(Debug)]
pub struct Session {
    vm: ObservableVm,
    allocator: NonceAllocator,
}

impl Session {
    /// Attaches to `host`, failing loudly unless it is an in-process VM.
    pub fn create(host: Host) -> Result<Self, SessionError> {
        Self::create_with_config(host, ObserverConfig::default())
    }

    /// Attaches to `host` with explicit observer configuration.
    pub fn create_with_config(host: Host, config: ObserverConfig) -> Result<Self, SessionError> {
        let backend = match host {
            Host::Local(backend) => backend,
            Host::Remote(endpoint) => return Err(SessionError::UnsupportedHost(endpoint)),
        };
        debug!(target: "mimic::session", "attaching observer to in-process VM");
        Ok(Self {
            vm: ObservableVm::with_config(backend, config),
            allocator: NonceAllocator::new(),
        })
    }

    /// Creates a fake contract at a fresh synthetic address.
    pub fn fake(&mut self, interface: ContractInterface) -> FakeContract {
        let address = self.allocator.next_address();
        FakeContract::create(&mut self.vm, address, interface)
    }

    /// Creates a fake contract at a caller-chosen address.
    pub fn fake_at(&mut self, address: Address, interface: ContractInterface) -> FakeContract {
        FakeContract::create(&mut self.vm, address, interface)
    }

    /// Wraps the deployed contract at `address` in a mock handle.
    pub fn mock(
        &mut self,
        address: Address,
        interface: ContractInterface,
    ) -> Result<MockContract, ConfigError> {
        MockContract::create(&mut self.vm, address, interface)
    }

    /// Executes a message call as a transaction on the observed VM.
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        calldata: impl Into<Bytes>,
        value: U256,
    ) -> Result<CallOutput, TransactionError> {
        self.vm.call(from, to, calldata.into(), value)
    }

    /// The observed VM.
    pub fn vm(&self) -> &ObservableVm {
        &self.vm
    }

    /// Mutable access to the observed VM, for seeding state.
    pub fn vm_mut(&mut self) -> &mut ObservableVm {
        &mut self.vm
    }

    /// The session's address allocator.
    pub fn allocator(&self) -> &NonceAllocator {
        &self.allocator
    }
}

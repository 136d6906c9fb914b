//! # mimic
//!
//! Fake and mock contracts for an in-process EVM.
//!
//! A [`Session`] attaches to a local VM and hands out two kinds of
//! programmable contract handles:
//!
//! - [`FakeContract`]: a synthetic address with no real code behind it; every
//!   call is intercepted and answered from programmed rules.
//! - [`MockContract`]: a real deployed contract whose functions can be
//!   individually overridden and restored, with every call recorded.
//!
//! Synthetic reverts surface through the same error type, with the same
//! decoded reason, as genuine ones.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use mimic::{Backend, ContractInterface, Host, Session};
//!
//! # fn main() -> eyre::Result<()> {
//! let mut session = Session::create(Host::Local(Backend::new()))?;
//!
//! let token = session.fake(ContractInterface::parse(["balanceOf(address)"])?);
//! token.set_return("balanceOf", U256::from(100).to_be_bytes::<32>().to_vec())?;
//!
//! let holder = Address::repeat_byte(0x11);
//! let calldata = token.encode_input("balanceOf", &[0u8; 32])?;
//! let output = session.call(holder, token.address(), calldata, U256::ZERO)?;
//! assert_eq!(output.result[..], U256::from(100).to_be_bytes::<32>());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod contract;

pub mod error;
pub mod fake;
pub mod interface;
pub mod mock;
pub mod session;

pub use error::ConfigError;
pub use fake::FakeContract;
pub use interface::{ContractInterface, FunctionSig};
pub use mock::MockContract;
pub use session::{Host, Session, SessionError};

pub use mimic_core::{
    Backend, CallOutput, CallPattern, CallRecord, NonceAllocator, ObservableVm, ObserverConfig,
    Outcome, RecordedOutcome, TransactionError,
};

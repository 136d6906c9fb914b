//! # mimic-core
//!
//! Call-interception primitives for an in-process EVM: a registry of
//! per-address intercept rules, the observer that consults it on every
//! message call, and the bridge that reports synthesized reverts exactly as
//! the host reports genuine ones.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod allocator;
pub mod backend;
pub mod bridge;
pub mod constants;
pub mod decode;
pub mod error;
pub mod observer;
pub mod records;
pub mod registry;

pub use allocator::NonceAllocator;
pub use backend::Backend;
pub use bridge::{ErrorClassifier, NativeClassifier, SyntheticRevertBridge, SyntheticTag};
pub use decode::RevertDecoder;
pub use error::TransactionError;
pub use observer::{CallOutput, ObservableVm, Observer, ObserverConfig};
pub use records::{BlockContext, CallRecord, CallRecords, RecordedOutcome};
pub use registry::{CallPattern, InterceptRegistry, InterceptRule, Outcome, TargetKind};

// Re-exported so downstream crates link the exact same VM and primitive
// types this crate is built against.
pub use alloy_primitives;
pub use revm;

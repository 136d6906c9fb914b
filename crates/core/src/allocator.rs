//! Process-wide nonce allocation and synthetic address derivation.

use crate::constants::SYNTHETIC_ADDRESS_SALT;
use alloy_primitives::{keccak256, Address};
use std::sync::atomic::{AtomicU64, Ordering};

/// Nonces handed out so far, shared by every allocator in the process.
static NEXT_NONCE: AtomicU64 = AtomicU64::new(0);

/// Hands out process-unique nonces and synthetic contract addresses.
///
/// The counter behind this handle is process-wide: nonces are never reused
/// within a process lifetime, no matter how many sessions exist or how their
/// calls interleave. Construct one per session and pass it by reference to
/// anything that needs fresh addresses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonceAllocator {
    _private: (),
}

impl NonceAllocator {
    /// Creates a handle to the process-wide counter.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Returns the next nonce.
    ///
    /// Increments are atomic: no two calls observe the same value, regardless
    /// of which handle or thread they go through.
    pub fn next_nonce(&self) -> u64 {
        NEXT_NONCE.fetch_add(1, Ordering::Relaxed)
    }

    /// Derives a fresh synthetic 20-byte address.
    ///
    /// Calculated as `address(bytes20(keccak256(SALT || nonce)))`, so
    /// allocations collide neither with each other nor, with overwhelming
    /// probability, with any pre-existing address.
    pub fn next_address(&self) -> Address {
        let nonce = self.next_nonce();
        let mut preimage = Vec::with_capacity(SYNTHETIC_ADDRESS_SALT.len() + 8);
        preimage.extend_from_slice(SYNTHETIC_ADDRESS_SALT);
        preimage.extend_from_slice(&nonce.to_be_bytes());
        Address::from_word(keccak256(&preimage))
    }
}

//! Constants used across the interception layer.

/// Runtime code installed at fake addresses so code-size probes treat them as
/// deployed contracts.
///
/// A single `INVALID` opcode. It never executes: every call to a fake is
/// intercepted before dispatch reaches the bytecode.
pub const FAKE_RUNTIME_CODE: &[u8] = &[0xFE];

/// Salt for deriving synthetic contract addresses.
///
/// A synthetic address is calculated as
/// `address(bytes20(keccak256(SYNTHETIC_ADDRESS_SALT || nonce)))`.
pub const SYNTHETIC_ADDRESS_SALT: &[u8] = b"mimic synthetic contract";

/// Gas charged for a synthesized call outcome when no explicit
/// [`ObserverConfig`](crate::observer::ObserverConfig) is provided.
pub const DEFAULT_SYNTHETIC_GAS_COST: u64 = 0;

/// Gas limit for transactions driven through the observed VM.
pub const TRANSACTION_GAS_LIMIT: u64 = 30_000_000;

/// Length of a function selector.
pub const SELECTOR_LEN: usize = 4;

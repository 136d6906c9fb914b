//! Shared fixtures: sessions and hand-assembled runtime bytecode.

use alloy_primitives::{Address, Bytes, U256};
use mimic::{Backend, Host, Session};
use mimic_core::decode::encode_error_string;

pub const ALICE: Address = Address::repeat_byte(0x11);
pub const BOB: Address = Address::repeat_byte(0x22);

/// A session over a fresh in-process VM.
pub fn session() -> Session {
    Session::create(Host::Local(Backend::new())).expect("local hosts are always supported")
}

/// ABI word encoding a small integer.
pub fn word(value: u64) -> Vec<u8> {
    U256::from(value).to_be_bytes::<32>().to_vec()
}

/// ABI word encoding an address argument.
pub fn address_word(address: Address) -> Vec<u8> {
    let mut out = vec![0u8; 12];
    out.extend_from_slice(address.as_slice());
    out
}

/// Runtime code returning a constant 32-byte word for any calldata.
///
/// `PUSH32 value PUSH1 0 MSTORE PUSH1 32 PUSH1 0 RETURN`
pub fn constant_returner(value: u64) -> Bytes {
    let mut code = vec![0x7f];
    code.extend_from_slice(&U256::from(value).to_be_bytes::<32>());
    code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3]);
    code.into()
}

/// Runtime code forwarding its calldata to `target` and bubbling the result,
/// success or revert, back to its own caller.
pub fn forwarder(target: Address) -> Bytes {
    let mut code = vec![
        0x36, // CALLDATASIZE
        0x60, 0x00, // PUSH1 0
        0x60, 0x00, // PUSH1 0
        0x37, // CALLDATACOPY
        0x60, 0x00, // PUSH1 0  (ret size)
        0x60, 0x00, // PUSH1 0  (ret offset)
        0x36, // CALLDATASIZE  (args size)
        0x60, 0x00, // PUSH1 0  (args offset)
        0x60, 0x00, // PUSH1 0  (value)
        0x73, // PUSH20 target
    ];
    code.extend_from_slice(target.as_slice());
    code.extend_from_slice(&[
        0x5a, // GAS
        0xf1, // CALL
        0x3d, // RETURNDATASIZE
        0x60, 0x00, // PUSH1 0
        0x60, 0x00, // PUSH1 0
        0x3e, // RETURNDATACOPY
        0x60, 0x33, // PUSH1 0x33 (success branch)
        0x57, // JUMPI
        0x3d, // RETURNDATASIZE
        0x60, 0x00, // PUSH1 0
        0xfd, // REVERT
        0x5b, // JUMPDEST (0x33)
        0x3d, // RETURNDATASIZE
        0x60, 0x00, // PUSH1 0
        0xf3, // RETURN
    ]);
    code.into()
}

/// Runtime code reverting with `revert(string(reason))` for any calldata: the
/// ABI `Error(string)` payload is appended to the code and copied out with
/// CODECOPY.
pub fn reverter(reason: &str) -> Bytes {
    let payload = encode_error_string(reason);
    assert!(payload.len() <= 0xff, "reason too long for this fixture");
    let len = payload.len() as u8;
    let mut code = vec![
        0x60, len,  // PUSH1 len
        0x60, 0x0c, // PUSH1 payload offset
        0x60, 0x00, // PUSH1 0
        0x39, // CODECOPY
        0x60, len,  // PUSH1 len
        0x60, 0x00, // PUSH1 0
        0xfd, // REVERT
    ];
    code.extend_from_slice(&payload);
    code.into()
}

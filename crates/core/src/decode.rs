//! Revert payload encoding and decoding.

use crate::constants::SELECTOR_LEN;
use alloy_primitives::{hex, Bytes};
use alloy_sol_types::{Panic, Revert, SolError};

/// Strategy for turning a raw revert payload into a reason string.
///
/// Hosts have shipped this capability in two shapes: an ABI decoder over the
/// `Error(string)` encoding, and raw return-data inspection that slices the
/// offset and length words by hand. The strategy in effect is resolved once,
/// when the bridge is installed, and never re-probed per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevertDecoder {
    /// Decode through the ABI codec.
    Abi,
    /// Inspect the raw return data by hand.
    RawReturnData,
}

impl Default for RevertDecoder {
    fn default() -> Self {
        Self::resolve()
    }
}

impl RevertDecoder {
    /// Probes the linked decoding capability with a canary payload and fixes
    /// the strategy for the session.
    pub fn resolve() -> Self {
        let canary = encode_error_string("canary");
        match Revert::abi_decode(&canary, false) {
            Ok(revert) if revert.reason == "canary" => Self::Abi,
            _ => Self::RawReturnData,
        }
    }

    /// Decodes a revert payload into its reason string.
    ///
    /// Malformed payloads yield an empty reason rather than an error; revert
    /// reporting must never produce a secondary failure.
    pub fn decode(self, payload: &[u8]) -> String {
        match self {
            Self::Abi => {
                Revert::abi_decode(payload, false).map(|r| r.reason).unwrap_or_default()
            }
            Self::RawReturnData => decode_raw_return_data(payload),
        }
    }
}

/// Encodes a reason string exactly as `revert(string)` would.
pub fn encode_error_string(reason: &str) -> Bytes {
    Revert { reason: reason.to_owned() }.abi_encode().into()
}

/// Manual `Error(string)` slicing: selector, offset word, length word, bytes.
fn decode_raw_return_data(payload: &[u8]) -> String {
    raw_error_string(payload).unwrap_or_default()
}

fn raw_error_string(payload: &[u8]) -> Option<String> {
    let data = payload.strip_prefix(&Revert::SELECTOR)?;
    let offset = word_as_usize(data, 0)?;
    let len = word_as_usize(data.get(offset..)?, 0)?;
    let start = offset.checked_add(32)?;
    let bytes = data.get(start..start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn word_as_usize(data: &[u8], index: usize) -> Option<usize> {
    let word = data.get(index * 32..(index + 1) * 32)?;
    if word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}

/// Best-effort decode of a revert payload for diagnostics.
///
/// `Error(string)` and `Panic(uint256)` payloads decode exactly; anything
/// else falls back to UTF-8 or a trimmed hex rendering.
pub fn decode_revert(payload: &[u8]) -> String {
    if payload.is_empty() {
        return String::new();
    }
    if payload.len() < SELECTOR_LEN {
        return format!("custom error bytes {}", hex::encode_prefixed(payload));
    }
    if let Ok(revert) = Revert::abi_decode(payload, false) {
        return revert.reason;
    }
    if let Ok(panic) = Panic::abi_decode(payload, false) {
        return panic.to_string();
    }
    if let Ok(s) = std::str::from_utf8(payload) {
        return s.to_string();
    }
    let (selector, data) = payload.split_at(SELECTOR_LEN);
    format!("custom error {}:{}", hex::encode(selector), trimmed_hex(data))
}

fn trimmed_hex(s: &[u8]) -> String {
    let s = hex::encode(s);
    let n = 32 * 2;
    if s.len() <= n {
        s
    } else {
        format!("{}...{} ({} bytes)", &s[..n / 2], &s[s.len() - n / 2..], s.len())
    }
}

//! Session bootstrap, revert bridging and observer configuration.

use crate::common::{address_word, reverter, session, word, ALICE};
use alloy_primitives::{Address, U256};
use eyre::Result;
use mimic::{Backend, ContractInterface, Host, ObserverConfig, Session, SessionError};

const TOKEN: Address = Address::repeat_byte(0xfa);
const REAL: Address = Address::repeat_byte(0xaa);

fn erc20() -> ContractInterface {
    ContractInterface::parse(["balanceOf(address)"]).expect("signature is canonical")
}

#[test]
fn rejects_remote_hosts_loudly() {
    let err = Session::create(Host::Remote("http://localhost:8545".into())).unwrap_err();
    assert!(matches!(err, SessionError::UnsupportedHost(_)));
    assert!(err.to_string().contains("http://localhost:8545"));
}

#[test]
fn synthetic_reverts_are_indistinguishable_from_real_ones() -> Result<()> {
    let mut session = session();

    let token = session.fake_at(TOKEN, erc20());
    token.set_revert("balanceOf", "insufficient balance")?;
    session.vm_mut().backend_mut().insert_code(REAL, reverter("insufficient balance"));

    let calldata = token.encode_input("balanceOf", &address_word(ALICE))?;
    let synthetic = session.call(ALICE, TOKEN, calldata.clone(), U256::ZERO).unwrap_err();
    let genuine = session.call(ALICE, REAL, calldata, U256::ZERO).unwrap_err();

    assert_eq!(synthetic.to_string(), genuine.to_string());
    assert_eq!(synthetic.revert_reason(), Some("insufficient balance"));
    assert_eq!(genuine.revert_reason(), Some("insufficient balance"));
    Ok(())
}

#[test]
fn malformed_revert_payloads_degrade_to_diagnostics() -> Result<()> {
    let mut session = session();
    // revert(0, 2) over untouched memory: a two-byte garbage payload.
    session.vm_mut().backend_mut().insert_code(REAL, vec![0x60, 0x02, 0x60, 0x00, 0xfd]);

    let err = session.call(ALICE, REAL, vec![], U256::ZERO).unwrap_err();
    assert_eq!(err.revert_reason(), Some("custom error bytes 0x0000"));
    Ok(())
}

#[test]
fn synthetic_gas_cost_is_a_configuration_choice() -> Result<()> {
    let gas_with = |cost: u64| -> Result<u64> {
        let mut session = Session::create_with_config(
            Host::Local(Backend::new()),
            ObserverConfig { synthetic_gas_cost: cost },
        )?;
        let token = session.fake_at(TOKEN, erc20());
        token.set_return("balanceOf", word(1))?;
        let calldata = token.encode_input("balanceOf", &address_word(ALICE))?;
        Ok(session.call(ALICE, TOKEN, calldata, U256::ZERO)?.gas_used)
    };

    let base = gas_with(0)?;
    assert_eq!(gas_with(5_000)?, base + 5_000);
    Ok(())
}

#[test]
fn allocator_handles_share_one_process_counter() {
    let session_a = session();
    let session_b = session();
    let a = session_a.allocator().next_nonce();
    let b = session_b.allocator().next_nonce();
    assert_ne!(a, b);
}

//! Fake contract behavior.

use crate::common::{address_word, session, word, ALICE, BOB};
use alloy_primitives::{Address, Bytes, U256};
use eyre::Result;
use mimic::{CallPattern, ConfigError, ContractInterface, FunctionSig, RecordedOutcome};

fn erc20() -> ContractInterface {
    ContractInterface::parse(["balanceOf(address)", "transfer(address,uint256)", "decimals()"])
        .expect("signatures are canonical")
}

#[test]
fn returns_programmed_value_until_reconfigured() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("balanceOf", word(100))?;

    let calldata = token.encode_input("balanceOf", &address_word(BOB))?;
    for _ in 0..3 {
        let output = session.call(ALICE, token.address(), calldata.clone(), U256::ZERO)?;
        assert_eq!(output.result[..], word(100)[..]);
    }

    token.set_return("balanceOf", word(7))?;
    let output = session.call(ALICE, token.address(), calldata, U256::ZERO)?;
    assert_eq!(output.result[..], word(7)[..]);
    Ok(())
}

#[test]
fn unprogrammed_function_reverts_naming_it() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());

    let calldata = token.encode_input("decimals", &[])?;
    let err = session.call(ALICE, token.address(), calldata, U256::ZERO).unwrap_err();
    let reason = err.revert_reason().expect("diagnostic revert").to_string();
    assert!(reason.contains("decimals()"), "{reason}");
    assert!(reason.contains("no programmed behavior"), "{reason}");
    Ok(())
}

#[test]
fn undeclared_selector_reverts_naming_it() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());

    // totalSupply() is not part of the declared interface.
    let undeclared = FunctionSig::parse("totalSupply()")?;
    let calldata: Bytes = undeclared.selector.as_slice().to_vec().into();
    let err = session.call(ALICE, token.address(), calldata, U256::ZERO).unwrap_err();
    let reason = err.revert_reason().expect("diagnostic revert").to_string();
    assert!(reason.contains("unknown function selector"), "{reason}");
    assert!(reason.contains(&undeclared.selector.to_string()), "{reason}");
    Ok(())
}

#[test]
fn call_without_selector_reverts() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());

    let err = session.call(ALICE, token.address(), vec![0x01], U256::ZERO).unwrap_err();
    let reason = err.revert_reason().expect("diagnostic revert").to_string();
    assert!(reason.contains("without a function selector"), "{reason}");
    Ok(())
}

#[test]
fn configuring_an_unknown_function_fails_locally() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("balanceOf", word(1))?;

    let err = token.set_return("mint(address,uint256)", word(1)).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownFunction(_)));

    // The failed configuration call left existing rules untouched.
    let calldata = token.encode_input("balanceOf", &address_word(BOB))?;
    let output = session.call(ALICE, token.address(), calldata, U256::ZERO)?;
    assert_eq!(output.result[..], word(1)[..]);
    Ok(())
}

#[test]
fn revert_reason_surfaces_verbatim() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_revert("transfer", "insufficient balance")?;

    let calldata = token.encode_input("transfer", &[])?;
    let err = session.call(ALICE, token.address(), calldata, U256::ZERO).unwrap_err();
    assert_eq!(
        err.to_string(),
        "VM Exception while processing transaction: revert insufficient balance"
    );
    Ok(())
}

#[test]
fn nth_call_pattern_overrides_a_single_dispatch() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("decimals", word(18))?;
    token.set_return_when("decimals", CallPattern::new().on_nth_call(1), word(6))?;

    let calldata = token.encode_input("decimals", &[])?;
    let mut results = Vec::new();
    for _ in 0..3 {
        let output = session.call(ALICE, token.address(), calldata.clone(), U256::ZERO)?;
        assert_eq!(output.result.len(), 32);
        results.push(output.result[31]);
    }
    assert_eq!(results, vec![18, 6, 18]);
    Ok(())
}

#[test]
fn args_pattern_discriminates_by_argument() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("balanceOf", word(1))?;
    token.set_return_when(
        "balanceOf",
        CallPattern::new().with_args(address_word(BOB)),
        word(42),
    )?;

    let for_alice = token.encode_input("balanceOf", &address_word(ALICE))?;
    let for_bob = token.encode_input("balanceOf", &address_word(BOB))?;
    assert_eq!(session.call(ALICE, token.address(), for_alice, U256::ZERO)?.result[31], 1);
    assert_eq!(session.call(ALICE, token.address(), for_bob, U256::ZERO)?.result[31], 42);
    Ok(())
}

#[test]
fn predicate_pattern_inspects_arguments() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("transfer", word(0))?;
    token.set_return_when(
        "transfer",
        CallPattern::new().with_predicate(|args| args.len() >= 64 && args[63] % 2 == 0),
        word(1),
    )?;

    let even = token.encode_input("transfer", &[address_word(BOB), word(4)].concat())?;
    let odd = token.encode_input("transfer", &[address_word(BOB), word(5)].concat())?;
    assert_eq!(session.call(ALICE, token.address(), even, U256::ZERO)?.result[31], 1);
    assert_eq!(session.call(ALICE, token.address(), odd, U256::ZERO)?.result[31], 0);
    Ok(())
}

#[test]
fn value_pattern_discriminates_by_call_value() -> Result<()> {
    let mut session = session();
    let vault = session.fake(ContractInterface::parse(["deposit()"])?);
    vault.set_return("deposit", word(0))?;
    vault.set_return_when("deposit", CallPattern::new().with_value(U256::from(5)), word(5))?;

    session.vm_mut().backend_mut().set_balance(ALICE, U256::from(1_000_000_000u64));
    let calldata = vault.encode_input("deposit", &[])?;
    assert_eq!(session.call(ALICE, vault.address(), calldata.clone(), U256::from(5))?.result[31], 5);
    assert_eq!(session.call(ALICE, vault.address(), calldata, U256::ZERO)?.result[31], 0);
    Ok(())
}

#[test]
fn fakes_get_distinct_synthetic_addresses() {
    let mut session = session();
    let a = session.fake(erc20());
    let b = session.fake(erc20());
    assert_ne!(a.address(), b.address());
}

#[test]
fn fake_at_honors_the_requested_address() -> Result<()> {
    let mut session = session();
    let address = Address::repeat_byte(0xfa);
    let token = session.fake_at(address, erc20());
    assert_eq!(token.address(), address);

    token.set_return("decimals", word(18))?;
    let calldata = token.encode_input("decimals", &[])?;
    assert_eq!(session.call(ALICE, address, calldata, U256::ZERO)?.result[31], 18);
    Ok(())
}

#[test]
fn records_calls_with_their_context() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("balanceOf", word(1))?;

    let calldata = token.encode_input("balanceOf", &address_word(BOB))?;
    session.call(ALICE, token.address(), calldata.clone(), U256::ZERO)?;

    let calls = token.calls_to("balanceOf")?;
    assert_eq!(calls.len(), 1);
    let record = &calls[0];
    assert_eq!(record.caller, ALICE);
    assert_eq!(record.value, U256::ZERO);
    assert_eq!(record.calldata, calldata);
    assert_eq!(record.args(), &address_word(BOB)[..]);
    assert_eq!(record.block.number, U256::from(1));
    assert_eq!(record.outcome, Some(RecordedOutcome::Returned(word(1).into())));

    assert_eq!(token.call_count("balanceOf")?, 1);
    assert_eq!(token.call_count("decimals")?, 0);
    Ok(())
}

#[test]
fn reset_restores_the_diagnostic_default() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("decimals", word(18))?;

    let calldata = token.encode_input("decimals", &[])?;
    session.call(ALICE, token.address(), calldata.clone(), U256::ZERO)?;

    token.reset("decimals")?;
    let err = session.call(ALICE, token.address(), calldata, U256::ZERO).unwrap_err();
    let reason = err.revert_reason().expect("diagnostic revert");
    assert!(reason.contains("no programmed behavior"), "{reason}");
    Ok(())
}

#[test]
fn reset_all_restores_every_function() -> Result<()> {
    let mut session = session();
    let token = session.fake(erc20());
    token.set_return("decimals", word(18))?;
    token.set_return("balanceOf", word(1))?;

    token.reset_all();
    for calldata in
        [token.encode_input("decimals", &[])?, token.encode_input("balanceOf", &address_word(BOB))?]
    {
        let err = session.call(ALICE, token.address(), calldata, U256::ZERO).unwrap_err();
        assert!(err.revert_reason().expect("diagnostic revert").contains("no programmed behavior"));
    }
    Ok(())
}

//! Contract interface descriptions: the set of callable function signatures.

use crate::error::ConfigError;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{keccak256, Selector};
use mimic_core::constants::SELECTOR_LEN;

/// One callable function signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSig {
    /// Bare function name.
    pub name: String,
    /// Canonical signature, e.g. `balanceOf(address)`.
    pub signature: String,
    /// Selector routing calls to this function.
    pub selector: Selector,
}

impl FunctionSig {
    /// Parses a canonical signature string.
    ///
    /// Types must already be canonical (`uint256`, not `uint`); no alias
    /// rewriting is performed.
    pub fn parse(signature: &str) -> Result<Self, ConfigError> {
        let signature: String = signature.split_whitespace().collect();
        let invalid = || ConfigError::InvalidSignature(signature.clone());
        let (name, params) = signature.split_once('(').ok_or_else(invalid)?;
        if name.is_empty()
            || !params.ends_with(')')
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            return Err(invalid());
        }
        let name = name.to_string();
        let selector = Selector::from_slice(&keccak256(signature.as_bytes())[..SELECTOR_LEN]);
        Ok(Self { name, signature, selector })
    }
}

/// The set of callable functions test code declared for a contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractInterface {
    functions: Vec<FunctionSig>,
}

impl ContractInterface {
    /// Builds an interface from canonical signature strings.
    pub fn parse<I, S>(signatures: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let functions = signatures
            .into_iter()
            .map(|s| FunctionSig::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { functions })
    }

    /// Derives the interface from a JSON ABI.
    pub fn from_abi(abi: &JsonAbi) -> Self {
        let functions = abi
            .functions()
            .map(|f| FunctionSig {
                name: f.name.clone(),
                signature: f.signature(),
                selector: f.selector(),
            })
            .collect();
        Self { functions }
    }

    /// Parses a JSON ABI document and derives the interface from it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_abi(&serde_json::from_str::<JsonAbi>(json)?))
    }

    /// The declared functions.
    pub fn functions(&self) -> &[FunctionSig] {
        &self.functions
    }

    /// Looks up a declared function by bare name or full signature.
    ///
    /// Bare names are rejected as ambiguous when several overloads share
    /// them.
    pub fn resolve(&self, function: &str) -> Result<&FunctionSig, ConfigError> {
        let function = function.trim();
        if function.contains('(') {
            let wanted = FunctionSig::parse(function)?;
            return self
                .functions
                .iter()
                .find(|f| f.selector == wanted.selector)
                .ok_or(ConfigError::UnknownFunction(wanted.signature));
        }
        let mut matches = self.functions.iter().filter(|f| f.name == function);
        match (matches.next(), matches.next()) {
            (Some(f), None) => Ok(f),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousFunction(function.to_string())),
            (None, _) => Err(ConfigError::UnknownFunction(function.to_string())),
        }
    }
}

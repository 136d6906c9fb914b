//! Per-address intercept rules, consulted before every message call.

use crate::constants::SELECTOR_LEN;
use alloy_primitives::{Address, Bytes, Selector, U256};
use parking_lot::RwLock;
use std::{collections::HashMap, fmt, sync::Arc};

/// The registry as shared between the observer and contract handles.
pub type SharedRegistry = Arc<RwLock<InterceptRegistry>>;

/// What an intercepted call should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Defer to real execution.
    PassThrough,
    /// Skip real execution and report success with the given return payload.
    Return(Bytes),
    /// Skip real execution and revert with the given reason string.
    Revert(String),
}

/// Predicate over a call's encoded arguments.
pub type ArgsPredicate = Arc<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// Conditions a programmed outcome places on matching calls.
///
/// An empty pattern matches every call to its function; conditions combine
/// conjunctively.
#[derive(Clone, Default)]
pub struct CallPattern {
    /// Encoded-argument prefix (calldata past the selector) that must match.
    pub args: Option<Bytes>,
    /// Exact call value that must match.
    pub value: Option<U256>,
    /// Matches only the nth dispatch (0-based) to this function.
    pub nth: Option<u64>,
    /// Arbitrary predicate over the encoded arguments.
    pub predicate: Option<ArgsPredicate>,
}

impl CallPattern {
    /// An unconditional pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the encoded arguments to start with `args`.
    pub fn with_args(mut self, args: impl Into<Bytes>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Requires the call value to equal `value`.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Matches only the nth dispatch (0-based) to the function.
    pub fn on_nth_call(mut self, nth: u64) -> Self {
        self.nth = Some(nth);
        self
    }

    /// Requires `predicate` to accept the encoded arguments.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Whether a call with the given encoded arguments, value and dispatch
    /// index satisfies every condition.
    fn matches(&self, args: &[u8], value: U256, nth: u64) -> bool {
        if let Some(prefix) = &self.args {
            if args.get(..prefix.len()) != Some(&prefix[..]) {
                return false;
            }
        }
        if let Some(expected) = self.value {
            if value != expected {
                return false;
            }
        }
        if let Some(expected) = self.nth {
            if nth != expected {
                return false;
            }
        }
        if let Some(predicate) = &self.predicate {
            if !predicate(args) {
                return false;
            }
        }
        true
    }

    /// Rules are consulted most specific first; an argument prefix outranks
    /// every other condition, longer prefixes outrank shorter ones.
    fn specificity(&self) -> usize {
        let mut score = 0;
        if let Some(args) = &self.args {
            score += 8 + args.len();
        }
        if self.nth.is_some() {
            score += 4;
        }
        if self.value.is_some() {
            score += 2;
        }
        if self.predicate.is_some() {
            score += 1;
        }
        score
    }

    fn is_unconditional(&self) -> bool {
        self.args.is_none() && self.value.is_none() && self.nth.is_none() && self.predicate.is_none()
    }

    /// Whether `other` constrains the same shape of calls. Predicates are
    /// opaque and never considered equal.
    fn same_shape(&self, other: &Self) -> bool {
        self.args == other.args
            && self.value == other.value
            && self.nth == other.nth
            && self.predicate.is_none()
            && other.predicate.is_none()
    }
}

impl fmt::Debug for CallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallPattern")
            .field("args", &self.args)
            .field("value", &self.value)
            .field("nth", &self.nth)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

/// A programmed outcome for one function of one registered address.
#[derive(Clone, Debug)]
pub struct InterceptRule {
    /// Selector of the function this rule applies to.
    pub selector: Selector,
    /// Conditions on matching calls.
    pub pattern: CallPattern,
    /// Outcome applied when the pattern matches.
    pub outcome: Outcome,
}

/// How a registered address treats calls no rule claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// No real code behind the address; unmatched calls revert with a
    /// diagnostic naming the unmatched selector.
    Fake,
    /// Real deployed code; unmatched calls fall through to it.
    Mock,
}

#[derive(Debug)]
struct AddressRules {
    kind: TargetKind,
    /// Most specific first; the first match wins.
    rules: Vec<InterceptRule>,
    /// Dispatches seen per selector, indexing [`CallPattern::nth`].
    seen: HashMap<Selector, u64>,
}

/// Registry of intercept rules, keyed by target address.
///
/// Owned by the observer. Contract handles mutate rules through a shared
/// reference instead of holding copies, so each address has exactly one
/// active rule set.
#[derive(Debug, Default)]
pub struct InterceptRegistry {
    targets: HashMap<Address, AddressRules>,
}

impl InterceptRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an address under interception. Re-registering an address keeps
    /// its existing rules and counters.
    pub fn register(&mut self, address: Address, kind: TargetKind) {
        self.targets
            .entry(address)
            .or_insert_with(|| AddressRules { kind, rules: Vec::new(), seen: HashMap::new() });
    }

    /// Removes an address and all of its rules from interception.
    pub fn deregister(&mut self, address: Address) {
        self.targets.remove(&address);
    }

    /// Whether calls to `address` are intercepted.
    pub fn is_registered(&self, address: Address) -> bool {
        self.targets.contains_key(&address)
    }

    /// Replaces every rule for `(address, selector)` with a single
    /// unconditional rule. Outcomes are replaced wholesale, never merged.
    ///
    /// Has no effect unless the address is registered.
    pub fn set(&mut self, address: Address, selector: Selector, outcome: Outcome) {
        self.install(
            address,
            InterceptRule { selector, pattern: CallPattern::new(), outcome },
        );
    }

    /// Installs a rule. Unconditional rules replace every rule for their
    /// function; conditional rules replace only a rule of the same shape and
    /// are kept ordered most specific first.
    ///
    /// Has no effect unless the address is registered.
    pub fn install(&mut self, address: Address, rule: InterceptRule) {
        let Some(target) = self.targets.get_mut(&address) else {
            trace!(target: "mimic::registry", %address, "install on unregistered address ignored");
            return;
        };
        if rule.pattern.is_unconditional() {
            target.rules.retain(|r| r.selector != rule.selector);
        } else {
            target
                .rules
                .retain(|r| !(r.selector == rule.selector && r.pattern.same_shape(&rule.pattern)));
        }
        let specificity = rule.pattern.specificity();
        let position = target
            .rules
            .iter()
            .position(|r| r.pattern.specificity() <= specificity)
            .unwrap_or(target.rules.len());
        target.rules.insert(position, rule);
    }

    /// Removes every rule for `(address, selector)`.
    pub fn remove(&mut self, address: Address, selector: Selector) {
        if let Some(target) = self.targets.get_mut(&address) {
            target.rules.retain(|r| r.selector != selector);
        }
    }

    /// Removes every rule for `address`, keeping its registration and
    /// dispatch counters.
    pub fn clear(&mut self, address: Address) {
        if let Some(target) = self.targets.get_mut(&address) {
            target.rules.clear();
        }
    }

    /// Decides the outcome for a call about to be dispatched, counting the
    /// dispatch against the target's per-selector counters.
    ///
    /// Returns `None` when the address is not under interception.
    pub fn decide(&mut self, address: Address, input: &[u8], value: U256) -> Option<Outcome> {
        let target = self.targets.get_mut(&address)?;
        if input.len() < SELECTOR_LEN {
            return Some(match target.kind {
                TargetKind::Fake => Outcome::Revert(format!(
                    "fake contract {address} received a call without a function selector"
                )),
                TargetKind::Mock => Outcome::PassThrough,
            });
        }
        let selector = Selector::from_slice(&input[..SELECTOR_LEN]);
        let args = &input[SELECTOR_LEN..];
        let nth = target.seen.entry(selector).or_insert(0);
        let current = *nth;
        *nth += 1;
        let matched = target
            .rules
            .iter()
            .find(|rule| rule.selector == selector && rule.pattern.matches(args, value, current))
            .map(|rule| rule.outcome.clone());
        Some(matched.unwrap_or_else(|| match target.kind {
            TargetKind::Fake => Outcome::Revert(format!(
                "unknown function selector {selector} on fake contract {address}"
            )),
            TargetKind::Mock => Outcome::PassThrough,
        }))
    }
}

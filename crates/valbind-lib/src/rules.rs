// ABOUTME: Rule engine seam plus a small fluent rule set for plain data objects
// ABOUTME: Exposes rule metadata queries used to scope validation to captured fields

use crate::failure::{failures_from_validator, Failure};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Metadata for one declared rule chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    /// Field the chain validates
    pub field_name: String,
    /// Names of the checks in the chain, in order
    pub checks: Vec<String>,
    /// Whether the chain only runs under a condition
    pub conditional: bool,
}

/// Something that validates a data object and describes its rules
pub trait RuleEngine<T> {
    /// Validate `data`, returning failures in rule declaration order
    fn run_rules(&self, data: &T) -> Vec<Failure>;

    /// Declared rules targeting any of `field_names`
    fn rules_for_fields(&self, field_names: &[&str]) -> Vec<RuleDescriptor>;

    /// Validate only the rules for `field_names`.
    ///
    /// The default runs everything and drops failures for other fields.
    fn run_rules_for(&self, data: &T, field_names: &[&str]) -> Vec<Failure> {
        let mut failures = self.run_rules(data);
        failures.retain(|f| field_names.contains(&f.field_name.as_str()));
        failures
    }
}

/// What a chain does after one of its checks fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cascade {
    /// Run every check in the chain
    #[default]
    Continue,
    /// Skip the rest of the chain after the first failure
    StopOnFirstFailure,
}

type Check<T> = Box<dyn Fn(&T) -> Option<String>>;
type Condition<T> = Box<dyn Fn(&T) -> bool>;

struct Rule<T> {
    name: String,
    check: Check<T>,
}

struct RuleChain<T> {
    field_name: String,
    cascade: Cascade,
    condition: Option<Condition<T>>,
    rules: Vec<Rule<T>>,
}

impl<T> RuleChain<T> {
    fn run(&self, data: &T, failures: &mut Vec<Failure>) {
        if let Some(condition) = &self.condition {
            if !condition(data) {
                trace!(field = %self.field_name, "chain condition not met, skipping");
                return;
            }
        }

        for rule in &self.rules {
            let outcome = (rule.check)(data);
            trace!(field = %self.field_name, rule = %rule.name, passed = outcome.is_none());
            if let Some(message) = outcome {
                failures.push(Failure::new(self.field_name.clone(), message));
                if self.cascade == Cascade::StopOnFirstFailure {
                    break;
                }
            }
        }
    }

    fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            field_name: self.field_name.clone(),
            checks: self.rules.iter().map(|r| r.name.clone()).collect(),
            conditional: self.condition.is_some(),
        }
    }
}

/// Ordered collection of rule chains over `T`.
///
/// Several chains may target the same field; they run in declaration order.
pub struct RuleSet<T> {
    chains: Vec<RuleChain<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { chains: Vec::new() }
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new rule chain for `field_name`
    pub fn rule_for(&mut self, field_name: impl Into<String>) -> FieldRules<'_, T> {
        self.chains.push(RuleChain {
            field_name: field_name.into(),
            cascade: Cascade::default(),
            condition: None,
            rules: Vec::new(),
        });
        let index = self.chains.len() - 1;
        FieldRules {
            chain: &mut self.chains[index],
        }
    }

    /// Number of declared chains
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Distinct field names with at least one chain, in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for chain in &self.chains {
            if !names.contains(&chain.field_name.as_str()) {
                names.push(&chain.field_name);
            }
        }
        names
    }
}

impl<T> RuleEngine<T> for RuleSet<T> {
    fn run_rules(&self, data: &T) -> Vec<Failure> {
        let mut failures = Vec::new();
        for chain in &self.chains {
            chain.run(data, &mut failures);
        }
        failures
    }

    fn rules_for_fields(&self, field_names: &[&str]) -> Vec<RuleDescriptor> {
        self.chains
            .iter()
            .filter(|c| field_names.contains(&c.field_name.as_str()))
            .map(RuleChain::descriptor)
            .collect()
    }

    fn run_rules_for(&self, data: &T, field_names: &[&str]) -> Vec<Failure> {
        let mut failures = Vec::new();
        for chain in self
            .chains
            .iter()
            .filter(|c| field_names.contains(&c.field_name.as_str()))
        {
            chain.run(data, &mut failures);
        }
        failures
    }
}

/// Builder for one rule chain, returned by [`RuleSet::rule_for`]
pub struct FieldRules<'a, T> {
    chain: &'a mut RuleChain<T>,
}

impl<'a, T> FieldRules<'a, T> {
    pub fn cascade(self, cascade: Cascade) -> Self {
        self.chain.cascade = cascade;
        self
    }

    /// Only run this chain when `condition` holds for the data object
    pub fn when(self, condition: impl Fn(&T) -> bool + 'static) -> Self {
        self.chain.condition = Some(Box::new(condition));
        self
    }

    /// Add a check that fails with `message` when `predicate` is false
    pub fn must(
        self,
        name: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        let message = message.into();
        self.custom(name, move |data| {
            if predicate(data) {
                None
            } else {
                Some(message.clone())
            }
        })
    }

    /// Add a check producing its own failure message
    pub fn custom(
        self,
        name: impl Into<String>,
        check: impl Fn(&T) -> Option<String> + 'static,
    ) -> Self {
        self.chain.rules.push(Rule {
            name: name.into(),
            check: Box::new(check),
        });
        self
    }
}

/// Adapter running `validator` derive rules through the [`RuleEngine`] seam.
///
/// `validator` exposes no rule metadata, so descriptor queries come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorEngine;

impl<T: validator::Validate> RuleEngine<T> for ValidatorEngine {
    fn run_rules(&self, data: &T) -> Vec<Failure> {
        match data.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => failures_from_validator(&errors),
        }
    }

    fn rules_for_fields(&self, _field_names: &[&str]) -> Vec<RuleDescriptor> {
        Vec::new()
    }
}

/// Predicates for common checks
pub mod checks {
    use validator::ValidateEmail;

    /// Non-blank text
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    pub fn min_length(value: &str, min: usize) -> bool {
        value.chars().count() >= min
    }

    pub fn max_length(value: &str, max: usize) -> bool {
        value.chars().count() <= max
    }

    /// Inclusive range check
    pub fn in_range<N: PartialOrd>(value: N, min: N, max: N) -> bool {
        value >= min && value <= max
    }

    pub fn contains(value: &str, needle: &str) -> bool {
        value.contains(needle)
    }

    /// Email address as accepted by `validator`'s `#[validate(email)]`
    pub fn is_email(value: &str) -> bool {
        value.validate_email()
    }
}

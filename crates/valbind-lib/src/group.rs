// ABOUTME: Validatables group collecting every validatable field of one form
// ABOUTME: Supports targeted clearing, directive-driven clearing and populating data objects

use crate::clear_options::parse_clear_options;
use crate::field::{update, Shared, SharedValidity, Validity};
use crate::observe::{set_if_changed, Observers, Property, PropertyChanged, SubscriptionId};
use crate::Result;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Ordered group of validatable fields.
///
/// Members are shared handles, so status written through the group is
/// visible on the caller's own wrappers. Members are borrowed mutably while
/// clearing or splitting; do not hold a borrow of one across those calls.
/// Member listeners fire after each member's borrow is released, so they may
/// read their own wrapper.
pub struct Validatables {
    members: Vec<SharedValidity>,
    are_valid: bool,
    errors: Vec<String>,
    first_error: String,
    observers: Observers,
}

/// Builder collecting members of different value types
#[derive(Default)]
pub struct ValidatablesBuilder {
    members: Vec<SharedValidity>,
}

impl ValidatablesBuilder {
    pub fn with<V: Validity + 'static>(mut self, member: &Shared<V>) -> Self {
        let member: SharedValidity = member.clone();
        self.members.push(member);
        self
    }

    pub fn build(self) -> Validatables {
        Validatables::new(self.members)
    }
}

impl Validatables {
    pub fn new(members: Vec<SharedValidity>) -> Self {
        Self {
            members,
            are_valid: true,
            errors: Vec::new(),
            first_error: String::new(),
            observers: Observers::new(),
        }
    }

    pub fn builder() -> ValidatablesBuilder {
        ValidatablesBuilder::default()
    }

    pub fn members(&self) -> &[SharedValidity] {
        &self.members
    }

    /// Field names of all members, in member order
    pub fn field_names(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.borrow().field_name().to_string())
            .collect()
    }

    pub fn are_valid(&self) -> bool {
        self.are_valid
    }

    /// Errors of all members as of the last split or clear
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn first_error(&self) -> &str {
        &self.first_error
    }

    /// Register a listener for group-level `FirstError`, `Errors` and `AreValid` changes
    pub fn subscribe(&mut self, listener: impl Fn(&PropertyChanged) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Re-snapshot the group errors from every member's current errors
    pub(crate) fn refresh_errors(&mut self) {
        let errors: Vec<String> = self
            .members
            .iter()
            .flat_map(|m| m.borrow().errors().to_vec())
            .collect();
        self.set_errors(errors);
    }

    fn set_errors(&mut self, errors: Vec<String>) {
        let first = errors.first().cloned().unwrap_or_default();
        set_if_changed(&mut self.first_error, first, &mut self.observers, None, Property::FirstError);
        set_if_changed(&mut self.errors, errors, &mut self.observers, None, Property::Errors);
        let valid = self.errors.is_empty();
        set_if_changed(&mut self.are_valid, valid, &mut self.observers, None, Property::AreValid);
    }

    /// Clear members and group state.
    ///
    /// `None` or an empty slice targets every member and resets the group
    /// directly. A non-empty target list clears only those members, then
    /// recomputes the group errors from all members so that failures on
    /// untouched fields remain visible.
    pub fn clear(&mut self, reset_value: bool, targets: Option<&[&str]>) {
        let targets = targets.filter(|t| !t.is_empty());

        for member in &self.members {
            update(member, |member| {
                let targeted =
                    targets.map_or(true, |t| t.iter().any(|n| *n == member.field_name()));
                if targeted {
                    member.clear(reset_value);
                }
            });
        }

        match targets {
            None => self.set_errors(Vec::new()),
            Some(_) => self.refresh_errors(),
        }

        debug!(
            reset_value,
            targets = ?targets,
            remaining_errors = self.errors.len(),
            "cleared validatables"
        );
    }

    /// Clear using a directive string such as `"false | name, rating"`.
    ///
    /// A blank directive clears validation state on every member.
    pub fn clear_with(&mut self, directive: &str) -> Result<()> {
        if directive.trim().is_empty() {
            self.clear(false, None);
            return Ok(());
        }

        let options = parse_clear_options(directive)?;
        let names: Option<Vec<&str>> = options
            .fields
            .as_ref()
            .map(|f| f.iter().map(String::as_str).collect());
        self.clear(options.reset_values(), names.as_deref());
        Ok(())
    }

    /// Build a plain data object from member values.
    ///
    /// Member values are gathered into a JSON object keyed by field name and
    /// deserialized into `T`; fields without a member must have a serde default.
    /// When two members share a field name the first one wins, matching
    /// [`split_group`](crate::split_group) where the first member claims the failures.
    pub fn populate<T: DeserializeOwned>(&self) -> Result<T> {
        let mut object = serde_json::Map::new();
        for member in &self.members {
            let member = member.borrow();
            if object.contains_key(member.field_name()) {
                continue;
            }
            object.insert(member.field_name().to_string(), member.value_json()?);
        }
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }
}

impl fmt::Debug for Validatables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validatables")
            .field("fields", &self.field_names())
            .field("are_valid", &self.are_valid)
            .field("errors", &self.errors)
            .finish()
    }
}

// ABOUTME: Validatable field wrapper holding one form value and its validation state
// ABOUTME: Defines the object-safe Validity trait used by groups and result splitting

use crate::observe::{
    set_if_changed, Notifications, Observers, Property, PropertyChanged, SubscriptionId,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, single-threaded handle to a wrapper
pub type Shared<T> = Rc<RefCell<T>>;

/// Shared handle to any wrapper, regardless of value type
pub type SharedValidity = Shared<dyn Validity>;

/// Validation state of a single named field
pub trait Validity {
    /// Property name on the validated data type
    fn field_name(&self) -> &str;

    fn is_valid(&self) -> bool;

    fn errors(&self) -> &[String];

    /// First error, or an empty string when valid
    fn first_error(&self) -> &str;

    /// Replace the error list; validity follows from whether it is empty
    fn apply_errors(&mut self, errors: Vec<String>);

    /// Reset to valid with no errors, optionally resetting the value as well
    fn clear(&mut self, reset_value: bool);

    /// Current value as JSON, used to populate plain data objects
    fn value_json(&self) -> serde_json::Result<serde_json::Value>;

    /// Queue change notifications instead of firing them
    fn defer_notifications(&mut self);

    /// Stop queueing and hand out what was queued since `defer_notifications`
    fn take_notifications(&mut self) -> Notifications;
}

/// Mutate a shared wrapper, firing its listeners only once the borrow is released.
///
/// Listeners fired from inside `borrow_mut()` cannot read the wrapper they
/// observe. Changes made through `update` are queued and dispatched after the
/// `RefMut` is dropped, so listeners may call `borrow()` on the same handle.
pub fn update<V, R>(field: &RefCell<V>, change: impl FnOnce(&mut V) -> R) -> R
where
    V: Validity + ?Sized,
{
    let (result, pending) = {
        let mut field = field.borrow_mut();
        field.defer_notifications();
        let result = change(&mut field);
        (result, field.take_notifications())
    };
    pending.dispatch();
    result
}

/// Observable cell for one form field
#[derive(Debug)]
pub struct Validatable<T> {
    field_name: String,
    value: T,
    is_valid: bool,
    errors: Vec<String>,
    first_error: String,
    observers: Observers,
}

impl<T: Default> Validatable<T> {
    /// Create a valid, empty wrapper for the given property name
    pub fn new(field_name: impl Into<String>) -> Self {
        Self::with_value(field_name, T::default())
    }

    /// Create a wrapper already wrapped in a shared handle
    pub fn shared(field_name: impl Into<String>) -> Shared<Self> {
        Rc::new(RefCell::new(Self::new(field_name)))
    }

    /// Drop listeners, errors and the held value.
    ///
    /// The wrapper stays usable afterwards but nobody is notified anymore.
    pub fn release(&mut self) {
        self.observers.clear();
        self.errors = Vec::new();
        self.first_error = String::new();
        self.is_valid = true;
        self.value = T::default();
    }
}

impl<T> Validatable<T> {
    /// Create a valid wrapper holding an initial value
    pub fn with_value(field_name: impl Into<String>, value: T) -> Self {
        Self {
            field_name: field_name.into(),
            value,
            is_valid: true,
            errors: Vec::new(),
            first_error: String::new(),
            observers: Observers::new(),
        }
    }

    /// Currently held value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Register a listener for changes to this wrapper.
    ///
    /// Listeners run synchronously inside the setter. When the wrapper sits in
    /// a [`Shared`] handle, mutate it through [`update`] if the listener reads
    /// that handle back.
    pub fn subscribe(&mut self, listener: impl Fn(&PropertyChanged) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn set_errors(&mut self, errors: Vec<String>) {
        let first = errors.first().cloned().unwrap_or_default();
        let source = Some(self.field_name.as_str());
        set_if_changed(&mut self.first_error, first, &mut self.observers, source, Property::FirstError);
        set_if_changed(&mut self.errors, errors, &mut self.observers, source, Property::Errors);
        let valid = self.errors.is_empty();
        set_if_changed(&mut self.is_valid, valid, &mut self.observers, source, Property::IsValid);
    }
}

impl<T: PartialEq> Validatable<T> {
    pub fn set_value(&mut self, value: T) {
        set_if_changed(
            &mut self.value,
            value,
            &mut self.observers,
            Some(self.field_name.as_str()),
            Property::Value,
        );
    }
}

impl<T> Validity for Validatable<T>
where
    T: Default + PartialEq + Serialize,
{
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }

    fn first_error(&self) -> &str {
        &self.first_error
    }

    fn apply_errors(&mut self, errors: Vec<String>) {
        self.set_errors(errors);
    }

    fn clear(&mut self, reset_value: bool) {
        self.set_errors(Vec::new());
        if reset_value {
            self.set_value(T::default());
        }
    }

    fn value_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.value)
    }

    fn defer_notifications(&mut self) {
        self.observers.defer();
    }

    fn take_notifications(&mut self) -> Notifications {
        self.observers.take_deferred()
    }
}

// ABOUTME: Explicit change notification for validatable fields and groups
// ABOUTME: Listeners are registered closures fired by setters, immediately or after a deferred batch

use std::fmt;
use std::rc::Rc;

/// Observable properties of fields and groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Value,
    IsValid,
    Errors,
    FirstError,
    AreValid,
}

/// Notification payload handed to listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged {
    /// Field name of the wrapper, or `None` for a group
    pub source: Option<String>,
    pub property: Property,
}

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&PropertyChanged)>;

/// Registered listener list.
///
/// Events fire immediately unless [`Observers::defer`] is active, in which
/// case they queue until [`Observers::take_deferred`] hands them out.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    deferred: Option<Vec<PropertyChanged>>,
}

impl Observers {
    /// Empty listener list that notifies immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every later event
    pub fn subscribe(&mut self, listener: impl Fn(&PropertyChanged) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Fire `property` at every listener, or queue it while deferred
    pub fn notify(&mut self, source: Option<&str>, property: Property) {
        if self.listeners.is_empty() {
            return;
        }
        let event = PropertyChanged {
            source: source.map(str::to_string),
            property,
        };
        match self.deferred.as_mut() {
            Some(queue) => queue.push(event),
            None => {
                for (_, listener) in &self.listeners {
                    listener(&event);
                }
            }
        }
    }

    /// Queue events instead of firing them until `take_deferred` is called
    pub fn defer(&mut self) {
        self.deferred.get_or_insert_with(Vec::new);
    }

    /// Stop deferring and return the queued events with the current listeners
    pub fn take_deferred(&mut self) -> Notifications {
        let events = self.deferred.take().unwrap_or_default();
        let listeners = if events.is_empty() {
            Vec::new()
        } else {
            self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        Notifications { listeners, events }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Drop every listener and any queued events
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.deferred = None;
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .field("deferred", &self.deferred.as_ref().map_or(0, Vec::len))
            .finish()
    }
}

/// Events queued while their owner was borrowed.
///
/// Holds its own handles to the listeners, so it can be dispatched after the
/// owning wrapper's `RefMut` is dropped and listeners may read the wrapper.
#[must_use = "queued events are lost unless dispatched"]
pub struct Notifications {
    listeners: Vec<Listener>,
    events: Vec<PropertyChanged>,
}

impl Notifications {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Fire every queued event, in order, at every listener
    pub fn dispatch(self) {
        for event in &self.events {
            for listener in &self.listeners {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifications")
            .field("listeners", &self.listeners.len())
            .field("events", &self.events)
            .finish()
    }
}

/// Store `new` into `slot` and notify when it differs from the current value.
///
/// Returns whether a change happened.
pub(crate) fn set_if_changed<T: PartialEq>(
    slot: &mut T,
    new: T,
    observers: &mut Observers,
    source: Option<&str>,
    property: Property,
) -> bool {
    if *slot == new {
        return false;
    }
    *slot = new;
    observers.notify(source, property);
    true
}

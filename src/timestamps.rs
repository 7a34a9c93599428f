// 🔗 Timestamps - the entity-owned handle that trackers bind to
//
// The entity owns the only strong reference. Each TrackedField keeps a Weak
// handle, so trackers never keep a registry alive on their own.

use chrono::{DateTime, Utc};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::clock::{Clock, SystemClock};
use crate::field::TrackedField;
use crate::registry::TimestampRegistry;

pub(crate) struct Shared {
    pub(crate) registry: RefCell<TimestampRegistry>,
    pub(crate) clock: Box<dyn Clock>,
}

impl Shared {
    /// Stamp `key` with the clock's current time; returns the instant used
    pub(crate) fn record(&self, key: &str) -> DateTime<Utc> {
        let at = self.clock.now();
        self.registry.borrow_mut().mark_field_updated(key, at);
        at
    }
}

/// Timestamps - one per entity instance
///
/// Not `Send`/`Sync`: an entity and its tracked fields are mutated from a
/// single thread.
pub struct Timestamps {
    inner: Rc<Shared>,
}

impl Timestamps {
    /// Fresh timestamps on the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Fresh timestamps; `created_at` is read from `clock`
    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        let registry = TimestampRegistry::new_at(clock.now());
        Self::from_parts(registry, Box::new(clock))
    }

    /// Rehydrated timestamps on the system clock (see [`TimestampRegistry::rehydrate`])
    pub fn rehydrate(
        fields: &HashMap<String, DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self::from_registry(TimestampRegistry::rehydrate(fields, created_at, updated_at))
    }

    /// Wrap an existing registry, e.g. one deserialized from storage
    pub fn from_registry(registry: TimestampRegistry) -> Self {
        Self::from_parts(registry, Box::new(SystemClock))
    }

    /// Wrap an existing registry with a specific clock
    pub fn from_registry_with_clock<C: Clock + 'static>(registry: TimestampRegistry, clock: C) -> Self {
        Self::from_parts(registry, Box::new(clock))
    }

    fn from_parts(registry: TimestampRegistry, clock: Box<dyn Clock>) -> Self {
        Timestamps {
            inner: Rc::new(Shared {
                registry: RefCell::new(registry),
                clock,
            }),
        }
    }

    // ========================================================================
    // FIELD TRACKERS
    // ========================================================================

    /// Track an attribute named `name`, starting at `initial`
    ///
    /// The timestamp key defaults to `name`; override it with
    /// [`TrackedField::with_timestamp_key`]. Every write is significant until
    /// a predicate is set with [`TrackedField::with_predicate`]. Creating the
    /// tracker records nothing.
    pub fn track<T>(&self, name: impl Into<String>, initial: T) -> TrackedField<T> {
        TrackedField::bind(self.handle(), name.into(), initial)
    }

    /// Track an attribute with every option given up front
    pub fn track_with<T, F>(
        &self,
        name: impl Into<String>,
        initial: T,
        timestamp_key: Option<&str>,
        predicate: F,
    ) -> TrackedField<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        let field = self.track(name, initial).with_predicate(predicate);
        match timestamp_key {
            Some(key) => field.with_timestamp_key(key),
            None => field,
        }
    }

    pub(crate) fn handle(&self) -> Weak<Shared> {
        Rc::downgrade(&self.inner)
    }

    // ========================================================================
    // READ SURFACE
    // ========================================================================

    /// Borrow the registry
    ///
    /// Drop the returned guard before writing to any tracked field of this
    /// entity; a write while it is held panics with a `RefCell` borrow error.
    pub fn registry(&self) -> Ref<'_, TimestampRegistry> {
        self.inner.registry.borrow()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.registry().created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.registry().updated_at()
    }

    pub fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.registry().get(key)
    }

    /// Owned copy of the field map
    pub fn to_map(&self) -> HashMap<String, DateTime<Utc>> {
        self.registry().to_map()
    }

    /// Owned copy of the whole registry, ready to serialize
    pub fn snapshot(&self) -> TimestampRegistry {
        self.registry().clone()
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timestamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timestamps")
            .field("registry", &*self.registry())
            .finish()
    }
}

// ✍️ Tracked Field - per-attribute write hook
//
// Holds the attribute's current value. Every write stores the new value; a
// write the predicate calls significant also stamps the bound registry.

use chrono::{DateTime, Utc};
use std::fmt;
use std::mem;
use std::ops::Deref;
use std::rc::Weak;
use tracing::{debug, trace, warn};

use crate::predicates::ChangePredicate;
use crate::timestamps::Shared;

// ============================================================================
// TRACKED FIELD
// ============================================================================

/// TrackedField - one tracked attribute of an entity
///
/// Created through [`Timestamps::track`](crate::Timestamps::track). Entity
/// authors expose ordinary accessors that delegate to [`TrackedField::read`]
/// and [`TrackedField::write`]:
///
/// ```
/// use field_timestamps::{Timestamps, TrackedField};
///
/// struct Post {
///     timestamps: Timestamps,
///     title: TrackedField<String>,
/// }
///
/// impl Post {
///     fn new(title: &str) -> Self {
///         let timestamps = Timestamps::new();
///         let title = timestamps.track("title", title.to_string());
///         Post { timestamps, title }
///     }
///
///     fn title(&self) -> &str {
///         self.title.read()
///     }
///
///     fn set_title(&mut self, title: &str) {
///         self.title.write(title.to_string());
///     }
/// }
///
/// let mut post = Post::new("draft");
/// assert!(post.timestamps.get("title").is_none());
///
/// post.set_title("final");
/// assert_eq!(post.title(), "final");
/// assert_eq!(post.timestamps.get("title"), Some(post.timestamps.updated_at()));
/// ```
pub struct TrackedField<T> {
    name: String,
    key: String,
    value: T,
    // None: every write is significant
    predicate: Option<ChangePredicate<T>>,
    registry: Weak<Shared>,
}

impl<T> TrackedField<T> {
    pub(crate) fn bind(registry: Weak<Shared>, name: String, initial: T) -> Self {
        TrackedField {
            key: name.clone(),
            name,
            value: initial,
            predicate: None,
            registry,
        }
    }

    /// Builder: record under `key` instead of the attribute name
    pub fn with_timestamp_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder: only writes for which `predicate(old, new)` is true are
    /// recorded
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Attribute name this field was bound with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key this field's changes are recorded under
    pub fn timestamp_key(&self) -> &str {
        &self.key
    }

    pub fn read(&self) -> &T {
        &self.value
    }

    /// Store `new_value`; stamp the registry if the write is significant
    ///
    /// The value is stored even when the write is not significant. Returns
    /// whether it was.
    pub fn write(&mut self, new_value: T) -> bool {
        self.apply(new_value).1
    }

    /// Same as [`TrackedField::write`], returning the previous value
    pub fn replace(&mut self, new_value: T) -> T {
        self.apply(new_value).0
    }

    /// When this field's key was last recorded in the bound registry
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        let shared = self.registry.upgrade()?;
        let at = shared.registry.borrow().get(&self.key);
        at
    }

    fn apply(&mut self, new_value: T) -> (T, bool) {
        // Predicate first: if it panics nothing has been touched yet
        let significant = self
            .predicate
            .as_ref()
            .map_or(true, |predicate| predicate(&self.value, &new_value));
        let old = mem::replace(&mut self.value, new_value);

        if !significant {
            trace!(field = %self.name, key = %self.key, "write not significant, timestamps untouched");
            return (old, false);
        }

        match self.registry.upgrade() {
            Some(shared) => {
                let at = shared.record(&self.key);
                debug!(field = %self.name, key = %self.key, at = %at, "recorded field change");
            }
            None => {
                warn!(field = %self.name, key = %self.key, "timestamp registry dropped, change not recorded");
            }
        }

        (old, true)
    }
}

impl<T> Deref for TrackedField<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> AsRef<T> for TrackedField<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for TrackedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedField")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

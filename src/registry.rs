// 🗂️ Timestamp Registry - creation, last-update and per-field change times
//
// One registry per entity instance. Only significant writes on a bound
// TrackedField mutate it; everything else is read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

// ============================================================================
// TIMESTAMP REGISTRY
// ============================================================================

/// TimestampRegistry - when the entity was created, last updated, and when
/// each tracked field last changed
///
/// - `created_at` never changes after construction
/// - `updated_at` starts at `created_at` and moves with every significant write
/// - a field key is absent until its first significant write
///
/// Deserializing is a verbatim rehydration: nothing is recomputed or checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRegistry {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    fields: HashMap<String, DateTime<Utc>>,
}

impl TimestampRegistry {
    /// Fresh registry stamped with the current wall-clock time
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    /// Alias of [`TimestampRegistry::new`]
    pub fn create() -> Self {
        Self::new()
    }

    /// Fresh registry created at an explicit instant
    pub fn new_at(created_at: DateTime<Utc>) -> Self {
        TimestampRegistry {
            created_at,
            updated_at: created_at,
            fields: HashMap::new(),
        }
    }

    /// Rebuild a registry from persisted data
    ///
    /// The map is copied, so the caller's map and the registry never share
    /// state. `created_at`/`updated_at` are taken as given, even when they
    /// contradict each other or the map; see [`TimestampRegistry::is_consistent`].
    pub fn rehydrate(
        fields: &HashMap<String, DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        TimestampRegistry {
            created_at,
            updated_at,
            fields: fields.clone(),
        }
    }

    /// Rebuild a registry from any sequence of `(key, instant)` pairs
    ///
    /// Later pairs win on duplicate keys. Same trust-the-caller rules as
    /// [`TimestampRegistry::rehydrate`].
    pub fn from_fields<K, I>(fields: I, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DateTime<Utc>)>,
    {
        TimestampRegistry {
            created_at,
            updated_at,
            fields: fields.into_iter().map(|(k, at)| (k.into(), at)).collect(),
        }
    }

    // ========================================================================
    // READ SURFACE
    // ========================================================================

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Last significant write recorded under `key`, if any
    pub fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.fields.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Read-only view of the field map
    pub fn fields(&self) -> &HashMap<String, DateTime<Utc>> {
        &self.fields
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Owned copy of the field map, e.g. for handing to a storage layer
    pub fn to_map(&self) -> HashMap<String, DateTime<Utc>> {
        self.fields.clone()
    }

    /// True when `updated_at >= created_at` and no field entry is newer than
    /// `updated_at`
    ///
    /// Always true for registries driven by a non-decreasing clock. Rehydrated
    /// registries may fail it.
    pub fn is_consistent(&self) -> bool {
        self.updated_at >= self.created_at && self.fields.values().all(|at| *at <= self.updated_at)
    }

    // ========================================================================
    // MUTATION (TrackedField only)
    // ========================================================================

    /// Record a significant write on `key` at `at`
    pub(crate) fn mark_field_updated(&mut self, key: &str, at: DateTime<Utc>) {
        match self.fields.get_mut(key) {
            Some(existing) => *existing = at,
            None => {
                self.fields.insert(key.to_string(), at);
            }
        }
        self.updated_at = at;
    }
}

impl Default for TimestampRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, instant)` pairs of a registry
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, DateTime<Utc>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, DateTime<Utc>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, at)| (k.as_str(), *at))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TimestampRegistry {
    type Item = (&'a str, DateTime<Utc>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

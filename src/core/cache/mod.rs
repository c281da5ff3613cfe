//! Bounded memoization of pipeline results.
//!
//! Entries are evicted strictly in insertion order. Updating an existing key
//! replaces its value without moving it to the back of the queue.

use flowsmith_types::ProcessingResult;
use indexmap::IndexMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_CACHE_CAPACITY: usize = 50;
pub const DEFAULT_INPUT_PREFIX_CHARS: usize = 100;

const FIELD_SEPARATOR: u8 = 0x1f;

/// Cache of finished results keyed by invocation fingerprint.
pub type ResultCache = FifoCache<Fingerprint, Arc<ProcessingResult>>;

/// Identity of a pipeline invocation.
///
/// Only the first `prefix_chars` characters of the serialized input take part,
/// so inputs sharing a long common prefix collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(
        task_id: &str,
        parameters: &Value,
        input: Option<&Value>,
        prefix_chars: usize,
    ) -> Self {
        let serialized_input = input.map(Value::to_string).unwrap_or_default();
        let input_prefix: String = serialized_input.chars().take(prefix_chars).collect();

        let mut hasher = Sha256::new();
        hasher.update(task_id.as_bytes());
        hasher.update([FIELD_SEPARATOR]);
        hasher.update(parameters.to_string().as_bytes());
        hasher.update([FIELD_SEPARATOR]);
        hasher.update(input_prefix.as_bytes());
        Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered cache holding at most `capacity` entries.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    entries: Mutex<IndexMap<K, V>>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    /// Store `value` under `key`, returning the entry evicted to make room.
    pub fn insert(&self, key: K, value: V) -> Option<(K, V)> {
        let mut entries = self.lock();
        if let Some(slot) = entries.get_mut(&key) {
            *slot = value;
            return None;
        }
        entries.insert(key, value);
        if entries.len() > self.capacity {
            entries.shift_remove_index(0)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<K, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

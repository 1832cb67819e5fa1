use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::error::ConfigError;

/// Process configuration held as a mutable JSON tree addressed by dotted paths.
///
/// `get("network.name")` walks objects by key; a numeric segment indexes into
/// an array (`"peers.list.0"`). Unknown keys read as `None`. Clones share the
/// same tree, so the repository can be bound once and read from anywhere.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    tree: Arc<RwLock<Value>>,
}

impl ConfigRepository {
    /// Create a repository from an initial tree. A non-object root is replaced
    /// by an empty object.
    pub fn new(tree: Value) -> Self {
        let tree = match tree {
            Value::Object(_) => tree,
            _ => Value::Object(Map::new()),
        };
        Self {
            tree: Arc::new(RwLock::new(tree)),
        }
    }

    /// Get a raw value. The empty key returns the whole tree.
    pub fn get(&self, key: &str) -> Option<Value> {
        let tree = self.tree.read();
        lookup(&tree, key).cloned()
    }

    /// Get a value deserialized into `T`. Type mismatches read as `None`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Get a value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    /// Check if key exists
    pub fn has(&self, key: &str) -> bool {
        let tree = self.tree.read();
        lookup(&tree, key).is_some()
    }

    /// Set a value, creating intermediate objects as needed. Intermediate
    /// values that are not objects are replaced.
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<(), ConfigError> {
        let value = serde_json::to_value(value).map_err(|source| ConfigError::Serialization {
            key: key.to_string(),
            source,
        })?;
        let mut tree = self.tree.write();
        *slot(&mut tree, key) = value;
        Ok(())
    }

    /// Remove a value. Returns the removed value, if any.
    pub fn unset(&self, key: &str) -> Option<Value> {
        let mut tree = self.tree.write();
        let (parent, last) = match key.rsplit_once('.') {
            Some((parent, last)) => (parent, last),
            None => ("", key),
        };
        let parent = lookup_mut(&mut tree, parent)?;
        parent.as_object_mut()?.remove(last)
    }

    /// Deep-merge `value` into the entry at `key`. Objects merge key by key;
    /// anything else replaces the existing value.
    pub fn merge(&self, key: &str, value: Value) {
        let mut tree = self.tree.write();
        merge_values(slot(&mut tree, key), value);
    }

    /// Snapshot of the whole tree
    pub fn all(&self) -> Value {
        self.tree.read().clone()
    }
}

impl Default for ConfigRepository {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split('.').filter(|segment| !segment.is_empty())
}

fn lookup<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    segments(key).try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn lookup_mut<'a>(tree: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    segments(key).try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    })
}

/// Walk to `key`, creating objects along the way, and return the slot.
fn slot<'a>(tree: &'a mut Value, key: &str) -> &'a mut Value {
    segments(key).fold(tree, |node, segment| {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        match node {
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
            _ => unreachable!("node was just replaced by an object"),
        }
    })
}

/// Deep merge used by the repository and by provider option handling.
pub(crate) fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

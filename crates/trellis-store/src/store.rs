use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::path;

/// A single entry in a [`Store`]: a terminal value or a nested store.
///
/// The discrimination happens once, when the store is built, and is never
/// re-inspected afterwards. Arrays and null are always leaves; only objects
/// become nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// A terminal value, kept opaque whatever its internal structure.
    Leaf(Value),
    /// A nested store.
    Node(Store),
}

impl Entry {
    /// Returns `true` if this entry is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns `true` if this entry is a nested store.
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// The leaf value, if this entry is a leaf.
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Node(_) => None,
        }
    }

    /// The nested store, if this entry is a node.
    pub fn as_node(&self) -> Option<&Store> {
        match self {
            Self::Leaf(_) => None,
            Self::Node(store) => Some(store),
        }
    }
}

/// An insertion-ordered recursive mapping from string keys to entries.
///
/// A `Store` is built once, from a plain object or from flat pairs, and is
/// read-only afterwards: no method mutates an existing store, so shared
/// readers are always safe. Keys are unique per level; depth is bounded by
/// the source object. The empty store is valid and unpacks to `{}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    pub(crate) entries: IndexMap<String, Entry>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Builder
    // -----------------------------------------------------------------------

    /// Build a store from a plain object.
    ///
    /// Object-valued entries become nested stores, recursively. Every other
    /// value (null, booleans, numbers, strings, arrays) is stored as an
    /// opaque leaf. The result is a structural copy down to the leaf values;
    /// the input is neither mutated nor aliased.
    ///
    /// Keys containing [`path::SEPARATOR`] are rejected with
    /// [`StoreError::SeparatorInKey`] since their paths could not round-trip
    /// through the codec.
    pub fn from_object(object: &Map<String, Value>) -> StoreResult<Self> {
        let mut entries = IndexMap::with_capacity(object.len());
        for (key, value) in object {
            if key.contains(path::SEPARATOR) {
                return Err(StoreError::SeparatorInKey { key: key.clone() });
            }
            let entry = match value {
                Value::Object(child) => Entry::Node(Self::from_object(child)?),
                leaf => Entry::Leaf(leaf.clone()),
            };
            entries.insert(key.clone(), entry);
        }
        Ok(Self { entries })
    }

    /// Build a store from a JSON value, which must be an object.
    pub fn from_value(value: &Value) -> StoreResult<Self> {
        match value {
            Value::Object(object) => Self::from_object(object),
            other => Err(StoreError::NotAnObject {
                kind: value_kind(other),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Accessor
    // -----------------------------------------------------------------------

    /// Look up an entry by key at this level.
    ///
    /// Leaf entries expose the stored value as-is; node entries expose the
    /// child store by reference.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Returns `true` if an entry exists at `key` at this level.
    ///
    /// No path traversal; use [`Store::get_path`] for nested lookups.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up an entry by dot-joined path.
    ///
    /// Returns `None` when any segment is absent or when a non-final
    /// segment lands on a leaf.
    pub fn get_path(&self, path: &str) -> Option<&Entry> {
        let segments = path::decode(path);
        let (last, parents) = segments.split_last()?;
        let mut cursor = self;
        for segment in parents {
            cursor = cursor.get(segment)?.as_node()?;
        }
        cursor.get(last)
    }

    /// Number of entries at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys at this level, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries at this level, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    // -----------------------------------------------------------------------
    // Unpacker
    // -----------------------------------------------------------------------

    /// Reconstruct the plain object this store was built from.
    ///
    /// Leaves are copied under their keys; nodes are unpacked recursively.
    /// Key order is preserved at every level, so `to_object` exactly
    /// inverts [`Store::from_object`].
    pub fn to_object(&self) -> Map<String, Value> {
        let mut out = Map::with_capacity(self.entries.len());
        for (key, entry) in &self.entries {
            let value = match entry {
                Entry::Leaf(leaf) => leaf.clone(),
                Entry::Node(child) => Value::Object(child.to_object()),
            };
            out.insert(key.clone(), value);
        }
        out
    }

    /// The store as a JSON value (always an object).
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

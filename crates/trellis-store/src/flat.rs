//! Flat enumeration and reconstruction of stores.
//!
//! [`Store::entries`] flattens a store into an ordered list of
//! (path, leaf value) pairs; [`Store::from_entries`] is its conflict-checked
//! inverse. The pair list is the persisted-state boundary: suitable for a
//! flat key-value backend, or for diffing two nested structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::path::{self, SEPARATOR};
use crate::store::{Entry, Store};

/// One leaf of a flattened store: the dot-joined path and the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// Dot-joined keys from the root to the leaf.
    pub path: String,
    /// The leaf value, unchanged.
    pub value: Value,
}

impl FlatEntry {
    /// Create a flat entry.
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl Store {
    /// Flatten the store into (path, leaf value) pairs.
    ///
    /// Depth-first preorder: entries at each level in insertion order, with
    /// nested stores expanded in place. Only leaves are emitted; internal
    /// nodes never appear as pairs, so a node with no leaves underneath it
    /// contributes nothing and is absent from a flat round trip. The walk
    /// does not consume or mutate the store; repeated calls yield the same
    /// sequence.
    pub fn entries(&self) -> Vec<FlatEntry> {
        let mut out = Vec::new();
        self.walk("", &mut out);
        out
    }

    fn walk(&self, prefix: &str, out: &mut Vec<FlatEntry>) {
        for (key, entry) in self.iter() {
            match entry {
                Entry::Leaf(value) => {
                    out.push(FlatEntry::new(format!("{prefix}{key}"), value.clone()));
                }
                Entry::Node(child) => {
                    child.walk(&format!("{prefix}{key}{SEPARATOR}"), out);
                }
            }
        }
    }

    /// Rebuild a store from flat (path, value) pairs.
    ///
    /// Each path is decoded into key segments and walked from the root,
    /// creating empty nodes for missing intermediate segments. A pair whose
    /// path would traverse through an existing leaf fails with
    /// [`StoreError::PathConflict`], as does a pair whose final segment
    /// lands on an existing subtree; the two orders of the same collision
    /// report the same conflict. A leaf written over an existing leaf at
    /// the final segment overwrites it, keeping the key's original
    /// position.
    ///
    /// On error the whole reconstruction is abandoned; no partial store is
    /// observable.
    pub fn from_entries<I>(pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = FlatEntry>,
    {
        let mut root = Store::new();
        for pair in pairs {
            let segments = path::decode(&pair.path);
            // decode never returns an empty vector; the empty path is one
            // empty segment.
            let Some((last, parents)) = segments.split_last() else {
                continue;
            };
            let mut cursor = &mut root;
            for segment in parents {
                let entry = cursor
                    .entries
                    .entry((*segment).to_string())
                    .or_insert_with(|| Entry::Node(Store::new()));
                match entry {
                    Entry::Node(child) => cursor = child,
                    Entry::Leaf(_) => {
                        return Err(StoreError::PathConflict { path: pair.path });
                    }
                }
            }
            match cursor.entries.get(*last) {
                Some(Entry::Node(_)) => {
                    return Err(StoreError::PathConflict { path: pair.path });
                }
                _ => {
                    cursor
                        .entries
                        .insert((*last).to_string(), Entry::Leaf(pair.value));
                }
            }
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(value: Value) -> Store {
        Store::from_value(&value).unwrap()
    }

    fn paths(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn entries_emits_preorder_paths() {
        let store = store(json!({
            "user": {"name": "Alice", "address": {"city": "Wonderland", "zip": 12345}},
            "active": true
        }));
        let entries = store.entries();
        assert_eq!(
            entries,
            vec![
                FlatEntry::new("user.name", json!("Alice")),
                FlatEntry::new("user.address.city", json!("Wonderland")),
                FlatEntry::new("user.address.zip", json!(12345)),
                FlatEntry::new("active", json!(true)),
            ]
        );
    }

    #[test]
    fn entries_of_empty_store_is_empty() {
        assert!(Store::new().entries().is_empty());
    }

    #[test]
    fn entries_is_restartable() {
        let store = store(json!({"a": {"b": 1}, "c": 2}));
        assert_eq!(store.entries(), store.entries());
    }

    #[test]
    fn array_and_scalar_leaves_emitted_unchanged() {
        let store = store(json!({"list": [1, {"x": 2}], "flag": false}));
        let entries = store.entries();
        assert_eq!(paths(&entries), vec!["list", "flag"]);
        assert_eq!(entries[0].value, json!([1, {"x": 2}]));
    }

    #[test]
    fn internal_nodes_are_not_emitted() {
        let store = store(json!({"a": {"b": {"c": 1}}}));
        assert_eq!(paths(&store.entries()), vec!["a.b.c"]);
    }

    #[test]
    fn from_entries_inverts_entries() {
        let original = store(json!({
            "user": {"name": "Alice", "address": {"city": "Wonderland", "zip": 12345}},
            "active": true
        }));
        let rebuilt = Store::from_entries(original.entries()).unwrap();
        assert_eq!(rebuilt, original);
        assert_eq!(rebuilt.to_object(), original.to_object());
    }

    #[test]
    fn from_entries_hand_authored() {
        let rebuilt = Store::from_entries(vec![
            FlatEntry::new("server.host", json!("localhost")),
            FlatEntry::new("server.port", json!(8080)),
            FlatEntry::new("debug", json!(true)),
        ])
        .unwrap();
        assert_eq!(
            rebuilt.to_value(),
            json!({"server": {"host": "localhost", "port": 8080}, "debug": true})
        );
    }

    #[test]
    fn leaf_then_deeper_path_conflicts() {
        let err = Store::from_entries(vec![
            FlatEntry::new("a.b", json!(1)),
            FlatEntry::new("a.b.c", json!(2)),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::PathConflict { path } if path == "a.b.c"));
    }

    #[test]
    fn deeper_path_then_leaf_conflicts() {
        let err = Store::from_entries(vec![
            FlatEntry::new("a.b.c", json!(2)),
            FlatEntry::new("a.b", json!(1)),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::PathConflict { path } if path == "a.b"));
    }

    #[test]
    fn leaf_over_leaf_overwrites() {
        let rebuilt = Store::from_entries(vec![
            FlatEntry::new("a", json!(1)),
            FlatEntry::new("b", json!(2)),
            FlatEntry::new("a", json!(3)),
        ])
        .unwrap();
        assert_eq!(rebuilt.get("a").unwrap().as_leaf(), Some(&json!(3)));
        // Overwriting keeps the key's first-insertion position.
        let keys: Vec<&str> = rebuilt.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn intermediate_nodes_created_on_demand() {
        let rebuilt = Store::from_entries(vec![FlatEntry::new("a.b.c", json!(1))]).unwrap();
        assert!(rebuilt.get("a").unwrap().is_node());
        assert!(rebuilt.get_path("a.b").unwrap().is_node());
        assert_eq!(rebuilt.get_path("a.b.c").unwrap().as_leaf(), Some(&json!(1)));
    }

    #[test]
    fn empty_path_sets_empty_key_at_root() {
        let rebuilt = Store::from_entries(vec![FlatEntry::new("", json!(7))]).unwrap();
        assert_eq!(rebuilt.get("").unwrap().as_leaf(), Some(&json!(7)));
    }

    #[test]
    fn empty_string_keys_round_trip() {
        let original = store(json!({"": {"x": 1}, "a": {"": 2}}));
        let entries = original.entries();
        assert_eq!(paths(&entries), vec![".x", "a."]);
        let rebuilt = Store::from_entries(entries).unwrap();
        assert_eq!(rebuilt.to_object(), original.to_object());
    }

    #[test]
    fn empty_nodes_are_absent_from_flat_form() {
        let original = store(json!({"a": {}, "b": 1}));
        let entries = original.entries();
        assert_eq!(paths(&entries), vec!["b"]);
        let rebuilt = Store::from_entries(entries).unwrap();
        assert!(!rebuilt.has("a"));
    }

    #[test]
    fn entry_count_matches_leaf_count() {
        let store = store(json!({
            "a": {"b": 1, "c": {"d": 2, "e": 3}},
            "f": [4, 5],
            "g": null
        }));
        assert_eq!(store.entries().len(), 5);
    }

    #[test]
    fn flat_entry_serde_round_trip() {
        let entry = FlatEntry::new("user.address.zip", json!(12345));
        let encoded = serde_json::to_string(&entry).unwrap();
        let decoded: FlatEntry = serde_json::from_str(&encoded).unwrap();
        assert_eq!(entry, decoded);
    }

    #[test]
    fn sibling_paths_share_intermediate_nodes() {
        let rebuilt = Store::from_entries(vec![
            FlatEntry::new("a.x", json!(1)),
            FlatEntry::new("a.y", json!(2)),
        ])
        .unwrap();
        assert_eq!(rebuilt.len(), 1);
        let node = rebuilt.get("a").unwrap().as_node().unwrap();
        assert_eq!(node.len(), 2);
    }
}

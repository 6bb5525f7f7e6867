use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ForestError, ForestResult};

/// Default name of the field that receives each record's children.
pub const DEFAULT_CHILDREN_FIELD: &str = "children";

/// Field names driving the grouping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestOptions {
    /// Field holding a record's own identifier.
    pub id_field: String,
    /// Field holding the identifier of a record's parent.
    pub parent_field: String,
    /// Field name that receives the array of children.
    pub children_field: String,
}

impl ForestOptions {
    /// Options with the default children field name.
    pub fn new(id_field: impl Into<String>, parent_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            parent_field: parent_field.into(),
            children_field: DEFAULT_CHILDREN_FIELD.to_string(),
        }
    }

    /// Override the children field name.
    pub fn with_children_field(mut self, name: impl Into<String>) -> Self {
        self.children_field = name.into();
        self
    }

    fn validate(&self) -> ForestResult<()> {
        if self.children_field == self.id_field || self.children_field == self.parent_field {
            return Err(ForestError::ConflictingFields {
                field: self.children_field.clone(),
            });
        }
        Ok(())
    }
}

/// Why a record was left out of the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The record is not a JSON object.
    NotAnObject,
    /// The identifier field is absent or null.
    MissingId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "not an object"),
            Self::MissingId => write!(f, "missing identifier"),
        }
    }
}

/// A record excluded from the forest, identified by input position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Index of the record in the input slice.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// The result of grouping: top-level records plus skip diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    /// Top-level records (parentless, or parent not found), each augmented
    /// with a children array, recursively.
    pub roots: Vec<Value>,
    /// Records excluded from the output, in input order.
    pub skipped: Vec<SkippedRecord>,
}

/// Group a flat record list into a rooted forest.
///
/// Two passes: the first indexes every usable record by the JSON text of
/// its identifier field, the second links each record to its parent's
/// children list when the parent identifier resolves, and marks it a root
/// otherwise. Roots and children retain input order, and every output
/// record carries a children array (empty when childless).
///
/// Records that are not objects, or whose identifier field is missing or
/// null, are skipped entirely -- they appear neither as roots nor as
/// children. Each skip is logged and reported in [`Forest::skipped`].
/// Records caught in a parent cycle (including self-parenting) are
/// reachable from no root and are absent from the output. When two records
/// share an identifier, the later one wins the index slot and receives the
/// children.
pub fn build_forest(records: &[Value], options: &ForestOptions) -> ForestResult<Forest> {
    options.validate()?;

    let mut skipped = Vec::new();
    let mut kept = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    // First pass: index usable records by identifier.
    for (index, record) in records.iter().enumerate() {
        let reason = match record.as_object() {
            None => Some(SkipReason::NotAnObject),
            Some(object) => match object.get(&options.id_field) {
                None | Some(Value::Null) => Some(SkipReason::MissingId),
                Some(id) => {
                    by_id.insert(id_key(id), index);
                    None
                }
            },
        };
        match reason {
            Some(reason) => {
                warn!(index, reason = %reason, "record skipped");
                skipped.push(SkippedRecord { index, reason });
            }
            None => kept.push(index),
        }
    }

    // Second pass: attach each kept record to its parent, or mark it a root.
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut root_indices = Vec::new();
    for &index in &kept {
        let parent = records[index]
            .as_object()
            .and_then(|object| object.get(&options.parent_field))
            .filter(|value| !value.is_null())
            .map(id_key);
        match parent.and_then(|key| by_id.get(&key).copied()) {
            Some(parent_index) => children_of[parent_index].push(index),
            None => root_indices.push(index),
        }
    }

    // Materialize owned trees from the roots down.
    let mut slots: Vec<Option<Map<String, Value>>> = records
        .iter()
        .map(|record| record.as_object().cloned())
        .collect();
    let roots = root_indices
        .iter()
        .map(|&index| attach(index, &mut slots, &children_of, &options.children_field))
        .collect();

    Ok(Forest { roots, skipped })
}

/// Identifier values are matched by their JSON text, so the string `"1"`
/// and the number `1` stay distinct.
fn id_key(value: &Value) -> String {
    value.to_string()
}

fn attach(
    index: usize,
    slots: &mut [Option<Map<String, Value>>],
    children_of: &[Vec<usize>],
    children_field: &str,
) -> Value {
    // Every kept index is a root or appears in exactly one children list,
    // so each slot is taken at most once.
    let mut object = slots[index].take().unwrap_or_default();
    let children = children_of[index]
        .iter()
        .map(|&child| attach(child, slots, children_of, children_field))
        .collect();
    object.insert(children_field.to_string(), Value::Array(children));
    Value::Object(object)
}

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Metadata, WORKSPACE_KEY};

/// Conjunction of `metadata[key] == value` conditions.
///
/// An empty filter matches every entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    conditions: BTreeMap<String, Value>,
}

impl MetadataFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching a single workspace.
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self::new().with_eq(WORKSPACE_KEY, Value::String(workspace_id.into()))
    }

    /// Require `metadata[key] == value`.
    pub fn with_eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.conditions.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.conditions.iter()
    }

    /// Filter with the given keys removed.
    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            conditions: self
                .conditions
                .iter()
                .filter(|(key, _)| !keys.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Check whether the metadata satisfies every condition.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| metadata.get(key) == Some(expected))
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::probe::as_count;

/// Named counters that accompany a list response (total / active / system / ...).
///
/// Only ever built from what the server sent; an endpoint without stats
/// yields `None` rather than a zeroed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics(BTreeMap<String, Value>);

impl Statistics {
    /// Counter value, accepting numbers and numeric strings.
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.0.get(name).and_then(as_count)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

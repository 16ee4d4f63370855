//! Parameter sanitizer
//! 参数清洗器
//!
//! Drops unset and empty-string values and renders the remainder in its
//! transport form. Sending `status=` would be read as "filter on the empty
//! status" by some backends, so an empty value must never reach the wire.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::list_params::{ListParams, ParamValue};
use crate::error::ListQueryError;

/// Flat key/value set ready for URL query encoding.
///
/// Keys are kept sorted so the same filters always produce the same cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedParams(BTreeMap<String, String>);

impl SanitizedParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Pairs for `reqwest::RequestBuilder::query`.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    /// Compact, order-stable text used inside cache keys.
    pub fn cache_fragment(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Back into `ListParams` (every value becomes text).
    pub fn into_params(self) -> ListParams {
        self.0.into_iter().collect()
    }
}

impl FromIterator<(String, String)> for SanitizedParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Clean `params` for transport.
///
/// Infallible: `ListParams` cannot hold nested values. Non-finite floats have
/// no transport form and are dropped like unset values.
pub fn sanitize(params: &ListParams) -> SanitizedParams {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .and_then(ParamValue::to_transport)
                .map(|v| (key.to_string(), v))
        })
        .collect()
}

/// Clean a loosely-typed JSON object.
///
/// # Errors
///
/// `InvalidParamShape` when a value is an object or array.
pub fn sanitize_json(value: &Value) -> Result<SanitizedParams, ListQueryError> {
    ListParams::from_json(value).map(|params| sanitize(&params))
}

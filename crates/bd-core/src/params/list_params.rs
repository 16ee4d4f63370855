use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ListQueryError;

/// Well-known parameter names shared by every list endpoint.
pub mod keys {
    pub const SEARCH: &str = "search";
    pub const STATUS: &str = "status";
    pub const CATEGORY: &str = "category";
    pub const SORT_BY: &str = "sort_by";
    pub const SORT_DIRECTION: &str = "sort_direction";
    pub const PAGE: &str = "page";
    pub const PER_PAGE: &str = "per_page";
}

/// A single scalar filter value.
///
/// Nested objects and arrays are unrepresentable here; dynamic input that
/// carries them is rejected by [`ListParams::from_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Transport representation, or `None` when the value must not be sent.
    /// 传输层表示；不应发送的值返回 `None`。
    pub(crate) fn to_transport(&self) -> Option<String> {
        match self {
            ParamValue::Text(s) if s.is_empty() => None,
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Int(n) => Some(n.to_string()),
            ParamValue::UInt(n) => Some(n.to_string()),
            ParamValue::Float(f) if !f.is_finite() => None,
            ParamValue::Float(f) => Some(f.to_string()),
            ParamValue::Bool(b) => Some(b.to_string()),
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::UInt(n) => Some(*n),
            ParamValue::Int(n) => u64::try_from(*n).ok(),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 => {
                Some(*f as u64)
            }
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue::UInt(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::UInt(n.into())
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Filter, sort and pagination request shape for a list endpoint.
///
/// A key mapped to `None` stands for both `undefined` and `null`; the
/// sanitizer drops it together with empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    values: BTreeMap<String, Option<ParamValue>>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    /// Record the key with no value (`undefined` / `null`).
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn set_optional(mut self, key: impl Into<String>, value: Option<ParamValue>) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn search(self, text: impl Into<String>) -> Self {
        self.set(keys::SEARCH, text.into())
    }

    pub fn status(self, status: impl Into<String>) -> Self {
        self.set(keys::STATUS, status.into())
    }

    pub fn category(self, category: impl Into<String>) -> Self {
        self.set(keys::CATEGORY, category.into())
    }

    pub fn sort(self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.set(keys::SORT_BY, field.into())
            .set(keys::SORT_DIRECTION, direction.as_str())
    }

    pub fn page(self, page: u64) -> Self {
        self.set(keys::PAGE, page)
    }

    pub fn per_page(self, per_page: u64) -> Self {
        self.set(keys::PER_PAGE, per_page)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key).flatten()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<ParamValue>) {
        self.values.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `patch` on top of these params.
    ///
    /// A `None` in the patch clears the key; any other value overwrites it.
    pub fn merge(&mut self, patch: &ListParams) {
        for (key, value) in &patch.values {
            match value {
                Some(v) => {
                    self.values.insert(key.clone(), Some(v.clone()));
                }
                None => {
                    self.values.remove(key);
                }
            }
        }
    }

    /// Requested page number, when it parses as a positive integer.
    pub fn requested_page(&self) -> Option<u64> {
        self.get(keys::PAGE)
            .and_then(ParamValue::as_u64)
            .filter(|p| *p > 0)
    }

    pub fn requested_per_page(&self) -> Option<u64> {
        self.get(keys::PER_PAGE)
            .and_then(ParamValue::as_u64)
            .filter(|p| *p > 0)
    }

    /// Build params from a loosely-typed JSON object (e.g. a form state blob).
    ///
    /// # Errors
    ///
    /// `InvalidParamShape` when the input is not an object or when any value
    /// is itself an object or array.
    pub fn from_json(value: &Value) -> Result<Self, ListQueryError> {
        let object = value
            .as_object()
            .ok_or_else(|| ListQueryError::InvalidParamShape {
                key: "<root>".to_string(),
                found: json_kind(value),
            })?;

        let mut params = ListParams::new();
        for (key, value) in object {
            let param = match value {
                Value::Null => None,
                Value::Bool(b) => Some(ParamValue::Bool(*b)),
                Value::Number(n) => Some(if let Some(i) = n.as_i64() {
                    ParamValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ParamValue::UInt(u)
                } else {
                    ParamValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }),
                Value::String(s) => Some(ParamValue::Text(s.clone())),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ListQueryError::InvalidParamShape {
                        key: key.clone(),
                        found: json_kind(value),
                    })
                }
            };
            params.values.insert(key.clone(), param);
        }
        Ok(params)
    }

    /// Build params from any serializable filter struct.
    ///
    /// `Option::None` fields become unset keys.
    pub fn from_serialize<T: Serialize + ?Sized>(filters: &T) -> Result<Self, ListQueryError> {
        let value = serde_json::to_value(filters)
            .map_err(|e| ListQueryError::decode("filter params", e))?;
        Self::from_json(&value)
    }
}

impl<K, V> FromIterator<(K, V)> for ListParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ListParams::new();
        for (k, v) in iter {
            params.values.insert(k.into(), Some(v.into()));
        }
        params
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

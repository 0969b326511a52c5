//! PROJ and CF parameter values.
//!
//! Both PROJ parameter dictionaries (the result of `to_dict`) and CF grid-mapping
//! dictionaries are represented as a [`ParamMap`]: an insertion-ordered map from
//! parameter name to [`ParamValue`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::{CrsError, CrsResult};

/// A single PROJ or CF parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    FloatList(Vec<f64>),
    Text(String),
}

impl ParamValue {
    /// Parse the textual value of a PROJ `key=value` token.
    ///
    /// `true`/`false` (any case) become booleans, then integers and floats are
    /// tried in that order, and comma separated numbers become a float list.
    /// Anything else is kept as text.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return ParamValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return ParamValue::Bool(false);
        }
        if let Ok(value) = raw.parse::<i64>() {
            return ParamValue::Int(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return ParamValue::Float(value);
        }
        if raw.contains(',') {
            let parsed: Result<Vec<f64>, _> =
                raw.split(',').map(|part| part.trim().parse::<f64>()).collect();
            if let Ok(values) = parsed {
                return ParamValue::FloatList(values);
            }
        }
        ParamValue::Text(raw.to_string())
    }

    /// Numeric value, if this is an integer or a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON value into a parameter value.
    ///
    /// Returns `None` for `null`, objects and arrays holding non-numbers.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ParamValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ParamValue::Int(i)),
                None => n.as_f64().map(ParamValue::Float),
            },
            Value::String(s) => Some(ParamValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<f64>>>()
                .map(ParamValue::FloatList),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Int(i) => Value::Number((*i).into()),
            ParamValue::Float(f) => float_to_json(*f),
            ParamValue::FloatList(values) => {
                Value::Array(values.iter().map(|v| float_to_json(*v)).collect())
            }
            ParamValue::Text(s) => Value::String(s.clone()),
        }
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Format a float the way PROJ strings expect it: locale independent and
/// keeping a trailing `.0` on whole numbers.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", format_float(*v)),
            ParamValue::FloatList(values) => {
                let joined: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
                write!(f, "{}", joined.join(","))
            }
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(value: Vec<f64>) -> Self {
        ParamValue::FloatList(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

// ============================================================================
// ParamMap
// ============================================================================

/// Insertion-ordered parameter dictionary.
///
/// Replacing an existing key keeps its original position; removing a key keeps
/// the relative order of the remaining entries. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    entries: IndexMap<String, ParamValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Convert to an ordered JSON object.
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }

    /// Build from a JSON object, rejecting values that are not parameters.
    pub fn from_json_map(map: &Map<String, Value>) -> CrsResult<Self> {
        let mut params = ParamMap::new();
        for (key, value) in map {
            let value = ParamValue::from_json(value).ok_or_else(|| CrsError::InvalidParameter {
                param: key.clone(),
                message: format!("unsupported value {}", value),
            })?;
            params.insert(key.clone(), value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamMap::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for ParamMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for ParamMap {
    type Item = (String, ParamValue);
    type IntoIter = indexmap::map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

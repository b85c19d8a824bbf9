//! The serializable value domain for cache entries
//!
//! The service stores structured records: a top-level map from string field
//! names to arbitrary JSON values. [`CacheValue`] closes that domain so the
//! codec and the client work over a type that is always representable on the
//! wire, instead of accepting anything.

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A structured record stored under a cache key
///
/// The top level is always a map; individual fields hold any JSON value
/// (null, bool, number, string, array, or nested map). The client does not
/// interpret field semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheValue(Map<String, Value>);

impl CacheValue {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a field, returning the previous value if the field was set
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the top-level fields
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Lift any serializable type into the value domain
    ///
    /// Fails with [`ClientError::Encode`] when the type cannot be
    /// serialized, or when its serialization is not a map at the top level.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(other) => Err(ClientError::Encode(format!(
                "top-level value must be a map, got {}",
                json_type_name(&other)
            ))),
            Err(err) => Err(ClientError::Encode(err.to_string())),
        }
    }

    /// Read the record back into a typed value
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Consume the record, yielding the underlying field map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Name of a JSON value's type, for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for CacheValue {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<CacheValue> for Value {
    fn from(value: CacheValue) -> Self {
        Self::Object(value.0)
    }
}

impl TryFrom<Value> for CacheValue {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ClientError::Decode(format!(
                "top-level value must be a map, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for CacheValue {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

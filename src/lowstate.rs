//! Lowstate request records.
//!
//! A lowstate is an unstructured mapping: only `client`, `fun`, `token` and
//! `eauth` mean anything to the router, every other key is forwarded to the
//! wrapped client as a call argument.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SaltApiError};

pub(crate) const CLIENT_KEY: &str = "client";
pub(crate) const FUN_KEY: &str = "fun";
pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const EAUTH_KEY: &str = "eauth";

/// A single lowstate chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lowstate(Map<String, Value>);

impl Lowstate {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Insert a key, returning the previous value if any.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The requested client, if the key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if `client` is present but not a string.
    pub fn client(&self) -> Result<Option<&str>> {
        self.str_field(CLIENT_KEY)
    }

    /// The requested function, if the key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if `fun` is present but not a string.
    pub fn fun(&self) -> Result<Option<&str>> {
        self.str_field(FUN_KEY)
    }

    /// Whether a `token` or `eauth` key is present. Values are not inspected;
    /// validating them is the wrapped client's job.
    pub fn has_credentials(&self) -> bool {
        self.0.contains_key(TOKEN_KEY) || self.0.contains_key(EAUTH_KEY)
    }

    fn str_field(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(SaltApiError::invalid(
                key,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Split a decoded payload into lowstate chunks.
    ///
    /// Accepts either a single mapping or a list of mappings.
    ///
    /// # Errors
    ///
    /// Returns an error for any other shape.
    pub fn chunks_from_value(value: Value) -> Result<Vec<Lowstate>> {
        match value {
            Value::Object(map) => Ok(vec![Lowstate(map)]),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(Lowstate(map)),
                    other => Err(SaltApiError::invalid(
                        format!("lowstate[{i}]"),
                        format!("expected a mapping, got {other}"),
                    )),
                })
                .collect(),
            other => Err(SaltApiError::invalid(
                "lowstate",
                format!("expected a mapping or a list of mappings, got {other}"),
            )),
        }
    }
}

impl From<Map<String, Value>> for Lowstate {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Lowstate {
    type Error = SaltApiError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SaltApiError::invalid(
                "lowstate",
                format!("expected a mapping, got {other}"),
            )),
        }
    }
}

impl FromIterator<(String, Value)> for Lowstate {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

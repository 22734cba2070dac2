//! Per-request context handed through the filter.
//!
//! A `RequestContext` is a string-keyed map holding header strings, the raw
//! body source and any metadata the hosting server wants to attach. The filter
//! only ever adds one key, [`PAYLOAD_KEY`].

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Value;

/// Key under which the raw request body is stored.
pub const INPUT_KEY: &str = "http.input";

/// Key under which the decoded JSON body is stored.
pub const PAYLOAD_KEY: &str = "payload";

/// A single value held by a [`RequestContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Plain string, used for headers and metadata.
    Text(String),
    /// Raw body bytes.
    Input(Bytes),
    /// Decoded JSON.
    Json(Value),
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Text(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Text(s)
    }
}

impl From<Bytes> for ContextValue {
    fn from(b: Bytes) -> Self {
        ContextValue::Input(b)
    }
}

impl From<Value> for ContextValue {
    fn from(v: Value) -> Self {
        ContextValue::Json(v)
    }
}

/// Mutable mapping describing one inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    entries: BTreeMap<String, ContextValue>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw body source, if one is attached.
    ///
    /// Both byte and text entries under [`INPUT_KEY`] count as a body.
    pub fn input(&self) -> Option<&[u8]> {
        match self.entries.get(INPUT_KEY) {
            Some(ContextValue::Input(bytes)) => Some(&bytes[..]),
            Some(ContextValue::Text(text)) => Some(text.as_bytes()),
            _ => None,
        }
    }

    /// The decoded payload, if the filter attached one.
    pub fn payload(&self) -> Option<&Value> {
        match self.entries.get(PAYLOAD_KEY) {
            Some(ContextValue::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// String-valued entries, for header lookups.
    pub fn text_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            ContextValue::Text(s) => Some((k.as_str(), s.as_str())),
            _ => None,
        })
    }
}

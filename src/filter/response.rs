//! The (status, headers, body) triple returned by inner handlers.

use std::collections::BTreeMap;

use serde_json::Value;

pub type Headers = BTreeMap<String, String>;

/// Response body as produced by an inner handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body at all.
    Empty,
    /// A single raw string, assumed to be encoded already.
    Text(String),
    /// A sequence of string chunks.
    Chunks(Vec<String>),
    /// An in-memory value still to be serialized.
    Value(Value),
}

impl ResponseBody {
    /// True for bodies with nothing to encode: `Empty`, `null`, an empty
    /// string or an empty chunk list.
    pub fn is_blank(&self) -> bool {
        match self {
            ResponseBody::Empty => true,
            ResponseBody::Text(s) => s.is_empty(),
            ResponseBody::Chunks(chunks) => chunks.is_empty(),
            ResponseBody::Value(v) => v.is_null(),
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(s: &str) -> Self {
        ResponseBody::Text(s.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        ResponseBody::Text(s)
    }
}

impl From<Vec<String>> for ResponseBody {
    fn from(chunks: Vec<String>) -> Self {
        ResponseBody::Chunks(chunks)
    }
}

impl From<Value> for ResponseBody {
    fn from(v: Value) -> Self {
        ResponseBody::Value(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: ResponseBody,
}

impl Response {
    pub fn new(status: u16, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    /// Builder-style header insert.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Header entries as borrowed pairs, for lookups.
    pub fn header_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set a header, dropping any existing key that differs only in case.
    pub fn set_header(&mut self, key: &str, value: String) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.headers.insert(key.to_string(), value);
    }
}

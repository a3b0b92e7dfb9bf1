//! Wire records exchanged with the classification endpoint.
//!
//! The reply stays a dynamic `serde_json::Value`. The server promises
//! nothing about its shape and fields are read off it with loose,
//! script-style property access.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SentimentError;

/// Body posted on every invocation. Constructed fresh, never retained.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub text: String,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, SentimentError> {
        serde_json::to_vec(self).map_err(SentimentError::Encode)
    }
}

/// A parsed reply body.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeReply {
    body: Value,
}

impl AnalyzeReply {
    /// Parses raw reply bytes. Malformed JSON is a fault, and so is a bare
    /// `null`, since reading a property off it cannot succeed.
    pub fn parse(raw: &[u8]) -> Result<Self, SentimentError> {
        let body: Value = serde_json::from_slice(raw)?;
        if body.is_null() {
            return Err(SentimentError::NullBody);
        }
        Ok(Self { body })
    }

    /// Property lookup. Only objects carry properties; every other JSON
    /// value reads as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_object().and_then(|map| map.get(name))
    }

    pub fn sentiment(&self) -> Option<&Value> {
        self.field("sentiment")
    }

    pub fn text(&self) -> Option<&Value> {
        self.field("text")
    }
}

/// Script truthiness of an optional value. Absent is falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// How a value reads once interpolated into markup.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => display_value(v),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // null holes join as empty strings
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Loose equality against a string literal: strings compare directly,
/// arrays compare through their display form.
pub fn loosely_equals(value: Option<&Value>, literal: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == literal,
        Some(v @ Value::Array(_)) => display_value(v) == literal,
        _ => false,
    }
}

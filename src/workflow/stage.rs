//! Loosely-typed stage output with defensive accessors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which unparseable model output is preserved.
pub const RAW_OUTPUT_KEY: &str = "raw_output";

/// Structured output of one agent stage.
///
/// No shape is enforced beyond "is valid JSON": each stage's expected keys
/// are a contract with its agent only. Readers use the `*_or` accessors so
/// a missing or mistyped key degrades to a documented default instead of
/// failing the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageResult(Value);

impl StageResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Placeholder used when the extractor could not recover JSON.
    pub fn fallback(raw: &str) -> Self {
        Self(serde_json::json!({ RAW_OUTPUT_KEY: raw }))
    }

    /// Whether this result is the raw-text placeholder.
    pub fn is_fallback(&self) -> bool {
        self.0.get(RAW_OUTPUT_KEY).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value at `key`, or `default` when absent or mistyped.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Boolean value at `key`, or `default` when absent or mistyped.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Numeric value at `key` rounded to u64, or `default`.
    ///
    /// Models report totals as integers, floats, or numeric strings; all
    /// three are accepted.
    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        match self.0.get(key) {
            Some(value) => number_of(value).map(|n| n.round() as u64).unwrap_or(default),
            None => default,
        }
    }

    /// Array value at `key`, or the empty slice.
    pub fn array(&self, key: &str) -> &[Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Coerce a JSON value into a number, accepting numeric strings.
pub(crate) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

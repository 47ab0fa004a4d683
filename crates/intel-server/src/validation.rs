//! Request body validation.
//!
//! Checks run against the untyped JSON body and collect one message per
//! violated field, so a client sees every problem in a single response.

use serde_json::{Map, Value};

use crate::error::ApiError;

pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

/// Collects field violations for one request body.
pub struct RequestValidator<'a> {
    body: &'a Map<String, Value>,
    details: Vec<String>,
}

impl<'a> RequestValidator<'a> {
    pub fn new(body: &'a Value) -> Result<Self, ApiError> {
        let body = body
            .as_object()
            .ok_or_else(|| ApiError::Validation(vec![BODY_NOT_OBJECT.to_string()]))?;
        Ok(Self {
            body,
            details: Vec::new(),
        })
    }

    fn reject(&mut self, message: String) {
        self.details.push(message);
    }

    /// A required nested object.
    pub fn require_object(&mut self, key: &str) -> Option<&'a Map<String, Value>> {
        match self.body.get(key) {
            None | Some(Value::Null) => {
                self.reject(format!("{key} is required"));
                None
            }
            Some(Value::Object(obj)) => Some(obj),
            Some(_) => {
                self.reject(format!("{key} must be an object"));
                None
            }
        }
    }

    /// A required non-empty string at the top level.
    pub fn require_str(&mut self, key: &str) -> Option<&'a str> {
        let value = self.body.get(key);
        self.check_str(key, value)
    }

    /// A required non-empty string inside `parent`, reported as `label.key`.
    pub fn require_nested_str(
        &mut self,
        label: &str,
        parent: &'a Map<String, Value>,
        key: &str,
    ) -> Option<&'a str> {
        self.check_str(&format!("{label}.{key}"), parent.get(key))
    }

    fn check_str(&mut self, field: &str, value: Option<&'a Value>) -> Option<&'a str> {
        match value {
            None | Some(Value::Null) => {
                self.reject(format!("{field} is required"));
                None
            }
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(_) => {
                self.reject(format!("{field} must be a non-empty string"));
                None
            }
        }
    }

    /// An optional string. Any other value, `null` included, counts as absent.
    pub fn optional_str(&self, key: &str) -> Option<&'a str> {
        match self.body.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(field = key, value = %other, "ignoring non-string optional field");
                None
            }
        }
    }

    /// An optional array whose every element is a string.
    pub fn optional_str_list(&mut self, key: &str) -> Option<Vec<String>> {
        match self.body.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect();
                if strings.is_none() {
                    self.reject(format!("{key} must be an array of strings"));
                }
                strings
            }
            Some(_) => {
                self.reject(format!("{key} must be an array of strings"));
                None
            }
        }
    }

    /// A required value of any type other than `null`.
    pub fn require_present(&mut self, key: &str) -> Option<&'a Value> {
        match self.body.get(key) {
            None | Some(Value::Null) => {
                self.reject(format!("{key} is required"));
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Fail with every collected message, or hand back the validated value.
    pub fn finish<T>(self, validated: Option<T>) -> Result<T, ApiError> {
        if !self.details.is_empty() {
            return Err(ApiError::Validation(self.details));
        }
        validated.ok_or_else(|| ApiError::Internal("validated request is incomplete".into()))
    }
}

//! Open-schema request parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ParamPolicy;
use crate::error::{DatePredictionError, Result};

/// Placeholder rendered for an absent or `null` value
pub const MISSING_PLACEHOLDER: &str = "null";

/// String-keyed map of untyped values from the request's `data` member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Format a value for prompt text.
    ///
    /// Strings are taken verbatim, absent keys and `null` become
    /// [`MISSING_PLACEHOLDER`], everything else is compact JSON.
    pub fn render(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => MISSING_PLACEHOLDER.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Borrow a field that must be a present string
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.0.get(key) {
            None | Some(Value::Null) => Err(DatePredictionError::InvalidParams(format!(
                "missing field `{}`",
                key
            ))),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(DatePredictionError::InvalidParams(format!(
                "field `{}` must be a string",
                key
            ))),
        }
    }

    /// Read a field under the given policy
    pub fn field(&self, key: &str, policy: ParamPolicy) -> Result<String> {
        match policy {
            ParamPolicy::Lenient => Ok(self.render(key)),
            ParamPolicy::Strict => self.require_str(key).map(str::to_string),
        }
    }

    /// Non-empty string under `key`, if any
    pub fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = DatePredictionError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(DatePredictionError::InvalidParams(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        Params::try_from(value).unwrap()
    }

    #[test]
    fn test_render_strings_verbatim() {
        let p = params(json!({"name": "Corn", "empty": ""}));
        assert_eq!(p.render("name"), "Corn");
        assert_eq!(p.render("empty"), "");
    }

    #[test]
    fn test_render_missing_and_null() {
        let p = params(json!({"location": null}));
        assert_eq!(p.render("location"), "null");
        assert_eq!(p.render("absent"), "null");
    }

    #[test]
    fn test_render_non_strings() {
        let p = params(json!({
            "n": 3,
            "f": 2.5,
            "b": true,
            "list": ["ripe", "red"],
            "obj": {"color": "red"}
        }));
        assert_eq!(p.render("n"), "3");
        assert_eq!(p.render("f"), "2.5");
        assert_eq!(p.render("b"), "true");
        assert_eq!(p.render("list"), r#"["ripe","red"]"#);
        assert_eq!(p.render("obj"), r#"{"color":"red"}"#);
    }

    #[test]
    fn test_require_str() {
        let p = params(json!({"name": "Corn", "count": 4, "gone": null}));
        assert_eq!(p.require_str("name").unwrap(), "Corn");

        let err = p.require_str("count").unwrap_err();
        assert_eq!(err.wire_message(), "Invalid params: field `count` must be a string");

        let err = p.require_str("gone").unwrap_err();
        assert_eq!(err.wire_message(), "Invalid params: missing field `gone`");

        assert!(p.require_str("absent").is_err());
    }

    #[test]
    fn test_field_follows_policy() {
        let p = params(json!({"name": "Corn"}));
        assert_eq!(p.field("name", ParamPolicy::Strict).unwrap(), "Corn");
        assert_eq!(p.field("location", ParamPolicy::Lenient).unwrap(), "null");
        assert!(p.field("location", ParamPolicy::Strict).is_err());
    }

    #[test]
    fn test_non_empty_str() {
        let p = params(json!({"prompt": "", "other": "x", "n": 1}));
        assert_eq!(p.non_empty_str("prompt"), None);
        assert_eq!(p.non_empty_str("other"), Some("x"));
        assert_eq!(p.non_empty_str("n"), None);
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(Params::try_from(json!([1, 2])).is_err());
        assert!(Params::try_from(Value::Null).unwrap().is_empty());
    }
}

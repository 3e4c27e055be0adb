//! JSON-RPC envelope types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::params::Params;
use crate::error::{DatePredictionError, Result};

/// Protocol version written into every response
pub const JSONRPC_VERSION: &str = "2.0";

/// Member names of the request envelope as they appear on the wire
const REQUEST_MEMBERS: [&str; 4] = ["jsonrpc", "method", "data", "id"];

/// JSON-RPC request envelope
///
/// Absent or `null` members decode to their zero value. Member names match
/// case-insensitively and a repeated member keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    /// Carried under the `data` key on the wire
    #[serde(rename = "data", default, deserialize_with = "null_as_default")]
    pub params: Params,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Params, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response envelope
///
/// Exactly one of `result` and `error` is set. `error` is a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Create a success response
    pub fn success(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Create a response from a handler outcome
    pub fn from_outcome(id: i64, outcome: Result<Value>) -> Self {
        match outcome {
            Ok(value) => Self::success(id, value),
            Err(err) => Self::error(id, err.wire_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode a raw request body into an envelope
pub fn decode_request(raw: &[u8]) -> Result<RpcRequest> {
    let value: Value = serde_json::from_slice(raw).map_err(DatePredictionError::InvalidJson)?;
    serde_json::from_value(fold_member_names(value)).map_err(DatePredictionError::InvalidJson)
}

/// Rename members like `Method` or `ID` to their canonical spelling.
///
/// An exactly spelled member wins over a differently cased one.
fn fold_member_names(value: Value) -> Value {
    let Value::Object(members) = value else {
        return value;
    };

    let mut folded = Map::new();
    let mut exact = Vec::new();
    for (key, member) in members {
        match REQUEST_MEMBERS
            .iter()
            .find(|name| name.eq_ignore_ascii_case(&key))
        {
            Some(name) if *name != key.as_str() => {
                folded.insert(name.to_string(), member);
            }
            _ => exact.push((key, member)),
        }
    }
    folded.extend(exact);

    Value::Object(folded)
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_reads_params_from_data_key() {
        let req = decode_request(
            br#"{"jsonrpc":"2.0","method":"farmer","data":{"name":"Corn"},"id":7}"#,
        )
        .unwrap();
        assert_eq!(req.method, "farmer");
        assert_eq!(req.id, 7);
        assert_eq!(req.params.get("name"), Some(&json!("Corn")));
    }

    #[test]
    fn test_decode_ignores_params_key() {
        let req = decode_request(br#"{"method":"farmer","params":{"name":"Corn"},"id":1}"#)
            .unwrap();
        assert!(req.params.is_empty());
    }

    #[test]
    fn test_decode_missing_members_default() {
        let req = decode_request(b"{}").unwrap();
        assert_eq!(req, RpcRequest::default());

        let req = decode_request(br#"{"jsonrpc":null,"method":null,"data":null,"id":null}"#)
            .unwrap();
        assert_eq!(req, RpcRequest::default());
    }

    #[test]
    fn test_decode_repeated_member_keeps_last() {
        let req = decode_request(br#"{"jsonrpc":"2.0","method":"bogus","id":1,"id":2}"#).unwrap();
        assert_eq!(req.id, 2);
        assert_eq!(req.method, "bogus");
    }

    #[test]
    fn test_decode_member_names_case_insensitive() {
        let req = decode_request(
            br#"{"JSONRPC":"2.0","Method":"farmer","Data":{"name":"Corn"},"ID":4}"#,
        )
        .unwrap();
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.method, "farmer");
        assert_eq!(req.params.get("name"), Some(&json!("Corn")));
        assert_eq!(req.id, 4);
    }

    #[test]
    fn test_decode_exact_member_name_wins() {
        let req = decode_request(br#"{"ID":1,"id":2,"Id":3}"#).unwrap();
        assert_eq!(req.id, 2);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let bodies: [&[u8]; 7] = [
            b"",
            b"not json",
            b"{\"method\":",
            b"[1,2,3]",
            br#"{"id":"one"}"#,
            br#"{"id":1.5}"#,
            br#"{"data":[1]}"#,
        ];
        for body in bodies {
            let err = decode_request(body).unwrap_err();
            assert!(err.is_decode_error(), "expected decode error for {:?}", body);
        }
    }

    #[test]
    fn test_success_serialization_order() {
        let resp = RpcResponse::success(1, json!("FieldA Corn irrigated"));
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"jsonrpc":"2.0","id":1,"result":"FieldA Corn irrigated"}"#
        );
    }

    #[test]
    fn test_error_serialization_order() {
        let resp = RpcResponse::error(2, "Unknown method");
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"jsonrpc":"2.0","id":2,"error":"Unknown method"}"#
        );
        assert!(!resp.is_success());
    }

    #[test]
    fn test_from_outcome() {
        let ok = RpcResponse::from_outcome(3, Ok(json!("x")));
        assert!(ok.is_success());
        assert_eq!(ok.result, Some(json!("x")));

        let err = RpcResponse::from_outcome(
            4,
            Err(DatePredictionError::UnknownMethod("bogus".into())),
        );
        assert_eq!(err.error.as_deref(), Some("Unknown method"));
        assert_eq!(err.result, None);
        assert_eq!(err.id, 4);
    }
}

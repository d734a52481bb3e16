//! Wire types for the catalog server's JSON-RPC 2.0 channel.
//!
//! A client line is either a request (has an `id`, gets exactly one reply)
//! or a notification (no `id`, never answered). Every reply is an
//! [`OutgoingMessage`]: a result or an error, echoing the request's `id`.
//! When the id cannot be recovered (unparseable or non-UTF-8 input) the
//! error reply carries `"id": null`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP revision negotiated with every client.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "feature-kit-mcp";

const JSONRPC_VERSION: &str = "2.0";

/// Identifier a client attaches to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer id.
    Number(i64),
    /// String id.
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A client request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol marker, checked by [`parse_message`].
    pub jsonrpc: String,
    /// Echoed back in the reply.
    pub id: RequestId,
    /// Method name, e.g. `tools/call`.
    pub method: String,
    /// Method arguments.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Deserialises `params` into `T`; `what` names the params in errors.
    ///
    /// # Errors
    ///
    /// Returns an invalid-params error if params are absent or malformed.
    pub fn params_as<T: DeserializeOwned>(&self, what: &str) -> Result<T, JsonRpcError> {
        let Some(params) = self.params.as_ref() else {
            return Err(JsonRpcError::invalid_params(
                self.id.clone(),
                format!("Missing {what} params"),
            ));
        };

        T::deserialize(params).map_err(|e| {
            JsonRpcError::invalid_params(self.id.clone(), format!("Invalid {what} params: {e}"))
        })
    }
}

/// A client notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    /// Protocol marker, checked by [`parse_message`].
    pub jsonrpc: String,
    /// Notification name, e.g. `notifications/initialized`.
    pub method: String,
    /// Notification payload.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A successful reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    /// Id of the request being answered.
    pub id: RequestId,
    /// Method result.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Wraps `result` as the reply to request `id`.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// The error codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The line was not JSON (or not UTF-8).
    ParseError,
    /// JSON, but not a JSON-RPC 2.0 message, or sent in the wrong state.
    InvalidRequest,
    /// No such method.
    MethodNotFound,
    /// Params missing or of the wrong shape, or content not available.
    InvalidParams,
    /// Content exists but could not be produced.
    InternalError,
}

impl ErrorCode {
    /// Numeric value on the wire.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

/// The `error` member of an error reply.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorObject {
    /// See [`ErrorCode::code`].
    pub code: i32,
    /// Human-readable explanation.
    pub message: String,
}

/// An error reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    jsonrpc: &'static str,
    /// Id of the failed request; serialised as `null` when unknown.
    pub id: Option<RequestId>,
    /// Code and message.
    pub error: ErrorObject,
}

impl JsonRpcError {
    /// Builds an error reply.
    #[must_use]
    pub fn new(id: Option<RequestId>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: ErrorObject {
                code: code.code(),
                message: message.into(),
            },
        }
    }

    /// Input that could not be read as JSON.
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(None, ErrorCode::ParseError, "Parse error")
    }

    /// Well-formed JSON that is not an acceptable request.
    #[must_use]
    pub fn invalid_request(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::InvalidRequest, message)
    }

    /// Unknown method.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            ErrorCode::MethodNotFound,
            format!("Method not found: {method}"),
        )
    }

    /// Bad or unusable params.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), ErrorCode::InvalidParams, message)
    }

    /// Server-side failure while answering.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), ErrorCode::InternalError, message)
    }
}

/// A decoded client line.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// Needs a reply.
    Request(JsonRpcRequest),
    /// Must not be answered.
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    /// Method name of either kind of message.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(req) => &req.method,
            Self::Notification(notif) => &notif.method,
        }
    }
}

/// One reply line.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    /// `result` reply.
    Response(JsonRpcResponse),
    /// `error` reply.
    Error(JsonRpcError),
}

impl From<JsonRpcResponse> for OutgoingMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for OutgoingMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

impl From<Result<JsonRpcResponse, JsonRpcError>> for OutgoingMessage {
    fn from(result: Result<JsonRpcResponse, JsonRpcError>) -> Self {
        result.map_or_else(Self::Error, Self::Response)
    }
}

/// Decodes one client line.
///
/// A line with an `id` member is a request, anything else a notification.
///
/// # Errors
///
/// Parse error for non-JSON or non-object input; invalid-request error for
/// a missing or wrong `jsonrpc` marker, a malformed message, or an empty
/// method name.
pub fn parse_message(line: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(line).map_err(|_| JsonRpcError::parse_error())?;
    let Some(obj) = value.as_object() else {
        return Err(JsonRpcError::parse_error());
    };

    match obj.get("jsonrpc").and_then(Value::as_str) {
        Some(JSONRPC_VERSION) => {}
        Some(_) => {
            return Err(JsonRpcError::invalid_request(
                None,
                "jsonrpc field must be \"2.0\"",
            ))
        }
        None => return Err(JsonRpcError::invalid_request(None, "Missing jsonrpc field")),
    }

    if !obj.contains_key("id") {
        return serde_json::from_value(value)
            .map(IncomingMessage::Notification)
            .map_err(|e| JsonRpcError::invalid_request(None, e.to_string()));
    }

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| JsonRpcError::invalid_request(None, e.to_string()))?;
    if request.method.is_empty() {
        return Err(JsonRpcError::invalid_request(
            Some(request.id),
            "method field cannot be empty",
        ));
    }
    Ok(IncomingMessage::Request(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(line: &str) -> JsonRpcRequest {
        match parse_message(line).unwrap() {
            IncomingMessage::Request(req) => req,
            IncomingMessage::Notification(n) => panic!("expected a request, got {}", n.method),
        }
    }

    #[test]
    fn tool_call_line_is_a_request() {
        let req = request(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list_features"}}"#,
        );
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method, "tools/call");
    }

    #[test]
    fn initialized_line_is_a_notification() {
        let msg = parse_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .unwrap();
        assert_eq!(msg.method(), "notifications/initialized");
        assert!(matches!(msg, IncomingMessage::Notification(_)));
    }

    #[test]
    fn string_ids_are_kept() {
        let req = request(r#"{"jsonrpc":"2.0","id":"read-7","method":"resources/list"}"#);
        assert_eq!(req.id, RequestId::String("read-7".to_string()));
        assert_eq!(req.id.to_string(), "read-7");
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_message("list_features please").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());

        let err = parse_message("[1, 2]").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
    }

    #[test]
    fn jsonrpc_marker_is_checked() {
        let wrong = parse_message(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#).unwrap_err();
        assert_eq!(wrong.error.code, ErrorCode::InvalidRequest.code());

        let missing = parse_message(r#"{"id":1,"method":"ping"}"#).unwrap_err();
        assert_eq!(missing.error.message, "Missing jsonrpc field");
    }

    #[test]
    fn empty_method_keeps_id() {
        let err = parse_message(r#"{"jsonrpc":"2.0","id":7,"method":""}"#).unwrap_err();
        assert_eq!(err.id, Some(RequestId::Number(7)));
    }

    #[test]
    fn params_as_reports_missing_and_malformed() {
        #[derive(Debug, Deserialize)]
        struct Uri {
            #[allow(dead_code)]
            uri: String,
        }

        let req = request(r#"{"jsonrpc":"2.0","id":1,"method":"resources/read"}"#);
        let err = req.params_as::<Uri>("resource read").unwrap_err();
        assert_eq!(err.error.message, "Missing resource read params");

        let req = request(r#"{"jsonrpc":"2.0","id":1,"method":"resources/read","params":{"uri":3}}"#);
        let err = req.params_as::<Uri>("resource read").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InvalidParams.code());
        assert_eq!(err.id, Some(RequestId::Number(1)));
    }

    #[test]
    fn replies_serialise_untagged() {
        let ok: OutgoingMessage =
            JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({})).into();
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#
        );

        let err: OutgoingMessage =
            JsonRpcError::method_not_found(RequestId::Number(2), "prompts/list").into();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""code":-32601"#));
        assert!(json.contains("prompts/list"));
    }

    #[test]
    fn unknown_id_serialises_as_null() {
        let json = serde_json::to_string(&JsonRpcError::parse_error()).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }
}

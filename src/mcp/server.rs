//! MCP server for the Feature Kit catalog.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Tool calls and resource reads against the catalog
//! 3. **Shutdown**: EOF on stdin or a termination signal
//!
//! Request handling is split from I/O: [`McpServer::handle_bytes`] turns one
//! incoming line into at most one outgoing message, and the run loop only
//! moves lines between the transport and that function.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::FeatureError;
use crate::handlers::FeatureKit;
use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, OutgoingMessage, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::resources::{list_resources, ResourceContent, ResourceUri};
use crate::mcp::tools::{tool_definitions, ToolCallResult, ToolRequest};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Methods this server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum McpMethod {
    Initialize,
    Ping,
    ListTools,
    CallTool,
    ListResources,
    ReadResource,
}

impl McpMethod {
    fn parse(method: &str) -> Option<Self> {
        Some(match method {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            "resources/list" => Self::ListResources,
            "resources/read" => Self::ReadResource,
            _ => return None,
        })
    }
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ListCapabilities,
    /// Resource-related capabilities.
    pub resources: ListCapabilities,
}

/// Capabilities of a listable surface. The catalog never changes at runtime.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCapabilities {
    /// Whether the list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Parameters for resources/read request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    /// URI of the resource.
    pub uri: String,
}

/// The MCP server for the Feature Kit catalog.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Catalog operations.
    kit: FeatureKit,
}

impl McpServer {
    /// Creates a new MCP server serving `kit`.
    #[must_use]
    pub fn new(kit: FeatureKit) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            protocol_version: None,
            kit,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Protocol version agreed during initialisation.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// The catalog service.
    #[must_use]
    pub const fn kit(&self) -> &FeatureKit {
        &self.kit
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<Vec<u8>>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("stdin closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if let Some(reply) = self.handle_bytes(&line).await {
            self.transport.write_message(&reply).await?;
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles one raw input line.
    ///
    /// A line that is not valid UTF-8 gets a parse-error reply; it never
    /// ends the session.
    pub async fn handle_bytes(&mut self, line: &[u8]) -> Option<OutgoingMessage> {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_line(text).await,
            Err(e) => {
                warn!(error = %e, "Input line is not valid UTF-8");
                Some(JsonRpcError::parse_error().into())
            }
        }
    }

    /// Handles one line of input, returning the reply to send (if any).
    ///
    /// Blank lines and notifications produce no reply.
    pub async fn handle_line(&mut self, line: &str) -> Option<OutgoingMessage> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(&req).await),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                None
            }
            Err(error) => Some(error.into()),
        }
    }

    /// Handles an incoming request.
    async fn handle_request(&mut self, req: &JsonRpcRequest) -> OutgoingMessage {
        debug!(id = %req.id, method = %req.method, "Request");

        let Some(method) = McpMethod::parse(&req.method) else {
            return JsonRpcError::method_not_found(req.id.clone(), &req.method).into();
        };

        let response = match method {
            McpMethod::Initialize => self.handle_initialize(req),
            McpMethod::Ping => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            McpMethod::ListTools => self.handle_tools_list(req),
            McpMethod::CallTool => self.handle_tools_call(req).await,
            McpMethod::ListResources => self.handle_resources_list(req).await,
            McpMethod::ReadResource => self.handle_resources_read(req).await,
        };

        response.into()
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = req.params_as("initialize")?;
        if let Some(ref client) = params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Client connected"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": tool_definitions() }),
        ))
    }

    /// Handles the tools/call request.
    ///
    /// Tool failures are reported in-band as `isError` content; only
    /// malformed call params become JSON-RPC errors.
    async fn handle_tools_call(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req.params_as("tool call")?;

        let result = match ToolRequest::parse(&params.name, &params.arguments) {
            Ok(request) => match self.call_tool(request).await {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => {
                    debug!(tool = %params.name, error = %e, "Tool call failed");
                    ToolCallResult::error(e)
                }
            },
            Err(e) => ToolCallResult::error(e),
        };

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Runs a validated tool request against the catalog.
    async fn call_tool(&self, request: ToolRequest) -> Result<String, FeatureError> {
        let kit = &self.kit;
        match request {
            ToolRequest::ListFeatures => Ok(kit.list_features().await),
            ToolRequest::FeatureCode { feature } => kit.feature_code(&feature).await,
            ToolRequest::FeatureDocumentation { feature } => kit.documentation(&feature).await,
            ToolRequest::FeatureIntegrationInstructions { feature } => {
                kit.integration_instructions(&feature).await
            }
            ToolRequest::FeatureTypes { feature } => kit.types(&feature).await,
            ToolRequest::FeatureHooks { feature } => kit.hooks(&feature).await,
            ToolRequest::FeatureAdapters { feature } => kit.adapters(&feature).await,
            ToolRequest::FeatureConstitution => kit.constitution().await,
            ToolRequest::DemoGuide => kit.demo_guide().await,
            ToolRequest::CreateComponent {
                component_name,
                description,
                requirements,
            } => {
                kit.create_component(&component_name, &description, requirements.as_deref())
                    .await
            }
            ToolRequest::SearchFeatures { query } => Ok(kit.search(&query).await),
        }
    }

    /// Handles the resources/list request.
    async fn handle_resources_list(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let registry = self.kit.store().ensure_loaded().await;
        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "resources": list_resources(registry) }),
        ))
    }

    /// Handles the resources/read request.
    async fn handle_resources_read(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ReadResourceParams = req.params_as("resource read")?;
        let uri = ResourceUri::parse(&params.uri).ok_or_else(|| {
            JsonRpcError::invalid_params(
                req.id.clone(),
                format!("Unknown resource: {}", params.uri),
            )
        })?;

        let text = match uri {
            ResourceUri::Constitution => self.kit.constitution().await,
            ResourceUri::DemoGuide => self.kit.demo_guide().await,
            ResourceUri::Feature(ref slug) => self.kit.documentation(slug).await,
        }
        .map_err(|e| {
            warn!(uri = %params.uri, error = %e, "Resource read failed");
            if matches!(e, FeatureError::Read { .. }) {
                JsonRpcError::internal_error(req.id.clone(), e.to_string())
            } else {
                JsonRpcError::invalid_params(req.id.clone(), e.to_string())
            }
        })?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "contents": [ResourceContent::markdown(&uri, text)] }),
        ))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::invalid_request(
                Some(id.clone()),
                "Server not initialised",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::catalog::ContentLayout;
    use crate::mcp::protocol::ErrorCode;

    fn server_for(root: &std::path::Path) -> McpServer {
        McpServer::new(FeatureKit::new(ContentLayout::new(root)))
    }

    async fn initialised(root: &std::path::Path) -> McpServer {
        let mut server = server_for(root);
        server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}"#,
            )
            .await;
        server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        server
    }

    fn to_json(msg: Option<OutgoingMessage>) -> Value {
        serde_json::to_value(msg.expect("expected a reply")).unwrap()
    }

    #[test]
    fn server_initial_state() {
        let server = server_for(std::path::Path::new("."));
        assert_eq!(server.state(), ServerState::AwaitingInit);
    }

    #[test]
    fn method_parsing() {
        assert_eq!(McpMethod::parse("tools/call"), Some(McpMethod::CallTool));
        assert_eq!(McpMethod::parse("resources/read"), Some(McpMethod::ReadResource));
        assert_eq!(McpMethod::parse("prompts/list"), None);
    }

    #[tokio::test]
    async fn lifecycle_reaches_running() {
        let dir = tempfile::tempdir().unwrap();
        let server = initialised(dir.path()).await;
        assert_eq!(server.state(), ServerState::Running);
        assert_eq!(server.protocol_version(), Some(MCP_PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn tools_require_initialisation() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server_for(dir.path());
        let reply = to_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
                .await,
        );
        assert_eq!(reply["error"]["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn second_initialize_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = initialised(dir.path()).await;
        let reply = to_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":9,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
                )
                .await,
        );
        assert!(reply["error"]["message"]
            .as_str()
            .unwrap()
            .contains("already initialised"));
    }

    #[tokio::test]
    async fn capabilities_include_resources() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server_for(dir.path());
        let reply = to_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
                )
                .await,
        );
        assert_eq!(reply["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert!(reply["result"]["capabilities"]["tools"].is_object());
        assert!(reply["result"]["capabilities"]["resources"].is_object());
        assert_eq!(reply["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn unknown_tool_is_error_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = initialised(dir.path()).await;
        let reply = to_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
                )
                .await,
        );
        assert_eq!(reply["result"]["isError"], true);
        assert_eq!(reply["result"]["content"][0]["text"], "Error: Unknown tool: nope");
    }

    #[tokio::test]
    async fn unknown_method_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = initialised(dir.path()).await;
        assert!(server.handle_line("   ").await.is_none());

        let reply = to_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"prompts/list"}"#)
                .await,
        );
        assert_eq!(reply["error"]["code"], ErrorCode::MethodNotFound.code());
    }

    #[tokio::test]
    async fn non_utf8_line_does_not_end_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = initialised(dir.path()).await;

        let bad: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"tools/call\",\
            \"params\":{\"name\":\"search_features\",\"arguments\":{\"query\":\"\xff\"}}}";
        let reply = to_json(server.handle_bytes(bad).await);
        assert_eq!(reply["error"]["code"], ErrorCode::ParseError.code());
        assert!(reply["id"].is_null());
        assert_eq!(server.state(), ServerState::Running);

        let reply = to_json(
            server
                .handle_bytes(br#"{"jsonrpc":"2.0","id":6,"method":"ping"}"#)
                .await,
        );
        assert_eq!(reply["id"], 6);
        assert!(reply["result"].is_object());
    }

    #[tokio::test]
    async fn unknown_resource_uri_is_invalid_params() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sandbox/variant-1/features")).unwrap();
        let mut server = initialised(dir.path()).await;
        let reply = to_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":4,"method":"resources/read","params":{"uri":"feature-kit://bogus"}}"#,
                )
                .await,
        );
        assert_eq!(reply["error"]["code"], ErrorCode::InvalidParams.code());
    }
}

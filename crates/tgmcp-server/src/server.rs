//! MCP server over newline-delimited JSON-RPC on stdio.
//!
//! stdout carries responses only; everything else (logs included) goes to
//! stderr. Requests without an id are notifications and get no reply.

use std::io::Write;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use tgmcp_core::{utils::truncate_text, Result};

use crate::jsonrpc::{
    error_response, success_response, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId,
    INTERNAL_ERROR, INVALID_REQUEST, PARSE_ERROR,
};
use crate::registry::ToolRegistry;

pub const SERVER_NAME: &str = "tgmcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol revisions this server speaks, newest first. An `initialize`
/// asking for anything else is answered with the newest one.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Read lines from stdin until EOF, answering each request on stdout.
    /// Malformed lines are reported (when an id can be salvaged) or skipped;
    /// the loop never dies on bad input.
    pub async fn run_stdio(&self) -> Result<()> {
        info!(
            tools = self.registry.len(),
            "MCP server listening on stdio"
        );

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let mut stdout = std::io::stdout();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| tgmcp_core::Error::Transport(format!("stdin read failed: {e}")))?
        {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.process_line(line).await {
                let body = serde_json::to_string(&response)?;
                writeln!(stdout, "{body}")
                    .and_then(|_| stdout.flush())
                    .map_err(|e| {
                        tgmcp_core::Error::Transport(format!("stdout write failed: {e}"))
                    })?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// One raw input line to at most one response.
    async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, line = %truncate_text(line, 200), "rejecting input line");
                // Invalid JSON is a parse error; valid JSON that is not a
                // request object is an invalid request. Salvage an id from
                // the latter so the caller can correlate the error.
                let response = match serde_json::from_str::<Value>(line) {
                    Ok(v) => {
                        let id = v
                            .get("id")
                            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                        error_response(
                            id,
                            JsonRpcError::new(INVALID_REQUEST, format!("invalid request: {e}")),
                        )
                    }
                    Err(_) => error_response(
                        None,
                        JsonRpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                    ),
                };
                return Some(response);
            }
        };
        self.process_request(request).await
    }

    /// Dispatch one request. `None` means notification: no reply at all.
    pub async fn process_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = request;

        if jsonrpc != crate::jsonrpc::JSONRPC_VERSION {
            return Some(error_response(
                id,
                JsonRpcError::new(INVALID_REQUEST, "unsupported jsonrpc version"),
            ));
        }

        let is_notification = id.is_none();
        debug!(%method, notification = is_notification, "handling request");

        let outcome = match method.as_str() {
            "initialize" => Ok(self.handle_initialize(params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({"tools": self.registry.specs()})),
            "tools/call" => self.handle_tools_call(params).await,
            _ => Err(JsonRpcError::method_not_found()),
        };

        if is_notification {
            if let Err(e) = outcome {
                warn!(%method, code = e.code, "notification failed: {}", e.message);
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => success_response(id, result),
            Err(error) => error_response(id, error),
        })
    }

    fn handle_initialize(&self, params: Option<Value>) -> Value {
        let requested = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);

        let negotiated = match requested {
            Some(v) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v) => v,
            _ => SUPPORTED_PROTOCOL_VERSIONS[0],
        };

        info!(
            requested = requested.unwrap_or("<none>"),
            negotiated, "initialize"
        );

        json!({
            "protocolVersion": negotiated,
            "capabilities": {"tools": {}},
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
            }
        })
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params = params.unwrap_or(Value::Null);
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("missing tool name"))?;
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        match self.registry.dispatch(name, arguments).await {
            Some(result) => serde_json::to_value(&result)
                .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string())),
            None => Err(JsonRpcError::invalid_params(format!("unknown tool: {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tools::testing::RecordingApi;

    fn server() -> McpServer {
        let api = Arc::new(RecordingApi::new());
        McpServer::new(ToolRegistry::new(api).unwrap())
    }

    fn request(method: &str, params: Value, id: i64) -> JsonRpcRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": method, "params": params, "id": id
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn initialize_negotiates_known_version() {
        let server = server();
        let resp = server
            .process_request(request(
                "initialize",
                json!({"protocolVersion": "2024-11-05"}),
                1,
            ))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], json!("2024-11-05"));
        assert_eq!(result["serverInfo"]["name"], json!(SERVER_NAME));
    }

    #[tokio::test]
    async fn initialize_falls_back_to_newest_version() {
        let server = server();
        let resp = server
            .process_request(request(
                "initialize",
                json!({"protocolVersion": "1999-01-01"}),
                1,
            ))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(
            result["protocolVersion"],
            json!(SUPPORTED_PROTOCOL_VERSIONS[0])
        );
    }

    #[tokio::test]
    async fn ping_answers_empty_object() {
        let server = server();
        let resp = server.process_request(request("ping", json!({}), 2)).await.unwrap();
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn tools_list_returns_all_specs() {
        let server = server();
        let resp = server
            .process_request(request("tools/list", json!({}), 3))
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 10);
    }

    #[tokio::test]
    async fn tools_call_wraps_tool_result() {
        let server = server();
        let resp = server
            .process_request(request(
                "tools/call",
                json!({"name": "get_bot_info", "arguments": {}}),
                4,
            ))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], json!("text"));
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["username"], json!("test_bot"));
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let server = server();
        let resp = server
            .process_request(request("tools/call", json!({"name": "nope"}), 5))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, crate::jsonrpc::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let server = server();
        let resp = server
            .process_request(request("resources/list", json!({}), 6))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, crate::jsonrpc::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn null_id_is_a_request_not_a_notification() {
        let server = server();
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "ping", "id": null
        }))
        .unwrap();
        let resp = server.process_request(req).await.unwrap();
        assert_eq!(resp.result, Some(json!({})));
        assert_eq!(resp.id, Some(RequestId::Null));
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let server = server();
        let req: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(server.process_request(req).await.is_none());
    }

    #[tokio::test]
    async fn invalid_json_gets_parse_error() {
        let server = server();
        let resp = server.process_line("{\"id\": 9, not json").await.unwrap();
        assert_eq!(resp.error.as_ref().unwrap().code, PARSE_ERROR);
        // id unrecoverable from invalid JSON
        assert_eq!(resp.id, None);
    }

    #[tokio::test]
    async fn valid_json_that_is_no_request_gets_invalid_request() {
        let server = server();
        let resp = server.process_line("[1,2,3]").await.unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        // A malformed request object still gets its id echoed back.
        let resp = server
            .process_line("{\"jsonrpc\": \"2.0\", \"method\": 5, \"id\": 9}")
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, Some(RequestId::Number(9)));
    }
}

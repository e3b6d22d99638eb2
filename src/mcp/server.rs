//! Task dispatch MCP server
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Each tool call is a full
//! load → operate → save cycle through [`crate::service`], so the server keeps
//! no task state between requests.

use crate::log_mcp_operation;
use crate::project::ProjectContext;
use crate::service::{self, ServiceResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const SERVER_ERROR: i32 = -32000;

/// Tool schemas advertised by `tools/list`
const MCP_TOOLS: &str = include_str!("../../mcp-server.json");

/// Serve requests on stdin/stdout until stdin closes.
pub async fn run(ctx: ProjectContext) -> io::Result<()> {
    tracing::info!(
        config_path = %ctx.config_path().display(),
        "MCP server started"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let result = serve(&ctx, stdin, stdout).await;

    tracing::info!("MCP server stopped");
    result
}

/// Request loop over any line-oriented reader and writer.
pub async fn serve<R, W>(ctx: &ProjectContext, mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding request line that is not UTF-8");
                let response =
                    error_response(None, PARSE_ERROR, format!("Parse error: invalid UTF-8: {}", e));
                write_response(&mut writer, &response).await?;
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => {
                if request.id.is_none() {
                    handle_notification(&request);
                    continue;
                }
                handle_request(ctx, request).await
            },
            Err(e) => error_response(None, PARSE_ERROR, format!("Parse error: {}", e)),
        };

        write_response(&mut writer, &response).await?;
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "initialized" | "notifications/initialized" => tracing::info!("MCP client initialized"),
        "notifications/cancelled" => tracing::warn!("Request cancelled"),
        other => tracing::warn!(method = other, "Unknown notification"),
    }
}

fn error_response(id: Option<Value>, code: i32, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError { code, message }),
    }
}

async fn handle_request(ctx: &ProjectContext, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return error_response(
            request.id,
            INVALID_REQUEST,
            format!("Invalid JSON-RPC version: {}", request.jsonrpc),
        );
    }

    log_mcp_operation!("request", request.method.as_str());

    let result = match request.method.as_str() {
        "initialize" => handle_initialize(request.params),
        "ping" => Ok(json!({})),
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(ctx, request.params).await,
        _ => Err(format!("Method not found: {}", request.method)),
    };

    match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: Some(value),
            error: None,
        },
        Err(message) => error_response(request.id, SERVER_ERROR, message),
    }
}

fn handle_initialize(_params: Option<Value>) -> Result<Value, String> {
    Ok(json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": "task-dispatch",
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

fn handle_tools_list() -> Result<Value, String> {
    let config: Value = serde_json::from_str(MCP_TOOLS)
        .map_err(|e| format!("Failed to parse MCP tools schema: {}", e))?;

    Ok(json!({
        "tools": config.get("tools").cloned().unwrap_or_else(|| json!([]))
    }))
}

async fn handle_tool_call(ctx: &ProjectContext, params: Option<Value>) -> Result<Value, String> {
    let params: ToolCallParams = serde_json::from_value(params.unwrap_or_else(|| json!({})))
        .map_err(|e| format!("Invalid tool call parameters: {}", e))?;

    log_mcp_operation!("tools/call", params.name.as_str());

    let store = ctx.store();
    let outcome = match params.name.as_str() {
        "next_task" => tool_result(service::next_task(&store)),
        "set_task_status" => {
            let identifier = string_arg(&params.arguments, "identifier")?;
            let status = string_arg(&params.arguments, "status")?;
            tool_result(service::set_task_status(&store, &identifier, &status))
        },
        "initialize_tasks" => tool_result(service::initialize_tasks(&store)),
        _ => return Err(format!("Unknown tool: {}", params.name)),
    };

    outcome.map_err(|e| format!("Serialization error: {}", e))
}

/// Missing arguments read as empty so the operation reports them itself.
fn string_arg(args: &Value, name: &str) -> Result<String, String> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!(
            "Parameter '{}' must be a string, got: {}",
            name, other
        )),
    }
}

fn tool_result<T: Serialize>(response: ServiceResponse<T>) -> serde_json::Result<Value> {
    let value = match response {
        ServiceResponse::Success { data } => json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string_pretty(&json!({ "data": data }))?
            }]
        }),
        ServiceResponse::Error { error } => json!({
            "content": [{
                "type": "text",
                "text": format!("Error: {}", error)
            }],
            "isError": true
        }),
    };
    Ok(value)
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

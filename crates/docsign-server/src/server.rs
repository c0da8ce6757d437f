//! Server loop
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! Each message is handled on its own task, so a long `next_signature`
//! wait does not hold up later requests; responses are written in
//! completion order by a single writer task. Notifications get no
//! response.

use std::sync::Arc;
use std::time::Duration;

use docsign_core::{ServiceConfig, SignatureManager, Watcher};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::handlers::{Manager, SignatureWatcher, ToolContext, handle_tool_call};
use crate::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolCallParams, ToolsCapability, codes,
};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// Responses waiting for the writer
const RESPONSE_BUFFER: usize = 64;

/// JSON-RPC front end over a [`SignatureManager`]
///
/// # Example
///
/// ```ignore
/// use docsign_core::ServiceConfig;
/// use docsign_server::DocsignServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = DocsignServer::from_config(&ServiceConfig::default())?;
///     server.run().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DocsignServer {
    manager: Manager,

    /// Poll interval for `next_signature`
    poll_interval: Duration,

    /// Started on initialize so `next_signature` only sees later signatures
    watcher: Option<Arc<Mutex<SignatureWatcher>>>,

    tools: Arc<[ToolDefinition]>,
}

impl DocsignServer {
    pub fn new(manager: Manager, poll_interval: Duration) -> Self {
        Self {
            manager,
            poll_interval,
            watcher: None,
            tools: Arc::from([]),
        }
    }

    /// Open the configured store and wrap it in a manager
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let store = config.open_store()?;
        let manager = SignatureManager::new(store).with_options(config.manager_options());
        Ok(Self::new(manager, config.watch.poll_interval()))
    }

    /// Load tool definitions and start watching for new signatures
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::info!(poll_interval = ?self.poll_interval, "Initializing server");

        self.tools = get_tool_definitions().into();
        let watcher = Watcher::start(self.manager.clone(), self.poll_interval).await?;
        self.watcher = Some(Arc::new(Mutex::new(watcher)));
        Ok(())
    }

    /// Serve stdin until it closes
    pub async fn run(&mut self) -> Result<()> {
        self.initialize().await?;

        tracing::info!("Server ready, listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Serve line-delimited messages from `input` until it closes
    ///
    /// Every message runs on its own task. Returns once all in-flight
    /// requests have been answered and flushed to `output`.
    pub async fn serve<R, W>(&self, input: R, output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(RESPONSE_BUFFER);
        let writer = tokio::spawn(write_responses(output, rx));

        let mut in_flight = JoinSet::new();
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(request = %line, "Received message");

            let server = self.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                let response = server.respond(&line).await;
                if !response.is_empty() && tx.send(response).await.is_err() {
                    tracing::warn!("Response writer closed, dropping response");
                }
            });

            while let Some(finished) = in_flight.try_join_next() {
                if let Err(e) = finished {
                    tracing::error!(error = %e, "Request task failed");
                }
            }
        }

        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                tracing::error!(error = %e, "Request task failed");
            }
        }
        drop(tx);

        writer.await.map_err(std::io::Error::other)??;
        Ok(())
    }

    /// Handle a message, turning internal failures into a JSON-RPC error
    async fn respond(&self, message: &str) -> String {
        match self.handle_message(message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to handle message");
                let response = JsonRpcResponse::error(
                    None,
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                );
                serde_json::to_string(&response).unwrap_or_default()
            }
        }
    }

    /// Handle a single JSON-RPC message.
    ///
    /// Returns the serialized response, or an empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {}", e));
                return Ok(serde_json::to_string(&response)?);
            }
        };

        if request.jsonrpc != "2.0" {
            let response = JsonRpcResponse::error(
                request.id,
                codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            );
            return Ok(serde_json::to_string(&response)?);
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "docsign-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Tool failures are reported inside the result with `isError`, not as
    /// JSON-RPC errors.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let ctx = ToolContext {
            manager: &self.manager,
            watcher: self.watcher.as_deref(),
        };
        let tool_result = match handle_tool_call(&ctx, &params.name, params.arguments).await {
            Ok(result) => ToolResult::text(serde_json::to_string_pretty(&result)?),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool call failed");
                ToolResult::error(e.to_string())
            }
        };
        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn is_initialized(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }
}

async fn write_responses<W>(mut output: W, mut rx: mpsc::Receiver<String>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        output.write_all(response.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}

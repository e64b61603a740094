// fsgate - Wire Protocol (line-delimited JSON over stdio)
//
// One JSON request per input line, one JSON response per output line.
// Methods: tools/list, tools/call. stdout belongs to the protocol —
// all logging goes to stderr.

use crate::tools::Dispatcher;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

// Wire error codes. Interoperability contract — must match exactly.
pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Incoming request. Missing fields dispatch as an unknown method
/// rather than a parse failure.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A tool advertised in the capability list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Response payload unit — always text in this server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i64,
    pub message: String,
}

/// Wire response. Exactly one arm per response — the content/error
/// exclusivity invariant is structural, not checked at runtime.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    ToolList {
        tools: Vec<ToolDescriptor>,
    },
    Result {
        content: Vec<ContentBlock>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    Error {
        error: ErrorBody,
    },
}

impl Response {
    pub fn result(content: Vec<ContentBlock>) -> Self {
        Response::Result {
            content,
            metadata: None,
        }
    }

    pub fn result_with_metadata(content: Vec<ContentBlock>, metadata: Value) -> Self {
        Response::Result {
            content,
            metadata: Some(metadata),
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Response::Error {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

/// Dispatch one parsed request.
pub fn handle_request(dispatcher: &Dispatcher, request: &Request) -> Response {
    log::info!("received: {}", request.method);
    match request.method.as_str() {
        "tools/list" => Response::ToolList {
            tools: dispatcher.list_tools().to_vec(),
        },
        "tools/call" => {
            let name = request.params.get("name").and_then(Value::as_str).unwrap_or("");
            let args = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));
            dispatcher.call_tool(name, &args)
        }
        other => Response::error(METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    }
}

/// Serve requests from `reader`, one JSON object per line, writing one
/// JSON response per line to `writer`. Malformed JSON yields a parse
/// error response and the loop continues — a bad line never terminates
/// the server.
pub fn serve<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    dispatcher: &Dispatcher,
) -> io::Result<()> {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::warn!("read error: {}", e);
                continue;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => handle_request(dispatcher, &request),
            Err(e) => {
                log::warn!("parse error: {}", e);
                Response::error(PARSE_ERROR, "Parse error: Invalid JSON")
            }
        };

        send(&mut writer, &response)?;
    }
    Ok(())
}

/// Run the server over stdin/stdout until EOF.
pub fn run(dispatcher: &Dispatcher) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(stdin.lock(), stdout.lock(), dispatcher)
}

fn send<W: Write>(writer: &mut W, response: &Response) -> io::Result<()> {
    // Response serialization is infallible: every arm is plain data.
    let msg = serde_json::to_string(response).expect("response serialization");
    writer.write_all(msg.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

// ============================================================================
// TESTS
// ============================================================================

// fsgate - Tool Dispatcher
//
// Routes tool calls to the three filesystem handlers. Each handler
// validates its arguments, consults the path guard, performs the
// filesystem effect (or the simulated write) and returns structured
// content or a structured error. Every handler fault is caught at the
// call_tool boundary — a bad request never takes the server down.

use crate::config::ServerConfig;
use crate::confirm::{ConfirmOutcome, ConfirmationSink, WriteRequest};
use crate::guard::PathGuard;
use crate::mcp::{ContentBlock, Response, ToolDescriptor, INTERNAL_ERROR, INVALID_PARAMS};
use serde_json::{json, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Tool execution errors. Display strings are the wire messages.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Path is required")]
    PathRequired,
    #[error("Path and content are required")]
    PathAndContentRequired,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Access denied: Path '{0}' is outside safe directories")]
    AccessDenied(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Tool execution failed: {0}")]
    Internal(String),
}

impl ToolError {
    /// Wire error code for this error.
    pub fn code(&self) -> i64 {
        match self {
            ToolError::PathRequired
            | ToolError::PathAndContentRequired
            | ToolError::UnknownTool(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        }
    }
}

/// The closed set of tools this server exposes. String dispatch is
/// confined to from_name; everything downstream matches on the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ReadFile,
    ListDirectory,
    WriteFile,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::ReadFile,
        ToolKind::ListDirectory,
        ToolKind::WriteFile,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "read_file" => Some(ToolKind::ReadFile),
            "list_directory" => Some(ToolKind::ListDirectory),
            "write_file" => Some(ToolKind::WriteFile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ReadFile => "read_file",
            ToolKind::ListDirectory => "list_directory",
            ToolKind::WriteFile => "write_file",
        }
    }
}

/// Tool descriptor helper.
fn tool_def(name: &str, description: &str, properties: Value, required: Vec<&str>) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

/// The advertised capability list — fixed at startup.
fn tool_definitions() -> Vec<ToolDescriptor> {
    vec![
        tool_def(
            "read_file",
            "Read contents of a file with path validation",
            json!({
                "path": {"type": "string", "description": "Path to the file to read"}
            }),
            vec!["path"],
        ),
        tool_def(
            "list_directory",
            "List contents of a directory",
            json!({
                "path": {"type": "string", "description": "Path to the directory to list"}
            }),
            vec!["path"],
        ),
        tool_def(
            "write_file",
            "Write content to a file (requires confirmation)",
            json!({
                "path": {"type": "string", "description": "Path where to write the file"},
                "content": {"type": "string", "description": "Content to write to the file"}
            }),
            vec!["path", "content"],
        ),
    ]
}

/// Stateless tool dispatcher: fixed catalog, a path guard, and the
/// confirmation collaborator for writes. Read-only after construction.
pub struct Dispatcher {
    catalog: Vec<ToolDescriptor>,
    guard: PathGuard,
    confirm: Box<dyn ConfirmationSink>,
}

impl Dispatcher {
    /// Build a dispatcher from an explicit configuration.
    ///
    /// The catalog and the ToolKind enum are compiled-in and must agree;
    /// a mismatch is a defect in this file, caught here at startup.
    pub fn new(config: &ServerConfig, confirm: Box<dyn ConfirmationSink>) -> Self {
        let catalog = tool_definitions();
        for descriptor in &catalog {
            assert!(
                ToolKind::from_name(&descriptor.name).is_some(),
                "tool catalog names a handler that does not exist: {}",
                descriptor.name
            );
        }
        for kind in ToolKind::ALL {
            assert!(
                catalog.iter().any(|d| d.name == kind.name()),
                "handler {} missing from tool catalog",
                kind.name()
            );
        }
        Self {
            catalog,
            guard: PathGuard::new(&config.safe_roots),
            confirm,
        }
    }

    /// The fixed tool catalog. Always succeeds, idempotent.
    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.catalog
    }

    /// The path guard in effect.
    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Execute a tool by name. All handler faults are converted to error
    /// responses here; this function never panics on caller input.
    pub fn call_tool(&self, name: &str, args: &Value) -> Response {
        let kind = match ToolKind::from_name(name) {
            Some(kind) => kind,
            None => {
                let err = ToolError::UnknownTool(name.to_string());
                return Response::error(err.code(), err.to_string());
            }
        };
        log::debug!("call_tool {}", kind.name());

        let result = match kind {
            ToolKind::ReadFile => self.read_file(args),
            ToolKind::ListDirectory => self.list_directory(args),
            ToolKind::WriteFile => self.write_file(args),
        };
        result.unwrap_or_else(|err| Response::error(err.code(), err.to_string()))
    }

    /// Guard check shared by all handlers. Denials reveal only the
    /// attempted path string, never why resolution failed.
    fn check_path(&self, path: &str) -> Result<(), ToolError> {
        if self.guard.is_safe(path) {
            Ok(())
        } else {
            log::warn!("access denied: {}", path);
            Err(ToolError::AccessDenied(path.to_string()))
        }
    }

    // ====== read_file ======

    fn read_file(&self, args: &Value) -> Result<Response, ToolError> {
        let path = required_str(args, "path").ok_or(ToolError::PathRequired)?;
        self.check_path(path)?;

        match fs::read_to_string(path) {
            Ok(contents) => Ok(Response::result(vec![ContentBlock::text(format!(
                "Contents of {}:\n\n{}",
                path, contents
            ))])),
            Err(e) => Err(match e.kind() {
                ErrorKind::NotFound => ToolError::FileNotFound(path.to_string()),
                ErrorKind::PermissionDenied => ToolError::PermissionDenied(path.to_string()),
                _ => ToolError::Internal(e.to_string()),
            }),
        }
    }

    // ====== list_directory ======

    fn list_directory(&self, args: &Value) -> Result<Response, ToolError> {
        let path = required_str(args, "path").ok_or(ToolError::PathRequired)?;
        self.check_path(path)?;

        let read_dir = fs::read_dir(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolError::DirectoryNotFound(path.to_string()),
            ErrorKind::PermissionDenied => ToolError::PermissionDenied(path.to_string()),
            _ => ToolError::Internal(e.to_string()),
        })?;

        struct Entry {
            is_file: bool,
            name: String,
            size: u64,
        }

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| ToolError::Internal(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follow symlinks, as the directory listing reports targets.
            let meta = fs::metadata(entry.path()).map_err(|e| ToolError::Internal(e.to_string()))?;
            let is_file = !meta.is_dir();
            entries.push(Entry {
                is_file,
                name,
                size: if is_file { meta.len() } else { 0 },
            });
        }

        // Directories first, each group alphabetical.
        entries.sort_by(|a, b| (a.is_file, &a.name).cmp(&(b.is_file, &b.name)));

        let mut text = format!("Contents of directory {}:\n\n", path);
        for entry in &entries {
            if entry.is_file {
                text.push_str(&format!("📄 {} ({} bytes)\n", entry.name, entry.size));
            } else {
                text.push_str(&format!("📁 {}\n", entry.name));
            }
        }

        Ok(Response::result(vec![ContentBlock::text(text)]))
    }

    // ====== write_file ======

    fn write_file(&self, args: &Value) -> Result<Response, ToolError> {
        // Empty-string content is a valid write; an empty path is not.
        let path = args.get("path").and_then(Value::as_str).unwrap_or("");
        let Some(content) = args.get("content").and_then(Value::as_str) else {
            return Err(ToolError::PathAndContentRequired);
        };
        if path.is_empty() {
            return Err(ToolError::PathAndContentRequired);
        }
        self.check_path(path)?;

        match self.confirm.confirm(&WriteRequest { path, content }) {
            ConfirmOutcome::Pending => {
                let chars = content.chars().count();
                let text = format!(
                    "⚠️ File write operation requires confirmation:\n\
                     Path: {}\n\
                     Content length: {} characters\n\
                     This operation would create/overwrite a file.\n\
                     Please confirm this action through the UI.",
                    path, chars
                );
                Ok(Response::result_with_metadata(
                    vec![ContentBlock::text(text)],
                    json!({
                        "requires_confirmation": true,
                        "operation": "file_write",
                        "risk_level": "medium",
                    }),
                ))
            }
            ConfirmOutcome::Approved => self.perform_write(path, content),
        }
    }

    /// The actual write. Only reachable once a confirmation collaborator
    /// approves; the shipped sink never does.
    fn perform_write(&self, path: &str, content: &str) -> Result<Response, ToolError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| match e.kind() {
                    ErrorKind::PermissionDenied => ToolError::PermissionDenied(path.to_string()),
                    _ => ToolError::Internal(e.to_string()),
                })?;
            }
        }
        fs::write(path, content).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => ToolError::PermissionDenied(path.to_string()),
            _ => ToolError::Internal(e.to_string()),
        })?;
        Ok(Response::result(vec![ContentBlock::text(format!(
            "✅ Successfully wrote {} characters to {}",
            content.chars().count(),
            path
        ))]))
    }
}

/// Extract a required non-empty string argument.
fn required_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================

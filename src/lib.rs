// fsgate - Library Root
//
// Sandboxed filesystem tool server: path containment (guard), tool
// dispatch (tools), confirmation capability (confirm) and the
// line-delimited JSON wire protocol (mcp).

pub mod config;
pub mod confirm;
pub mod guard;
pub mod mcp;
pub mod tools;

//! MCP server: JSON-RPC 2.0 over newline-delimited stdio, exposing the
//! Telegram capability port as schema-validated tools.

pub mod jsonrpc;
pub mod registry;
pub mod schema;
pub mod server;
pub mod tools;

pub use registry::ToolRegistry;
pub use server::McpServer;

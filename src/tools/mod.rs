//! Tool handlers for the adapter MCP servers

pub mod camunda;
pub mod cdd;
pub mod ocr;

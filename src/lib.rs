pub mod camunda;
pub mod cdd;
pub mod config;
pub mod error;
pub mod ocr;
pub mod schemas;
pub mod server;
pub mod tools;

use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber on stderr; stdout belongs to the stdio transport.
///
/// Honors MCP_NO_LOG and falls back to the default filter when RUST_LOG is
/// unparsable.
pub fn init_tracing(runtime: &config::RuntimeConfig) {
    if runtime.mcp_no_log {
        return;
    }
    let filter = EnvFilter::try_new(&runtime.log_level)
        .unwrap_or_else(|_| EnvFilter::new("mcp_adapters=info,rmcp=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

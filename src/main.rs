mod http;

use anyhow::Result;
use clap::Parser;
use mcp_adapters::config::{Config, ServiceKind};
use mcp_adapters::server::{CamundaServer, CddServer, OcrServer};
use rmcp::{ServiceExt, handler::server::ServerHandler, transport::stdio};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "MCP tool servers for CDD, Camunda BPM and invoice OCR", long_about = None)]
struct Args {
    /// Adapter to serve
    #[arg(long, value_enum)]
    service: ServiceKind,

    /// Transport: stdio or http (overrides ADAPTER_TRANSPORT)
    #[arg(long)]
    transport: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(transport) = args.transport {
        config.runtime.transport = transport;
    }

    mcp_adapters::init_tracing(&config.runtime);
    info!(
        "Starting {} MCP server ({} transport)",
        args.service.as_str(),
        config.runtime.transport
    );

    match args.service {
        ServiceKind::Cdd => serve(CddServer::new(), &config, args.service, None).await,
        ServiceKind::Camunda => {
            let server = CamundaServer::new(&config)?;
            let upstream = server.client.base_url().to_string();
            serve(server, &config, args.service, Some(upstream)).await
        }
        ServiceKind::Ocr => {
            let server = OcrServer::new(&config)?;
            let upstream = server.client.endpoint().to_string();
            serve(server, &config, args.service, Some(upstream)).await
        }
    }
}

async fn serve<S>(
    server: S,
    config: &Config,
    service: ServiceKind,
    upstream: Option<String>,
) -> Result<()>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    match config.runtime.transport.as_str() {
        "http" => http::start_http_server(server, config, service, upstream).await,
        "stdio" => {
            let running = server.serve(stdio()).await?;
            info!("MCP server ready on stdio");
            running.waiting().await?;
            Ok(())
        }
        other => anyhow::bail!("Unknown transport '{}' (expected stdio or http)", other),
    }
}

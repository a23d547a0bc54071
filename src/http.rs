//! HTTP transport for the adapter MCP servers
//!
//! Implements Axum-based MCP over Streamable HTTP with optional bearer
//! authentication. Health, info, and metrics are plain JSON.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use mcp_adapters::config::{Config, ServiceKind};
use rmcp::handler::server::ServerHandler;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager,
    tower::{StreamableHttpServerConfig, StreamableHttpService},
};
use serde_json::json;
use std::{cmp::Ordering, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub info: Arc<serde_json::Value>,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: unix_now(),
            errors_total: 0,
            latencies: Vec::with_capacity(256),
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn json_response(status: StatusCode, body: serde_json::Value) -> axum::response::Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    json_response(StatusCode::OK, state.info.as_ref().clone())
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx.min(sorted.len() - 1)).copied();
        (Some(avg), p95)
    };

    json_response(
        StatusCode::OK,
        json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms
        }),
    )
}

/// Start the HTTP server for `server`, serving MCP at the configured path
pub async fn start_http_server<S>(
    server: S,
    config: &Config,
    service: ServiceKind,
    upstream: Option<String>,
) -> anyhow::Result<()>
where
    S: ServerHandler + Clone + Send + Sync + 'static,
{
    let runtime = &config.runtime;
    let bind = runtime.http_bind_for(service);
    let path = runtime.http_path.clone();

    let state = HttpState {
        info: Arc::new(json!({
            "service": service.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
            "upstream": upstream,
            "server": {
                "transport": "http",
                "bind": bind.to_string(),
                "path": path
            }
        })),
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    };

    // Build MCP streamable HTTP service mounted at configured path
    let session_mgr = Arc::new(LocalSessionManager::default());
    let keepalive = Duration::from_secs(runtime.http_sse_keepalive_sec);
    let mcp_service: StreamableHttpService<S, _> = StreamableHttpService::new(
        move || Ok(server.clone()),
        session_mgr,
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(keepalive),
            ..Default::default()
        },
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("mcp-session-id")]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/metrics", get(metrics_handler))
        .nest_service(path.as_str(), mcp_service)
        .layer(middleware::from_fn_with_state(
            (state.metrics.clone(), path.clone()),
            |State((metrics, base)): State<(Arc<Mutex<HttpMetrics>>, String)>,
             req: axum::http::Request<Body>,
             next: axum::middleware::Next| async move {
                let is_mcp = req.uri().path().starts_with(&base);
                let start = is_mcp.then(std::time::Instant::now);
                let resp = next.run(req).await;
                if let Some(start_time) = start {
                    let latency_ms = start_time.elapsed().as_millis() as f64;
                    let mut m = metrics.lock().await;
                    if latency_ms > 0.0 {
                        m.latencies.push(latency_ms);
                        if m.latencies.len() > 256 {
                            m.latencies.remove(0);
                        }
                    }
                    if !resp.status().is_success() {
                        m.errors_total = m.errors_total.saturating_add(1);
                    }
                    m.total_requests = m.total_requests.saturating_add(1);
                    m.last_request_unix = unix_now();
                }
                resp
            },
        ))
        // Bearer auth, enforced only when a token is configured
        .layer(middleware::from_fn_with_state(
            runtime.bearer_token.clone(),
            |State(token): State<Option<String>>,
             req: axum::http::Request<Body>,
             next: axum::middleware::Next| async move {
                let Some(expected) = token else {
                    return next.run(req).await;
                };
                if req.uri().path() == "/health" || req.method() == axum::http::Method::OPTIONS {
                    return next.run(req).await;
                }
                let headers: &HeaderMap = req.headers();
                let header_ok = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .is_some_and(|v| v == format!("Bearer {}", expected));
                if !header_ok {
                    return json_response(
                        StatusCode::UNAUTHORIZED,
                        json!({"error": {"code": 401, "message": "Unauthorized"}}),
                    );
                }
                next.run(req).await
            },
        ))
        // CORS outermost so preflight and 401s carry the headers
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener on {}: {}", bind, e))?;

    tracing::info!(
        "Starting {} HTTP server on {} (MCP at {})",
        service.as_str(),
        bind,
        path
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

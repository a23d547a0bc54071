use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Which adapter a process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Simulated customer due diligence tools
    Cdd,
    /// Camunda BPM workflow engine tools
    Camunda,
    /// Invoice OCR tools
    Ocr,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Cdd => "cdd",
            ServiceKind::Camunda => "camunda",
            ServiceKind::Ocr => "ocr",
        }
    }

    /// Bind address used by the HTTP transport when none is configured
    pub fn default_http_bind(&self) -> SocketAddr {
        let port = match self {
            ServiceKind::Cdd => 3000,
            ServiceKind::Camunda | ServiceKind::Ocr => 8000,
        };
        SocketAddr::from(([0, 0, 0, 0], port))
    }
}

/// Main configuration structure loaded from mcp_adapters.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub camunda: CamundaConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub cdd: CddConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Connection settings for the Camunda engine REST API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CamundaConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub timeout_ms: u64,
}

impl Default for CamundaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/engine-rest".to_string(),
            user: "demo".to_string(),
            password: "demo".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Tencent Cloud OCR settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: String,
    /// Overrides `https://{endpoint}`; used to point at a local stand-in
    pub base_url: Option<String>,
    pub region: String,
    #[serde(skip_serializing)]
    pub secret_id: Option<String>,
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "ocr.tencentcloudapi.com".to_string(),
            base_url: None,
            region: String::new(),
            secret_id: None,
            secret_key: None,
            timeout_ms: 30_000,
        }
    }
}

impl OcrConfig {
    pub fn url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.endpoint))
    }
}

/// Simulated CDD service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CddConfig {
    /// Depth limit when following next_steps chains
    pub max_chain_depth: usize,
}

impl Default for CddConfig {
    fn default() -> Self {
        Self { max_chain_depth: 4 }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mcp_no_log: bool,
    pub log_level: String,
    // HTTP transport configuration
    pub transport: String,
    /// Falls back to the per-service default when unset
    pub http_bind: Option<SocketAddr>,
    pub http_path: String,
    pub bearer_token: Option<String>,
    pub http_sse_keepalive_sec: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mcp_no_log: false,
            log_level: "mcp_adapters=info,rmcp=info".to_string(),
            transport: "stdio".to_string(),
            http_bind: None,
            http_path: "/mcp".to_string(),
            bearer_token: None,
            http_sse_keepalive_sec: 15,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self::default();

        cfg.mcp_no_log = std::env::var("MCP_NO_LOG")
            .ok()
            .is_some_and(|v| v == "true" || v == "1");
        if let Ok(level) = std::env::var("RUST_LOG") {
            cfg.log_level = level;
        }

        if let Ok(transport) = std::env::var("ADAPTER_TRANSPORT") {
            cfg.transport = transport;
        }
        if let Ok(v) = std::env::var("ADAPTER_HTTP_BIND") {
            match v.parse::<SocketAddr>() {
                Ok(bind) => cfg.http_bind = Some(bind),
                Err(_) => tracing::warn!("Ignoring unparsable ADAPTER_HTTP_BIND '{}'", v),
            }
        }
        if let Ok(path) = std::env::var("ADAPTER_HTTP_PATH") {
            cfg.http_path = path;
        }
        cfg.bearer_token = std::env::var("ADAPTER_BEARER_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        if let Some(sse) = std::env::var("ADAPTER_HTTP_SSE_KEEPALIVE_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.http_sse_keepalive_sec = sse;
        }

        cfg
    }

    pub fn http_bind_for(&self, service: ServiceKind) -> SocketAddr {
        self.http_bind
            .unwrap_or_else(|| service.default_http_bind())
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses ADAPTER_CONFIG environment variable or defaults to "mcp_adapters.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("ADAPTER_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path = std::env::var("ADAPTER_CONFIG")
            .unwrap_or_else(|_| "mcp_adapters.toml".to_string());

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(_) => {
                tracing::debug!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply upstream connection overrides (env-first)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CAMUNDA_URL") {
            self.camunda.url = url;
            tracing::debug!("CAMUNDA_URL env override applied");
        }
        if let Ok(user) = std::env::var("CAMUNDA_USER") {
            self.camunda.user = user;
        }
        if let Ok(pass) = std::env::var("CAMUNDA_PASSWORD") {
            self.camunda.password = pass;
        }
        if let Ok(id) = std::env::var("TENCENTCLOUD_SECRET_ID") {
            self.ocr.secret_id = Some(id);
        }
        if let Ok(key) = std::env::var("TENCENTCLOUD_SECRET_KEY") {
            self.ocr.secret_key = Some(key);
        }
        if let Ok(region) = std::env::var("TENCENTCLOUD_REGION") {
            self.ocr.region = region;
        }
    }

    pub fn validate(&mut self) -> anyhow::Result<()> {
        if !self.camunda.url.starts_with("http://") && !self.camunda.url.starts_with("https://")
        {
            anyhow::bail!(
                "Camunda URL '{}' must start with http:// or https://",
                self.camunda.url
            );
        }
        self.camunda.url = self.camunda.url.trim_end_matches('/').to_string();

        if self.cdd.max_chain_depth == 0 {
            tracing::warn!("cdd.max_chain_depth of 0 disables chain following");
        } else if self.cdd.max_chain_depth > 16 {
            tracing::warn!(
                "cdd.max_chain_depth {} exceeds max 16, clamping to 16",
                self.cdd.max_chain_depth
            );
            self.cdd.max_chain_depth = 16;
        }
        Ok(())
    }
}

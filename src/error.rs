//! Domain-specific error types for mcp-adapters

use serde_json::json;
use thiserror::Error;

/// Main error type shared by the adapter services
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream API error {code}: {message}")]
    UpstreamApi { code: String, message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("MCP protocol error: {message}")]
    Mcp { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },
}

impl From<anyhow::Error> for AdapterError {
    fn from(err: anyhow::Error) -> Self {
        AdapterError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::Io {
            message: err.to_string(),
        }
    }
}

impl From<rmcp::ErrorData> for AdapterError {
    fn from(err: rmcp::ErrorData) -> Self {
        AdapterError::Mcp {
            message: err.message.to_string(),
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return AdapterError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        AdapterError::Http {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Convert AdapterError to MCP error
impl From<AdapterError> for rmcp::ErrorData {
    fn from(err: AdapterError) -> Self {
        let (code, label, details) = match err {
            AdapterError::Config { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Configuration error",
                json!(message),
            ),
            AdapterError::Upstream { status, message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Upstream error",
                json!({ "status": status, "body": message }),
            ),
            AdapterError::UpstreamApi { code, message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Upstream API error",
                json!({ "code": code, "message": message }),
            ),
            AdapterError::Http { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "HTTP error",
                json!(message),
            ),
            AdapterError::Io { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "I/O error",
                json!(message),
            ),
            AdapterError::Mcp { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "MCP protocol error",
                json!(message),
            ),
            AdapterError::Serialization { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Serialization error",
                json!(message),
            ),
            AdapterError::Timeout {
                operation,
                timeout_ms,
            } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Operation timeout",
                json!(format!("{operation} timed out after {timeout_ms}ms")),
            ),
            AdapterError::Internal { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Internal error",
                json!(message),
            ),
            AdapterError::InvalidParams { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Invalid parameters",
                json!(message),
            ),
        };

        let summary = match &details {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        rmcp::ErrorData {
            code,
            message: format!("{label}: {summary}").into(),
            data: Some(json!({ "details": details })),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_params_map_to_invalid_params_code() {
        let err: rmcp::ErrorData = AdapterError::InvalidParams {
            message: "customer_id is required".into(),
        }
        .into();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("customer_id is required"));
    }

    #[test]
    fn upstream_error_keeps_status_in_data() {
        let err: rmcp::ErrorData = AdapterError::Upstream {
            status: 404,
            message: "not found".into(),
        }
        .into();
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        let data = err.data.unwrap();
        assert_eq!(data["details"]["status"], 404);
        assert_eq!(data["details"]["body"], "not found");
    }
}

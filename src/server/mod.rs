//! MCP server types for the three adapter services

use crate::camunda::CamundaClient;
use crate::cdd::CddTools;
use crate::config::Config;
use crate::error::{AdapterError, Result};
use crate::ocr::OcrClient;
use rmcp::model::{CallToolRequestParam, CallToolResult, Implementation, Tool};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;

// Submodules
pub mod router;

/// Simulated customer due diligence server
#[derive(Clone, Default)]
pub struct CddServer {
    pub tools: CddTools,
}

impl CddServer {
    pub fn new() -> Self {
        Self {
            tools: CddTools::new(),
        }
    }
}

/// Camunda BPM pass-through server
#[derive(Clone)]
pub struct CamundaServer {
    pub client: Arc<CamundaClient>,
}

impl CamundaServer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Arc::new(CamundaClient::new(&config.camunda)?),
        })
    }
}

/// Invoice OCR pass-through server
#[derive(Clone)]
pub struct OcrServer {
    pub client: Arc<OcrClient>,
}

impl OcrServer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Arc::new(OcrClient::new(&config.ocr)?),
        })
    }
}

pub(crate) fn implementation(name: &str, title: &str) -> Implementation {
    Implementation {
        name: name.to_string(),
        title: Some(title.to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        website_url: None,
        icons: None,
    }
}

pub(crate) fn tool(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    input_schema: Arc<Map<String, Value>>,
) -> Tool {
    Tool {
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        input_schema,
        icons: None,
        annotations: None,
        output_schema: None,
        meta: None,
    }
}

/// Deserialize tool arguments; absent arguments behave like `{}`
pub fn parse_args<T: DeserializeOwned>(request: &CallToolRequestParam) -> Result<T> {
    let args = request.arguments.clone().unwrap_or_default();
    serde_json::from_value(Value::Object(args)).map_err(|e| AdapterError::InvalidParams {
        message: format!("Invalid parameters for {}: {}", request.name, e),
    })
}

/// Structured tool result; non-object values are wrapped as `{"result": ...}`
pub fn structured(value: Value) -> CallToolResult {
    match value {
        Value::Object(_) => CallToolResult::structured(value),
        other => CallToolResult::structured(json!({ "result": other })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Needs {
        #[allow(dead_code)]
        customer_id: String,
    }

    #[test]
    fn missing_arguments_are_invalid_params() {
        let request = CallToolRequestParam {
            name: "get_risk_score".into(),
            arguments: None,
        };
        let err = parse_args::<Needs>(&request).unwrap_err();
        match err {
            AdapterError::InvalidParams { message } => {
                assert!(message.contains("customer_id"), "{message}");
                assert!(message.contains("get_risk_score"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_object_results_are_wrapped() {
        let result = structured(json!([1, 2]));
        assert_eq!(result.structured_content, Some(json!({"result": [1, 2]})));

        let result = structured(json!({"id": "x"}));
        assert_eq!(result.structured_content, Some(json!({"id": "x"})));
    }
}

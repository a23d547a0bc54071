//! Invoice recognition through the Tencent Cloud OCR API

pub mod signing;

use crate::config::OcrConfig;
use crate::error::{AdapterError, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

const SERVICE: &str = "ocr";
const API_VERSION: &str = "2018-11-19";
const INVOICE_ACTION: &str = "RecognizeGeneralInvoice";

fn default_enable_pdf() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceOcrParams {
    pub image_url: String,
    #[serde(default = "default_enable_pdf")]
    pub enable_pdf: bool,
}

#[derive(Clone, Debug)]
pub struct OcrClient {
    url: Url,
    host: String,
    region: String,
    secret_id: Option<String>,
    secret_key: Option<String>,
    timeout_ms: u64,
    client: Client,
}

impl OcrClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let raw = config.url();
        let url = Url::parse(&raw).map_err(|e| AdapterError::Config {
            message: format!("Invalid OCR endpoint '{}': {}", raw, e),
        })?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(AdapterError::Config {
                    message: format!("OCR endpoint '{}' has no host", raw),
                });
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AdapterError::Config {
                message: format!("Failed to build OCR HTTP client: {}", e),
            })?;

        if config.secret_id.is_none() || config.secret_key.is_none() {
            warn!("TENCENTCLOUD_SECRET_ID/TENCENTCLOUD_SECRET_KEY not set; invoice_ocr will fail");
        }

        Ok(Self {
            url,
            host,
            region: config.region.clone(),
            secret_id: config.secret_id.clone(),
            secret_key: config.secret_key.clone(),
            timeout_ms: config.timeout_ms,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.secret_id.as_deref(), self.secret_key.as_deref()) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Ok((id, key)),
            _ => Err(AdapterError::Config {
                message: "TENCENTCLOUD_SECRET_ID and TENCENTCLOUD_SECRET_KEY must be set".into(),
            }),
        }
    }

    /// Recognize a general invoice from an image or PDF URL
    pub async fn recognize_general_invoice(&self, params: &InvoiceOcrParams) -> Result<Value> {
        let payload = json!({
            "ImageUrl": params.image_url,
            "EnablePdf": params.enable_pdf,
        })
        .to_string();
        self.call(INVOICE_ACTION, payload).await
    }

    /// Signed POST of `payload` for `action`; returns the `Response` object
    pub async fn call(&self, action: &str, payload: String) -> Result<Value> {
        let (secret_id, secret_key) = self.credentials()?;
        let timestamp = chrono::Utc::now().timestamp();
        let authorization = signing::authorization(&signing::SigningInput {
            secret_id,
            secret_key,
            service: SERVICE,
            host: &self.host,
            action,
            payload: &payload,
            timestamp,
        });

        debug!(action, "tencent cloud request");
        let mut builder = self
            .client
            .post(self.url.clone())
            .header("Authorization", authorization)
            .header("Content-Type", signing::CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Timestamp", timestamp.to_string());
        if !self.region.is_empty() {
            builder = builder.header("X-TC-Region", &self.region);
        }

        let resp = builder.body(payload).send().await.map_err(|e| {
            if e.is_timeout() {
                AdapterError::Timeout {
                    operation: format!("ocr {}", action),
                    timeout_ms: self.timeout_ms,
                }
            } else {
                e.into()
            }
        })?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }
        let body: Value = serde_json::from_str(&text)?;
        unwrap_response(body)
    }
}

/// Extract `Response`, turning an embedded `Response.Error` into an error
pub fn unwrap_response(body: Value) -> Result<Value> {
    let Some(response) = body.get("Response") else {
        return Err(AdapterError::Serialization {
            message: "missing Response envelope".into(),
        });
    };
    if let Some(err) = response.get("Error") {
        let field = |k: &str| {
            err.get(k)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        return Err(AdapterError::UpstreamApi {
            code: field("Code"),
            message: field("Message"),
        });
    }
    Ok(response.clone())
}

//! invoice_ocr tests against a local stand-in for the Tencent Cloud endpoint

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use mcp_adapters::config::Config;
use mcp_adapters::error::AdapterError;
use mcp_adapters::ocr::signing::{self, SigningInput};
use mcp_adapters::server::OcrServer;
use rmcp::model::CallToolRequestParam;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    headers: HeaderMap,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn tencent(State(log): State<Log>, headers: HeaderMap, body: String) -> impl IntoResponse {
    let payload: Value = serde_json::from_str(&body).unwrap_or_default();
    log.lock().unwrap().push(Recorded {
        headers,
        body: body.clone(),
    });

    let response = if payload["ImageUrl"].as_str().is_some_and(|u| u.contains("broken")) {
        json!({"Response": {
            "Error": {"Code": "FailedOperation.DownLoadError", "Message": "download failed"},
            "RequestId": "req-err"
        }})
    } else {
        json!({"Response": {
            "RequestId": "req-1",
            "MixedInvoiceItems": [{"Type": 3, "Code": "OK"}]
        }})
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        response.to_string(),
    )
}

async fn spawn_endpoint(region: &str) -> (OcrServer, Log, String) {
    let log: Log = Arc::default();
    let app = Router::new().fallback(tencent).with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = Config::default();
    config.ocr.base_url = Some(format!("http://{addr}"));
    config.ocr.region = region.to_string();
    config.ocr.secret_id = Some("AKIDTEST".into());
    config.ocr.secret_key = Some("test-secret".into());
    (OcrServer::new(&config).unwrap(), log, addr.to_string())
}

fn invoice_request(args: Value) -> CallToolRequestParam {
    CallToolRequestParam {
        name: "invoice_ocr".into(),
        arguments: args.as_object().cloned(),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_invoice_ocr_sends_signed_request() {
    let (server, log, host) = spawn_endpoint("ap-guangzhou").await;
    let result = server
        .handle_invoice_ocr(invoice_request(
            json!({"image_url": "https://files.example.com/invoice.pdf"}),
        ))
        .await
        .unwrap();

    let content = result.structured_content.unwrap();
    assert_eq!(content["RequestId"], "req-1");
    assert_eq!(content["MixedInvoiceItems"][0]["Code"], "OK");

    let recorded = log.lock().unwrap().last().cloned().unwrap();
    let headers = &recorded.headers;
    assert_eq!(header_value(headers, "x-tc-action"), "RecognizeGeneralInvoice");
    assert_eq!(header_value(headers, "x-tc-version"), "2018-11-19");
    assert_eq!(header_value(headers, "x-tc-region"), "ap-guangzhou");
    assert_eq!(header_value(headers, "content-type"), signing::CONTENT_TYPE);

    let body: Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(
        body,
        json!({"ImageUrl": "https://files.example.com/invoice.pdf", "EnablePdf": true})
    );

    // The signature must verify against what actually arrived
    let timestamp: i64 = header_value(headers, "x-tc-timestamp").parse().unwrap();
    let expected = signing::authorization(&SigningInput {
        secret_id: "AKIDTEST",
        secret_key: "test-secret",
        service: "ocr",
        host: &host,
        action: "RecognizeGeneralInvoice",
        payload: &recorded.body,
        timestamp,
    });
    assert_eq!(header_value(headers, "authorization"), expected);
    assert_eq!(header_value(headers, "host"), host);
}

#[tokio::test]
async fn test_invoice_ocr_region_header_optional() {
    let (server, log, _host) = spawn_endpoint("").await;
    server
        .handle_invoice_ocr(invoice_request(
            json!({"image_url": "https://files.example.com/a.png", "enable_pdf": false}),
        ))
        .await
        .unwrap();

    let recorded = log.lock().unwrap().last().cloned().unwrap();
    assert!(recorded.headers.get("x-tc-region").is_none());
    let body: Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(body["EnablePdf"], false);
}

#[tokio::test]
async fn test_invoice_ocr_api_error() {
    let (server, _log, _host) = spawn_endpoint("ap-guangzhou").await;
    let err = server
        .handle_invoice_ocr(invoice_request(
            json!({"image_url": "https://files.example.com/broken.png"}),
        ))
        .await
        .unwrap_err();
    match err {
        AdapterError::UpstreamApi { code, message } => {
            assert_eq!(code, "FailedOperation.DownLoadError");
            assert_eq!(message, "download failed");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_invoice_ocr_requires_credentials() {
    let (server, log, _host) = spawn_endpoint("ap-guangzhou").await;
    let mut config = Config::default();
    config.ocr.base_url = Some(server.client.endpoint().to_string());
    let unsigned = OcrServer::new(&config).unwrap();

    let err = unsigned
        .handle_invoice_ocr(invoice_request(json!({"image_url": "https://x/y.png"})))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Config { .. }), "{err:?}");
    assert!(log.lock().unwrap().is_empty());
}

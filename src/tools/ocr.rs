//! invoice_ocr tool handler

use crate::error::Result;
use crate::ocr::InvoiceOcrParams;
use crate::server::{OcrServer, parse_args, structured};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use tracing::info;

impl OcrServer {
    /// Handle the invoice_ocr tool call
    pub async fn handle_invoice_ocr(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let params: InvoiceOcrParams = parse_args(&request)?;
        info!(image_url = %params.image_url, enable_pdf = params.enable_pdf, "invoice_ocr called");
        let response = self.client.recognize_general_invoice(&params).await?;
        Ok(structured(response))
    }
}

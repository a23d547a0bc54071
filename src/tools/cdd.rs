//! CDD tool handlers

use crate::cdd::ToolKind;
use crate::error::Result;
use crate::server::{CddServer, parse_args, structured};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde::Deserialize;
use tracing::info;

/// Parameters shared by every CDD tool; unknown extra fields are ignored
#[derive(Debug, Deserialize)]
pub struct CustomerParams {
    pub customer_id: String,
}

impl CddServer {
    /// Handle get_customer_profile, get_risk_score, explain_risk and
    /// generate_compliance_report
    pub fn handle_cdd_tool(
        &self,
        kind: ToolKind,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: CustomerParams = parse_args(&request)?;
        info!(tool = kind.tool_name(), customer_id = %params.customer_id, "cdd tool called");
        let result = self.tools.run(kind, &params.customer_id);
        Ok(structured(serde_json::to_value(result)?))
    }
}

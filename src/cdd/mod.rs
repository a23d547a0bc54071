//! Simulated customer due diligence (CDD) service.
//!
//! Every tool derives a [`Scenario`] from the customer id, synthesizes a canned
//! result for that scenario and attaches `next_steps` that a client can follow
//! to chain further tool calls. Nothing here performs I/O or keeps state.

use serde::{Deserialize, Serialize};

pub mod chain;
pub mod facade;
pub mod next_step;
pub mod synthesis;

pub use chain::{ChainEvent, ChainWalker, ToolInvoker};
pub use facade::CddTools;
pub use next_step::{NextStep, ToolCall, build_next_step, follow_up_calls};
pub use synthesis::{
    CddResult, ComplianceReport, CustomerProfile, RiskExplanation, RiskScore, synthesize,
};

/// Response scenario selected from a customer id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Positive,
    Negative,
}

/// Infer the scenario from substrings of the customer id (case-insensitive).
///
/// `neg`/`negative` wins over `pos`/`positive`; anything else, including an
/// empty id, is positive.
pub fn classify(customer_id: &str) -> Scenario {
    let s = customer_id.to_lowercase();
    let negative = s.contains("neg") || s.contains("negative");
    let positive = s.contains("pos") || s.contains("positive");
    match (negative, positive) {
        (true, _) => Scenario::Negative,
        (false, true) => Scenario::Positive,
        (false, false) => Scenario::Positive,
    }
}

/// The four CDD tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Profile,
    Score,
    Explain,
    Report,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Profile,
        ToolKind::Score,
        ToolKind::Explain,
        ToolKind::Report,
    ];

    /// MCP tool name
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolKind::Profile => "get_customer_profile",
            ToolKind::Score => "get_risk_score",
            ToolKind::Explain => "explain_risk",
            ToolKind::Report => "generate_compliance_report",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tool_name() == name)
    }
}

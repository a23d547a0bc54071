//! Next-step descriptors attached to CDD results

use super::{Scenario, ToolKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A suggested follow-up: either an action for a human operator or a tool
/// call a client may issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextStep {
    Call(ToolCall),
    Action(String),
}

impl NextStep {
    pub fn action(text: impl Into<String>) -> Self {
        NextStep::Action(text.into())
    }

    pub fn as_call(&self) -> Option<&ToolCall> {
        match self {
            NextStep::Call(call) => Some(call),
            NextStep::Action(_) => None,
        }
    }
}

/// Structured follow-up tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ToolCall {
    pub fn for_customer(kind: ToolKind, customer_id: &str) -> Self {
        let mut params = Map::new();
        params.insert("customer_id".into(), Value::String(customer_id.to_string()));
        Self {
            tool: kind.tool_name().to_string(),
            params,
        }
    }
}

/// The tool that naturally follows `kind`; `None` once the report is generated.
///
/// The chain is the same for both scenarios.
pub fn build_next_step(kind: ToolKind, customer_id: &str, _scenario: Scenario) -> Option<NextStep> {
    let next = match kind {
        ToolKind::Profile => ToolKind::Score,
        ToolKind::Score => ToolKind::Explain,
        ToolKind::Explain => ToolKind::Report,
        ToolKind::Report => return None,
    };
    Some(NextStep::Call(ToolCall::for_customer(next, customer_id)))
}

/// Structured calls appended to a result's `next_steps`: the chained tool,
/// then a shortcut straight to the compliance report.
pub fn follow_up_calls(kind: ToolKind, customer_id: &str, scenario: Scenario) -> Vec<NextStep> {
    let Some(primary) = build_next_step(kind, customer_id, scenario) else {
        return Vec::new();
    };
    let reaches_report = primary
        .as_call()
        .is_some_and(|c| c.tool == ToolKind::Report.tool_name());

    let mut calls = vec![primary];
    if !reaches_report {
        calls.push(NextStep::Call(ToolCall::for_customer(
            ToolKind::Report,
            customer_id,
        )));
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_suggests_risk_score() {
        let step = build_next_step(ToolKind::Profile, "CUST-1-POS", Scenario::Positive).unwrap();
        let call = step.as_call().unwrap();
        assert_eq!(call.tool, "get_risk_score");
        assert_eq!(call.params.get("customer_id"), Some(&json!("CUST-1-POS")));
        assert_eq!(call.params.len(), 1);
    }

    #[test]
    fn chain_order_is_fixed() {
        let mut kind = ToolKind::Profile;
        let mut visited = vec![kind.tool_name().to_string()];
        while let Some(step) = build_next_step(kind, "CUST-2", Scenario::Negative) {
            let tool = step.as_call().unwrap().tool.clone();
            kind = ToolKind::from_tool_name(&tool).unwrap();
            visited.push(tool);
        }
        assert_eq!(
            visited,
            [
                "get_customer_profile",
                "get_risk_score",
                "explain_risk",
                "generate_compliance_report"
            ]
        );
    }

    #[test]
    fn report_is_terminal() {
        for scenario in [Scenario::Positive, Scenario::Negative] {
            assert!(build_next_step(ToolKind::Report, "CUST-3", scenario).is_none());
            assert!(follow_up_calls(ToolKind::Report, "CUST-3", scenario).is_empty());
        }
    }

    #[test]
    fn follow_up_calls_add_report_shortcut_once() {
        let tools = |kind| {
            follow_up_calls(kind, "C", Scenario::Positive)
                .iter()
                .map(|s| s.as_call().unwrap().tool.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            tools(ToolKind::Profile),
            ["get_risk_score", "generate_compliance_report"]
        );
        assert_eq!(
            tools(ToolKind::Score),
            ["explain_risk", "generate_compliance_report"]
        );
        assert_eq!(tools(ToolKind::Explain), ["generate_compliance_report"]);
    }

    #[test]
    fn next_steps_serialize_untagged() {
        let steps = vec![
            NextStep::action("Escalate to AML officer"),
            build_next_step(ToolKind::Score, "CUST-9", Scenario::Negative).unwrap(),
        ];
        assert_eq!(
            serde_json::to_value(&steps).unwrap(),
            json!([
                "Escalate to AML officer",
                {"tool": "explain_risk", "params": {"customer_id": "CUST-9"}}
            ])
        );
    }

    #[test]
    fn call_without_params_deserializes() {
        let step: NextStep = serde_json::from_value(json!({"tool": "explain_risk"})).unwrap();
        let call = step.as_call().unwrap();
        assert_eq!(call.tool, "explain_risk");
        assert!(call.params.is_empty());
    }
}

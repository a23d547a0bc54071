use super::{CddResult, ToolKind, classify, follow_up_calls, synthesize};
use serde_json::{Map, Value};
use tracing::debug;

/// Entry points of the simulated CDD service
#[derive(Debug, Clone, Copy, Default)]
pub struct CddTools;

impl CddTools {
    pub fn new() -> Self {
        Self
    }

    /// Classify, synthesize, then attach the follow-up calls
    pub fn run(&self, kind: ToolKind, customer_id: &str) -> CddResult {
        let scenario = classify(customer_id);
        debug!(
            tool = kind.tool_name(),
            customer_id,
            ?scenario,
            "synthesizing CDD result"
        );
        let mut result = synthesize(kind, customer_id, scenario);
        result
            .next_steps_mut()
            .extend(follow_up_calls(kind, customer_id, scenario));
        result
    }

    pub fn get_customer_profile(&self, customer_id: &str) -> CddResult {
        self.run(ToolKind::Profile, customer_id)
    }

    pub fn get_risk_score(&self, customer_id: &str) -> CddResult {
        self.run(ToolKind::Score, customer_id)
    }

    pub fn explain_risk(&self, customer_id: &str) -> CddResult {
        self.run(ToolKind::Explain, customer_id)
    }

    pub fn generate_compliance_report(&self, customer_id: &str) -> CddResult {
        self.run(ToolKind::Report, customer_id)
    }

    /// Dispatch by tool name. `None` for an unknown tool or a missing or
    /// non-string `customer_id`; other parameters are ignored.
    pub fn call(&self, tool: &str, params: &Map<String, Value>) -> Option<CddResult> {
        let kind = ToolKind::from_tool_name(tool)?;
        let customer_id = params.get("customer_id")?.as_str()?;
        Some(self.run(kind, customer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdd::NextStep;
    use serde_json::json;

    fn params(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn negative_profile_lists_actions_then_calls() {
        let result = CddTools::new().get_customer_profile("CUST-1-NEG");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value["next_steps"],
            json!([
                "Collect additional KYC",
                "Enhanced monitoring",
                "Escalate to AML officer",
                {"tool": "get_risk_score", "params": {"customer_id": "CUST-1-NEG"}},
                {"tool": "generate_compliance_report", "params": {"customer_id": "CUST-1-NEG"}}
            ])
        );
        assert_eq!(value["risk_profile"], "high");
    }

    #[test]
    fn explanation_points_at_report() {
        let result = CddTools::new().explain_risk("CUST-7");
        let calls: Vec<_> = result
            .next_steps()
            .iter()
            .filter_map(NextStep::as_call)
            .map(|c| c.tool.as_str())
            .collect();
        assert_eq!(calls, ["generate_compliance_report"]);
    }

    #[test]
    fn report_has_no_calls() {
        let result = CddTools::new().generate_compliance_report("CUST-7-POS");
        assert!(result.next_steps().iter().all(|s| s.as_call().is_none()));
        assert_eq!(result.next_steps().len(), 2);
    }

    #[test]
    fn call_dispatches_by_name_and_ignores_extra_params() {
        let tools = CddTools::new();
        let result = tools
            .call(
                "get_risk_score",
                &params(json!({"customer_id": "C-NEG", "verbose": true})),
            )
            .unwrap();
        assert_eq!(result.kind(), ToolKind::Score);
        assert_eq!(result.customer_id(), "C-NEG");
    }

    #[test]
    fn call_signals_empty_result() {
        let tools = CddTools::new();
        assert!(tools.call("get_profile", &params(json!({"customer_id": "C"}))).is_none());
        assert!(tools.call("get_risk_score", &params(json!({}))).is_none());
        assert!(tools.call("get_risk_score", &params(json!({"customer_id": 7}))).is_none());
    }
}

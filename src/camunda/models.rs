//! Tool parameters for the Camunda adapter

use serde::Deserialize;
use serde_json::{Map, Value, json};

fn default_true() -> bool {
    true
}

fn default_max_results() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListProcessDefinitionsParams {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub latest_version: bool,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionIdParams {
    pub definition_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartProcessInstanceParams {
    pub key: String,
    #[serde(default)]
    pub business_key: Option<String>,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListProcessInstancesParams {
    #[serde(default)]
    pub process_definition_key: Option<String>,
    #[serde(default)]
    pub business_key: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceIdParams {
    pub instance_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProcessInstanceParams {
    pub instance_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTasksParams {
    #[serde(default)]
    pub process_instance_id: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub candidate_user: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskIdParams {
    pub task_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteTaskParams {
    pub task_id: String,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimTaskParams {
    pub task_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployBpmnParams {
    pub deployment_name: String,
    pub bpmn_file_path: String,
}

/// Convert `{name: value}` into the engine's typed variable map.
///
/// Every value is submitted as a `String` variable.
pub fn engine_variables(vars: &Map<String, Value>) -> Value {
    let typed: Map<String, Value> = vars
        .iter()
        .map(|(name, value)| (name.clone(), json!({"value": value, "type": "String"})))
        .collect();
    Value::Object(typed)
}

/// Keep only set, non-empty filters
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults() {
        let p: ListProcessDefinitionsParams = serde_json::from_value(json!({})).unwrap();
        assert!(p.latest_version);
        assert_eq!(p.max_results, 50);

        let p: ListProcessInstancesParams =
            serde_json::from_value(json!({"active": false})).unwrap();
        assert!(!p.active);
        assert_eq!(p.max_results, 50);
    }

    #[test]
    fn variables_are_wrapped_as_strings() {
        let vars = json!({"amount": 42, "approved": "yes"});
        let typed = engine_variables(vars.as_object().unwrap());
        assert_eq!(
            typed,
            json!({
                "amount": {"value": 42, "type": "String"},
                "approved": {"value": "yes", "type": "String"}
            })
        );
    }

    #[test]
    fn claim_requires_user() {
        let err = serde_json::from_value::<ClaimTaskParams>(json!({"task_id": "t1"}));
        assert!(err.is_err());
    }
}

//! Client-side following of `next_steps` chains

use super::{CddTools, NextStep, ToolKind};
use crate::error::{AdapterError, Result};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Something that can execute a named tool with JSON parameters.
///
/// `Ok(None)` means the tool is unknown to the invoker; bad parameters for a
/// known tool are an `Err`.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, tool: &str, params: &Map<String, Value>) -> Result<Option<Value>>;
}

#[async_trait]
impl ToolInvoker for CddTools {
    async fn invoke(&self, tool: &str, params: &Map<String, Value>) -> Result<Option<Value>> {
        let Some(kind) = ToolKind::from_tool_name(tool) else {
            return Ok(None);
        };
        let Some(customer_id) = params.get("customer_id").and_then(Value::as_str) else {
            return Err(AdapterError::InvalidParams {
                message: format!("{} requires a string customer_id", tool),
            });
        };
        Ok(Some(serde_json::to_value(self.run(kind, customer_id))?))
    }
}

/// Interpret one raw `next_steps` entry; anything that is not a named tool
/// call is an action for a human operator.
fn parse_step(raw: &Value) -> NextStep {
    match serde_json::from_value::<NextStep>(raw.clone()) {
        Ok(NextStep::Call(call)) if call.tool.is_empty() => NextStep::Action(raw.to_string()),
        Ok(step) => step,
        Err(_) => NextStep::Action(raw.to_string()),
    }
}

/// One observation made while walking a chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChainEvent {
    /// Plain-text step meant for a human operator
    Action { depth: usize, text: String },
    Call {
        depth: usize,
        tool: String,
        params: Map<String, Value>,
        result: Value,
    },
    /// Call and failure depths are those of the attempted call
    UnknownTool { depth: usize, tool: String },
    Failed {
        depth: usize,
        tool: String,
        error: String,
    },
    DepthLimit { depth: usize },
}

/// Depth-first walker over structured `next_steps`
pub struct ChainWalker<'a, I: ToolInvoker> {
    invoker: &'a I,
    max_depth: usize,
}

impl<'a, I: ToolInvoker> ChainWalker<'a, I> {
    pub fn new(invoker: &'a I, max_depth: usize) -> Self {
        Self { invoker, max_depth }
    }

    /// Follow every step of `result`, recursing into the results of the
    /// tools it calls.
    pub async fn walk(&self, result: &Value) -> Vec<ChainEvent> {
        let mut events = Vec::new();
        self.walk_at(result, 0, &mut events).await;
        events
    }

    fn walk_at<'b>(
        &'b self,
        result: &'b Value,
        depth: usize,
        events: &'b mut Vec<ChainEvent>,
    ) -> BoxFuture<'b, ()> {
        async move {
            if depth >= self.max_depth {
                debug!(depth, "chain depth limit reached");
                events.push(ChainEvent::DepthLimit { depth });
                return;
            }

            let steps = match result.get("next_steps") {
                Some(Value::Array(steps)) => steps,
                Some(Value::Null) | None => return,
                Some(other) => {
                    warn!("ignoring non-array next_steps: {}", other);
                    return;
                }
            };

            for raw in steps {
                let call = match parse_step(raw) {
                    NextStep::Action(text) => {
                        events.push(ChainEvent::Action { depth, text });
                        continue;
                    }
                    NextStep::Call(call) => call,
                };

                let mut params = call.params;
                if !params.contains_key("customer_id")
                    && let Some(id) = result.get("customer_id")
                {
                    params.insert("customer_id".into(), id.clone());
                }

                debug!(tool = %call.tool, depth = depth + 1, "following next step");
                match self.invoker.invoke(&call.tool, &params).await {
                    Ok(Some(child)) => {
                        events.push(ChainEvent::Call {
                            depth: depth + 1,
                            tool: call.tool,
                            params,
                            result: child.clone(),
                        });
                        self.walk_at(&child, depth + 1, events).await;
                    }
                    Ok(None) => {
                        warn!(tool = %call.tool, "unknown tool referenced in next_steps");
                        events.push(ChainEvent::UnknownTool {
                            depth: depth + 1,
                            tool: call.tool,
                        });
                    }
                    Err(e) => {
                        warn!(tool = %call.tool, "error when calling {}: {}", call.tool, e);
                        events.push(ChainEvent::Failed {
                            depth: depth + 1,
                            tool: call.tool,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Invoker that replays fixed responses and records what it was asked
    struct Scripted {
        responses: Map<String, Value>,
        seen: Mutex<Vec<(String, Map<String, Value>)>>,
    }

    impl Scripted {
        fn new(responses: Value) -> Self {
            Self {
                responses: responses.as_object().cloned().unwrap(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolInvoker for Scripted {
        async fn invoke(&self, tool: &str, params: &Map<String, Value>) -> Result<Option<Value>> {
            self.seen
                .lock()
                .unwrap()
                .push((tool.to_string(), params.clone()));
            if tool == "broken" {
                return Err(AdapterError::Internal {
                    message: "boom".into(),
                });
            }
            Ok(self.responses.get(tool).cloned())
        }
    }

    #[tokio::test]
    async fn inherits_customer_id_and_skips_unknown_tools() {
        let invoker = Scripted::new(json!({"leaf": {"customer_id": "child"}}));
        let root = json!({
            "customer_id": "CUST-1",
            "next_steps": [
                "Call the customer",
                {"tool": "leaf"},
                {"tool": "nowhere", "params": {"customer_id": "explicit"}},
                {"tool": "broken"}
            ]
        });

        let events = ChainWalker::new(&invoker, 4).walk(&root).await;

        assert_eq!(
            events[0],
            ChainEvent::Action {
                depth: 0,
                text: "Call the customer".into()
            }
        );
        match &events[1] {
            ChainEvent::Call { depth, tool, params, .. } => {
                assert_eq!(*depth, 1);
                assert_eq!(tool, "leaf");
                assert_eq!(params["customer_id"], "CUST-1");
            }
            other => panic!("expected call, got {other:?}"),
        }
        assert!(matches!(&events[2], ChainEvent::UnknownTool { tool, .. } if tool == "nowhere"));
        assert!(matches!(&events[3], ChainEvent::Failed { tool, error, .. } if tool == "broken" && error.contains("boom")));

        let seen = invoker.seen.lock().unwrap();
        assert_eq!(seen[1].1["customer_id"], "explicit");
    }

    #[tokio::test]
    async fn stops_at_max_depth() {
        let invoker = Scripted::new(json!({
            "loop": {"customer_id": "C", "next_steps": [{"tool": "loop"}]}
        }));
        let root = json!({"customer_id": "C", "next_steps": [{"tool": "loop"}]});

        let events = ChainWalker::new(&invoker, 2).walk(&root).await;

        let calls = events
            .iter()
            .filter(|e| matches!(e, ChainEvent::Call { .. }))
            .count();
        assert_eq!(calls, 2);
        assert_eq!(events.last(), Some(&ChainEvent::DepthLimit { depth: 2 }));
    }

    #[tokio::test]
    async fn walks_cdd_chain_from_profile() {
        let tools = CddTools::new();
        let profile = serde_json::to_value(tools.get_customer_profile("CUST-5-NEG")).unwrap();

        let events = ChainWalker::new(&tools, 4).walk(&profile).await;

        let first_level: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ChainEvent::Call { depth: 1, tool, .. } => Some(tool.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(first_level, ["get_risk_score", "generate_compliance_report"]);

        let explained = events.iter().any(|e| {
            matches!(e, ChainEvent::Call { tool, result, .. }
                if tool == "explain_risk" && result["customer_id"] == "CUST-5-NEG")
        });
        assert!(explained);
        assert!(!events.iter().any(|e| matches!(e, ChainEvent::DepthLimit { .. })));
    }

    #[tokio::test]
    async fn malformed_entries_become_actions() {
        let tools = CddTools::new();
        let root = json!({
            "customer_id": "C",
            "next_steps": ["Call them", {"note": 1}, {"tool": ""}, {"tool": "get_risk_score"}]
        });

        let events = ChainWalker::new(&tools, 1).walk(&root).await;

        assert_eq!(
            events[..3],
            [
                ChainEvent::Action {
                    depth: 0,
                    text: "Call them".into()
                },
                ChainEvent::Action {
                    depth: 0,
                    text: r#"{"note":1}"#.into()
                },
                ChainEvent::Action {
                    depth: 0,
                    text: r#"{"tool":""}"#.into()
                },
            ]
        );
        assert!(matches!(
            &events[3],
            ChainEvent::Call { depth: 1, tool, result, .. }
                if tool == "get_risk_score" && result["customer_id"] == "C"
        ));
    }

    #[tokio::test]
    async fn known_tool_without_customer_id_fails() {
        let tools = CddTools::new();
        let params = Map::new();
        let err = tools.invoke("get_risk_score", &params).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidParams { .. }));
        assert!(tools.invoke("get_profile", &params).await.unwrap().is_none());

        let events = ChainWalker::new(&tools, 4)
            .walk(&json!({"next_steps": [{"tool": "get_risk_score"}, {"tool": "nowhere"}]}))
            .await;
        assert!(matches!(
            &events[0],
            ChainEvent::Failed { depth: 1, tool, error }
                if tool == "get_risk_score" && error.contains("customer_id")
        ));
        assert_eq!(
            events[1],
            ChainEvent::UnknownTool {
                depth: 1,
                tool: "nowhere".into()
            }
        );
    }

    #[tokio::test]
    async fn result_without_next_steps_yields_nothing() {
        let tools = CddTools::new();
        let events = ChainWalker::new(&tools, 4)
            .walk(&json!({"customer_id": "C"}))
            .await;
        assert!(events.is_empty());
    }
}

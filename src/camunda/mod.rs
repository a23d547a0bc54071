//! Thin client for the Camunda 7 engine REST API

pub mod models;

use crate::config::CamundaConfig;
use crate::error::{AdapterError, Result};
use models::*;
use reqwest::{Client, Method, multipart};
use serde_json::{Map, Value, json};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct CamundaClient {
    base_url: String,
    auth: Option<(String, String)>,
    timeout_ms: u64,
    client: Client,
}

impl CamundaClient {
    pub fn new(config: &CamundaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AdapterError::Config {
                message: format!("Failed to build Camunda HTTP client: {}", e),
            })?;

        // Basic auth only when both halves are present
        let auth = if config.user.is_empty() || config.password.is_empty() {
            None
        } else {
            Some((config.user.clone(), config.password.clone()))
        };

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            auth,
            timeout_ms: config.timeout_ms,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    /// Issue a request and decode the JSON body; an empty body yields `Null`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        debug!(%method, endpoint, "camunda request");
        let mut builder = self
            .authorize(self.client.request(method, self.url(endpoint)))
            .header("Accept", "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(|e| self.transport_error(endpoint, e))?;
        Self::decode(resp).await
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> AdapterError {
        if err.is_timeout() {
            AdapterError::Timeout {
                operation: format!("camunda {}", endpoint),
                timeout_ms: self.timeout_ms,
            }
        } else {
            err.into()
        }
    }

    async fn decode(resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn list_process_definitions(
        &self,
        params: &ListProcessDefinitionsParams,
    ) -> Result<Value> {
        let mut query = vec![
            ("maxResults", params.max_results.to_string()),
            ("latestVersion", params.latest_version.to_string()),
        ];
        if let Some(key) = non_empty(&params.key) {
            query.push(("keyLike", format!("%{key}%")));
        }
        if let Some(name) = non_empty(&params.name) {
            query.push(("nameLike", format!("%{name}%")));
        }
        self.request(Method::GET, "process-definition", &query, None)
            .await
    }

    pub async fn get_process_definition(&self, definition_id: &str) -> Result<Value> {
        self.request(
            Method::GET,
            &format!("process-definition/{definition_id}"),
            &[],
            None,
        )
        .await
    }

    pub async fn start_process_instance(&self, params: &StartProcessInstanceParams) -> Result<Value> {
        let mut payload = Map::new();
        if let Some(bk) = non_empty(&params.business_key) {
            payload.insert("businessKey".into(), json!(bk));
        }
        if let Some(vars) = params.variables.as_ref().filter(|v| !v.is_empty()) {
            payload.insert("variables".into(), engine_variables(vars));
        }
        info!(key = %params.key, "starting process instance");
        self.request(
            Method::POST,
            &format!("process-definition/key/{}/start", params.key),
            &[],
            Some(&Value::Object(payload)),
        )
        .await
    }

    pub async fn list_process_instances(
        &self,
        params: &ListProcessInstancesParams,
    ) -> Result<Value> {
        let mut query = vec![("maxResults", params.max_results.to_string())];
        if let Some(key) = non_empty(&params.process_definition_key) {
            query.push(("processDefinitionKey", key.to_string()));
        }
        if let Some(bk) = non_empty(&params.business_key) {
            query.push(("businessKey", bk.to_string()));
        }
        if params.active {
            query.push(("active", "true".to_string()));
        }
        self.request(Method::GET, "process-instance", &query, None)
            .await
    }

    pub async fn get_process_instance(&self, instance_id: &str) -> Result<Value> {
        self.request(
            Method::GET,
            &format!("process-instance/{instance_id}"),
            &[],
            None,
        )
        .await
    }

    pub async fn delete_process_instance(
        &self,
        params: &DeleteProcessInstanceParams,
    ) -> Result<String> {
        let mut query = Vec::new();
        if let Some(reason) = non_empty(&params.reason) {
            query.push(("reason", reason.to_string()));
        }
        self.request(
            Method::DELETE,
            &format!("process-instance/{}", params.instance_id),
            &query,
            None,
        )
        .await?;
        Ok(format!(
            "Process instance {} deleted successfully",
            params.instance_id
        ))
    }

    pub async fn list_tasks(&self, params: &ListTasksParams) -> Result<Value> {
        let mut query = vec![("maxResults", params.max_results.to_string())];
        if let Some(id) = non_empty(&params.process_instance_id) {
            query.push(("processInstanceId", id.to_string()));
        }
        if let Some(assignee) = non_empty(&params.assignee) {
            query.push(("assignee", assignee.to_string()));
        }
        if let Some(user) = non_empty(&params.candidate_user) {
            query.push(("candidateUser", user.to_string()));
        }
        self.request(Method::GET, "task", &query, None).await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Value> {
        self.request(Method::GET, &format!("task/{task_id}"), &[], None)
            .await
    }

    pub async fn complete_task(&self, params: &CompleteTaskParams) -> Result<String> {
        let mut payload = Map::new();
        if let Some(vars) = params.variables.as_ref().filter(|v| !v.is_empty()) {
            payload.insert("variables".into(), engine_variables(vars));
        }
        self.request(
            Method::POST,
            &format!("task/{}/complete", params.task_id),
            &[],
            Some(&Value::Object(payload)),
        )
        .await?;
        Ok(format!("Task {} completed successfully", params.task_id))
    }

    pub async fn claim_task(&self, params: &ClaimTaskParams) -> Result<String> {
        self.request(
            Method::POST,
            &format!("task/{}/claim", params.task_id),
            &[],
            Some(&json!({"userId": params.user_id})),
        )
        .await?;
        Ok(format!("Task {} claimed by {}", params.task_id, params.user_id))
    }

    pub async fn get_task_variables(&self, task_id: &str) -> Result<Value> {
        self.request(
            Method::GET,
            &format!("task/{task_id}/variables"),
            &[],
            None,
        )
        .await
    }

    pub async fn get_process_variables(&self, instance_id: &str) -> Result<Value> {
        self.request(
            Method::GET,
            &format!("process-instance/{instance_id}/variables"),
            &[],
            None,
        )
        .await
    }

    /// Upload a BPMN file as a new deployment
    pub async fn deploy_bpmn(&self, params: &DeployBpmnParams) -> Result<Value> {
        let path = Path::new(&params.bpmn_file_path);
        let content = tokio::fs::read(path).await.map_err(|e| AdapterError::Io {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "process.bpmn".to_string());

        let part = multipart::Part::bytes(content)
            .file_name(file_name)
            .mime_str("application/xml")?;
        let form = multipart::Form::new()
            .text("deployment-name", params.deployment_name.clone())
            .part("data", part);

        info!(deployment = %params.deployment_name, "deploying BPMN");
        let resp = self
            .authorize(self.client.post(self.url("deployment/create")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error("deployment/create", e))?;
        Self::decode(resp).await
    }
}

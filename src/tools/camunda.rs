//! Camunda tool handlers

use crate::camunda::models::*;
use crate::error::Result;
use crate::server::{CamundaServer, parse_args, structured};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use serde_json::Value;

impl CamundaServer {
    pub async fn handle_list_process_definitions(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: ListProcessDefinitionsParams = parse_args(&request)?;
        let definitions = self.client.list_process_definitions(&params).await?;
        Ok(structured(definitions))
    }

    pub async fn handle_get_process_definition(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: DefinitionIdParams = parse_args(&request)?;
        let definition = self
            .client
            .get_process_definition(&params.definition_id)
            .await?;
        Ok(structured(definition))
    }

    pub async fn handle_start_process_instance(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: StartProcessInstanceParams = parse_args(&request)?;
        let instance = self.client.start_process_instance(&params).await?;
        Ok(structured(instance))
    }

    pub async fn handle_list_process_instances(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: ListProcessInstancesParams = parse_args(&request)?;
        let instances = self.client.list_process_instances(&params).await?;
        Ok(structured(instances))
    }

    pub async fn handle_get_process_instance(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: InstanceIdParams = parse_args(&request)?;
        let instance = self.client.get_process_instance(&params.instance_id).await?;
        Ok(structured(instance))
    }

    pub async fn handle_delete_process_instance(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: DeleteProcessInstanceParams = parse_args(&request)?;
        let message = self.client.delete_process_instance(&params).await?;
        Ok(structured(Value::String(message)))
    }

    pub async fn handle_get_process_variables(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: InstanceIdParams = parse_args(&request)?;
        let variables = self
            .client
            .get_process_variables(&params.instance_id)
            .await?;
        Ok(structured(variables))
    }

    pub async fn handle_list_tasks(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let params: ListTasksParams = parse_args(&request)?;
        let tasks = self.client.list_tasks(&params).await?;
        Ok(structured(tasks))
    }

    pub async fn handle_get_task(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let params: TaskIdParams = parse_args(&request)?;
        let task = self.client.get_task(&params.task_id).await?;
        Ok(structured(task))
    }

    pub async fn handle_complete_task(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: CompleteTaskParams = parse_args(&request)?;
        let message = self.client.complete_task(&params).await?;
        Ok(structured(Value::String(message)))
    }

    pub async fn handle_claim_task(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let params: ClaimTaskParams = parse_args(&request)?;
        let message = self.client.claim_task(&params).await?;
        Ok(structured(Value::String(message)))
    }

    pub async fn handle_get_task_variables(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult> {
        let params: TaskIdParams = parse_args(&request)?;
        let variables = self.client.get_task_variables(&params.task_id).await?;
        Ok(structured(variables))
    }

    pub async fn handle_deploy_bpmn(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let params: DeployBpmnParams = parse_args(&request)?;
        let deployment = self.client.deploy_bpmn(&params).await?;
        Ok(structured(deployment))
    }
}

use crate::cdd::ToolKind;
use crate::server::{CamundaServer, CddServer, OcrServer, implementation, tool};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, InitializeRequestParam, InitializeResult,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool, ToolsCapability,
    },
    service::{RequestContext, RoleServer},
};
use tracing::info;

fn server_info(name: &str, title: &str, instructions: &str) -> ServerInfo {
    ServerInfo {
        protocol_version: ProtocolVersion::LATEST,
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        server_info: implementation(name, title),
        instructions: Some(instructions.to_string()),
        ..Default::default()
    }
}

fn unknown_tool(name: &str) -> McpError {
    McpError {
        code: rmcp::model::ErrorCode::METHOD_NOT_FOUND,
        message: format!("Unknown tool: {}", name).into(),
        data: None,
    }
}

impl CddServer {
    pub fn tools() -> Vec<Tool> {
        let schema = crate::schemas::customer_id_schema();
        vec![
            tool(
                ToolKind::Profile.tool_name(),
                "Customer Profile",
                "Get profile of the customer (simulated)",
                schema.clone(),
            ),
            tool(
                ToolKind::Score.tool_name(),
                "Risk Score",
                "Get risk score of the customer (simulated)",
                schema.clone(),
            ),
            tool(
                ToolKind::Explain.tool_name(),
                "Explain Risk",
                "Explain the risk of the customer (simulated)",
                schema.clone(),
            ),
            tool(
                ToolKind::Report.tool_name(),
                "Compliance Report",
                "Generate compliance report for the given customer (simulated)",
                schema,
            ),
        ]
    }
}

impl ServerHandler for CddServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "cdd",
            "StateStreet CDD Service",
            "Simulated customer due diligence. Results carry next_steps: strings are human actions, {tool, params} objects are follow-up calls.",
        )
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("tools/list requested");
        Ok(ListToolsResult {
            tools: Self::tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match ToolKind::from_tool_name(request.name.as_ref()) {
            Some(kind) => self.handle_cdd_tool(kind, request).map_err(|e| e.into()),
            None => Err(unknown_tool(&request.name)),
        }
    }
}

impl CamundaServer {
    pub fn tools() -> Vec<Tool> {
        use crate::schemas::*;
        vec![
            tool(
                "list_process_definitions",
                "List Process Definitions",
                "List BPMN process definitions, optionally filtered by key or name (partial match)",
                list_process_definitions_schema(),
            ),
            tool(
                "get_process_definition",
                "Get Process Definition",
                "Get details of a specific process definition",
                definition_id_schema(),
            ),
            tool(
                "start_process_instance",
                "Start Process Instance",
                "Start a new process instance by process definition key",
                start_process_instance_schema(),
            ),
            tool(
                "list_process_instances",
                "List Process Instances",
                "List process instances",
                list_process_instances_schema(),
            ),
            tool(
                "get_process_instance",
                "Get Process Instance",
                "Get details of a specific process instance",
                instance_id_schema(),
            ),
            tool(
                "delete_process_instance",
                "Delete Process Instance",
                "Delete (cancel) a process instance",
                delete_process_instance_schema(),
            ),
            tool(
                "list_tasks",
                "List Tasks",
                "List user tasks",
                list_tasks_schema(),
            ),
            tool(
                "get_task",
                "Get Task",
                "Get details of a specific task",
                task_id_schema(),
            ),
            tool(
                "complete_task",
                "Complete Task",
                "Complete a user task, optionally submitting variables",
                complete_task_schema(),
            ),
            tool(
                "claim_task",
                "Claim Task",
                "Claim a task for a specific user",
                claim_task_schema(),
            ),
            tool(
                "get_task_variables",
                "Get Task Variables",
                "Get all variables for a specific task",
                task_id_schema(),
            ),
            tool(
                "get_process_variables",
                "Get Process Variables",
                "Get all variables for a process instance",
                instance_id_schema(),
            ),
            tool(
                "deploy_bpmn",
                "Deploy BPMN",
                "Deploy a BPMN file to Camunda",
                deploy_bpmn_schema(),
            ),
        ]
    }
}

impl ServerHandler for CamundaServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "camunda",
            "Camunda BPM",
            "Tools for the Camunda BPM platform REST API: process definitions, instances, tasks and deployments.",
        )
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("tools/list requested");
        Ok(ListToolsResult {
            tools: Self::tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        // Route to appropriate tool handler
        match request.name.as_ref() {
            // Process definitions
            "list_process_definitions" => self
                .handle_list_process_definitions(request)
                .await
                .map_err(|e| e.into()),
            "get_process_definition" => self
                .handle_get_process_definition(request)
                .await
                .map_err(|e| e.into()),
            "start_process_instance" => self
                .handle_start_process_instance(request)
                .await
                .map_err(|e| e.into()),

            // Process instances
            "list_process_instances" => self
                .handle_list_process_instances(request)
                .await
                .map_err(|e| e.into()),
            "get_process_instance" => self
                .handle_get_process_instance(request)
                .await
                .map_err(|e| e.into()),
            "delete_process_instance" => self
                .handle_delete_process_instance(request)
                .await
                .map_err(|e| e.into()),
            "get_process_variables" => self
                .handle_get_process_variables(request)
                .await
                .map_err(|e| e.into()),

            // Tasks
            "list_tasks" => self.handle_list_tasks(request).await.map_err(|e| e.into()),
            "get_task" => self.handle_get_task(request).await.map_err(|e| e.into()),
            "complete_task" => self
                .handle_complete_task(request)
                .await
                .map_err(|e| e.into()),
            "claim_task" => self.handle_claim_task(request).await.map_err(|e| e.into()),
            "get_task_variables" => self
                .handle_get_task_variables(request)
                .await
                .map_err(|e| e.into()),

            // Deployments
            "deploy_bpmn" => self.handle_deploy_bpmn(request).await.map_err(|e| e.into()),
            _ => Err(unknown_tool(&request.name)),
        }
    }
}

impl OcrServer {
    pub fn tools() -> Vec<Tool> {
        vec![tool(
            "invoice_ocr",
            "Invoice OCR",
            "Recognize a general invoice from a URL. The URL can point to an image or a PDF file.",
            crate::schemas::invoice_ocr_schema(),
        )]
    }
}

impl ServerHandler for OcrServer {
    fn get_info(&self) -> ServerInfo {
        server_info(
            "ocr",
            "OCR Service",
            "Invoice recognition backed by Tencent Cloud OCR.",
        )
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("tools/list requested");
        Ok(ListToolsResult {
            tools: Self::tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match request.name.as_ref() {
            "invoice_ocr" => self
                .handle_invoice_ocr(request)
                .await
                .map_err(|e| e.into()),
            _ => Err(unknown_tool(&request.name)),
        }
    }
}

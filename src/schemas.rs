use serde_json::{Map, Value, json};
use std::sync::Arc;

fn object(schema: Value) -> Arc<Map<String, Value>> {
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

// --- cdd ---

pub fn customer_id_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "customer_id": {
                "type": "string",
                "description": "Customer reference; ids containing 'neg' select the negative scenario"
            }
        },
        "required": ["customer_id"]
    }))
}

// --- camunda ---

pub fn list_process_definitions_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "key": {"type": "string", "description": "Filter by process definition key (partial match)"},
            "name": {"type": "string", "description": "Filter by process definition name (partial match)"},
            "latest_version": {"type": "boolean", "default": true},
            "max_results": {"type": "integer", "minimum": 1, "default": 50}
        }
    }))
}

pub fn definition_id_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "definition_id": {"type": "string"}
        },
        "required": ["definition_id"]
    }))
}

pub fn start_process_instance_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "key": {"type": "string", "description": "Process definition key"},
            "business_key": {"type": "string"},
            "variables": {"type": "object", "description": "Process variables as {name: value}"}
        },
        "required": ["key"]
    }))
}

pub fn list_process_instances_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "process_definition_key": {"type": "string"},
            "business_key": {"type": "string"},
            "active": {"type": "boolean", "default": true},
            "max_results": {"type": "integer", "minimum": 1, "default": 50}
        }
    }))
}

pub fn instance_id_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "instance_id": {"type": "string"}
        },
        "required": ["instance_id"]
    }))
}

pub fn delete_process_instance_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "instance_id": {"type": "string"},
            "reason": {"type": "string"}
        },
        "required": ["instance_id"]
    }))
}

pub fn list_tasks_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "process_instance_id": {"type": "string"},
            "assignee": {"type": "string"},
            "candidate_user": {"type": "string"},
            "max_results": {"type": "integer", "minimum": 1, "default": 50}
        }
    }))
}

pub fn task_id_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "task_id": {"type": "string"}
        },
        "required": ["task_id"]
    }))
}

pub fn complete_task_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "task_id": {"type": "string"},
            "variables": {"type": "object"}
        },
        "required": ["task_id"]
    }))
}

pub fn claim_task_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "task_id": {"type": "string"},
            "user_id": {"type": "string"}
        },
        "required": ["task_id", "user_id"]
    }))
}

pub fn deploy_bpmn_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "deployment_name": {"type": "string"},
            "bpmn_file_path": {"type": "string", "description": "Path to the BPMN file on the server host"}
        },
        "required": ["deployment_name", "bpmn_file_path"]
    }))
}

// --- ocr ---

pub fn invoice_ocr_schema() -> Arc<Map<String, Value>> {
    object(json!({
        "type": "object",
        "properties": {
            "image_url": {"type": "string", "description": "URL of an invoice image or PDF"},
            "enable_pdf": {"type": "boolean", "default": true}
        },
        "required": ["image_url"]
    }))
}

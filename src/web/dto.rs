use rocket::serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::registry::ToolSpec;

#[derive(Deserialize)]
pub struct ToolCallRequest {
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Serialize)]
pub struct ToolCallResponse {
    pub ok: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ToolListResponse {
    pub tools: &'static [ToolSpec],
}

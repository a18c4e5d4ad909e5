use rocket::serde::json::Json;
use rocket::{get, post, State};
use std::sync::Arc;

use crate::bootstrap::AppState;
use crate::engine::registry;
use crate::web::dto::{ToolCallRequest, ToolCallResponse, ToolListResponse};

#[get("/api/v1/tools")]
pub fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: registry::tools(),
    })
}

#[post("/api/v1/tools/<name>", data = "<body>")]
pub async fn call_tool(
    name: &str,
    body: Json<ToolCallRequest>,
    app_state: &State<Arc<AppState>>,
) -> Json<ToolCallResponse> {
    match registry::dispatch(app_state.inner(), name, body.into_inner().arguments).await {
        Ok(result) => Json(ToolCallResponse {
            ok: true,
            result: Some(result),
            error: None,
        }),
        Err(e) => {
            log::error!("Tool {} failed: {}", name, e);
            Json(ToolCallResponse {
                ok: false,
                result: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

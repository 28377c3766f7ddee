//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Map, Value};

use toolkit_adapters::{AdapterError, Framework};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub account: Option<String>,
    pub tools: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct ToolsResponse {
    pub framework: Framework,
    pub tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn parse_framework(name: &str) -> Result<Framework, ApiError> {
    name.parse().map_err(|e: AdapterError| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "UNKNOWN_FRAMEWORK".into(),
            }),
        )
    })
}

/// Request body as handed over by the framework. Bodies that are not JSON
/// are passed on as a string so the adapter treats them as unreadable input.
fn raw_envelope(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let dispatcher = state.toolkit.dispatcher();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: dispatcher.provider_name().to_string(),
        account: dispatcher.context().account.clone(),
        tools: state.toolkit.catalogue().names(),
    })
}

/// Framework-native declarations of the allowed tools
pub async fn list_tools(
    State(state): State<AppState>,
    Path(framework): Path<String>,
) -> Result<Json<ToolsResponse>, ApiError> {
    let framework = parse_framework(&framework)?;

    Ok(Json(ToolsResponse {
        framework,
        tools: state.toolkit.declarations(framework),
    }))
}

/// Invoke one tool with a raw framework envelope
///
/// Tool failures are part of the returned envelope, so this answers 200 for
/// every known framework.
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path((framework, name)): Path<(String, String)>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let framework = parse_framework(&framework)?;
    let raw = raw_envelope(&body);

    Ok(Json(state.toolkit.invoke(framework, &name, raw).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_envelope() {
        assert_eq!(raw_envelope(""), json!({}));
        assert_eq!(raw_envelope(r#"{"toolUseId": "abc"}"#), json!({"toolUseId": "abc"}));
        assert_eq!(raw_envelope("not-json{"), json!("not-json{"));
    }

    #[test]
    fn test_unknown_framework_is_bad_request() {
        let (status, Json(body)) = parse_framework("autogen").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "UNKNOWN_FRAMEWORK");
    }
}

//! Payment agent toolkit HTTP server
//!
//! Axum-based tool host: lists the allowed tools in any supported
//! framework's native shape and invokes them with raw framework envelopes.

mod handlers;
mod settings;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolkit_adapters::Toolkit;
use toolkit_core::{MockProviderClient, ProviderClient};
use toolkit_stripe::StripeClient;

use crate::handlers::{health_check, invoke_tool, list_tools};
use crate::settings::Settings;
use crate::state::AppState;

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/frameworks/{framework}/tools", get(list_tools))
        .route("/api/frameworks/{framework}/tools/{name}", post(invoke_tool))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    let provider: Arc<dyn ProviderClient> = match &settings.stripe_secret_key {
        Some(secret_key) => {
            tracing::info!("✓ Stripe configured");
            Arc::new(StripeClient::new(secret_key)?)
        }
        None => {
            tracing::warn!("⚠ STRIPE_SECRET_KEY not set - using the in-memory provider");
            Arc::new(MockProviderClient::new())
        }
    };

    let configuration = settings.configuration()?;
    let toolkit = Toolkit::new(provider, &configuration);

    tracing::info!("Allowed {} tools:", toolkit.catalogue().len());
    for name in toolkit.catalogue().names() {
        tracing::info!("  • {}", name);
    }

    let app = app(AppState::new(toolkit));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 toolkit server running on http://{}", settings.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                                  - Health check");
    tracing::info!("  GET  /api/frameworks/{{framework}}/tools        - Tool declarations");
    tracing::info!("  POST /api/frameworks/{{framework}}/tools/{{name}} - Invoke a tool");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use toolkit_core::{Action, Category, Configuration};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let configuration = Configuration::new()
            .allow(Category::Products, Action::Create)
            .allow(Category::Refunds, Action::Create);
        let toolkit = Toolkit::new(Arc::new(MockProviderClient::new()), &configuration);
        app(AppState::new(toolkit))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri).body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "mock");
        assert_eq!(body["tools"], json!(["create_product", "create_refund"]));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (status, body) = send(Request::get("/api/frameworks/strands/tools").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["framework"], "strands");
        assert_eq!(body["tools"][0]["toolSpec"]["name"], "create_product");

        let (status, body) = send(Request::get("/api/frameworks/camel/tools").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tools"][0]["function"]["name"], "create_product");

        let (status, _) = send(Request::get("/api/frameworks/autogen/tools").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invoke_tool() {
        let (status, body) = send(post(
            "/api/frameworks/strands/tools/create_product",
            r#"{"toolUseId": "abc", "input": {"name": "test"}}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["toolUseId"], "abc");
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_failures_come_back_as_envelopes() {
        let (status, body) = send(post(
            "/api/frameworks/mcp/tools/create_refund",
            r#"{"arguments": {"payment_intent": "pi_nonexistent"}}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isError"], true);

        let (status, body) = send(post("/api/frameworks/openai/tools/list_products", "not-json{")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_str().unwrap().contains("list_products"));
    }
}

//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::dialogue::Dispatcher;

/// Build the router with every endpoint.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(dispatcher: Arc<Dispatcher>) -> Router {
    let ctx = ApiContext::new(dispatcher);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/chat", post(endpoints::chat::send))
        .route("/webhook", post(endpoints::webhook::receive))
        .route(
            "/session/:user_id",
            get(endpoints::session::snapshot).delete(endpoints::session::clear),
        )
        .with_state(ctx)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::completion::{DisabledCompletion, MockCompletion};
    use crate::dialogue::Router as DialogueRouter;
    use crate::session::MemorySessionStore;
    use crate::templates::FALLBACK_PROMPT;

    fn test_dispatcher() -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(
            Arc::new(MemorySessionStore::new()),
            DialogueRouter::new("medassist.ai", Some(3)),
            Arc::new(DisabledCompletion),
            Duration::from_secs(1),
        ))
    }

    fn app() -> Router {
        api_router(test_dispatcher())
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_backends() {
        let (status, json) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "MedAssist AI WhatsApp Bot");
        assert_eq!(json["session_backend"], "memory");
        assert_eq!(json["completion_backend"], "disabled");
    }

    #[tokio::test]
    async fn chat_returns_reply_intent_and_session() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/chat",
            Some(json!({"user_id": "919800000001", "message": "Hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["input_type"], "welcome");
        assert!(json["response"].as_str().unwrap().contains("Welcome to MedAssist AI"));
        assert_eq!(json["session"]["onboarding_step"], 1);
        assert_eq!(json["session"]["user_id"], "919800000001");
    }

    #[tokio::test]
    async fn chat_without_user_uses_default() {
        let app = app();
        send(&app, "POST", "/chat", Some(json!({"message": "emergency"}))).await;
        let (_, json) = send(&app, "GET", "/session/default_user", None).await;
        assert_eq!(json["session"]["emergency_mode"], true);
    }

    #[tokio::test]
    async fn chat_without_message_is_400() {
        let (status, json) = send(&app(), "POST", "/chat", Some(json!({"user_id": "u"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Message is required");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_fallback_never_surfaces_error() {
        let (status, json) = send(
            &app(),
            "POST",
            "/chat",
            Some(json!({"user_id": "u", "message": "why is the sky blue"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["input_type"], "fallback");
        assert_eq!(json["response"], FALLBACK_PROMPT);
    }

    #[tokio::test]
    async fn chat_uses_completion_when_available() {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(MemorySessionStore::new()),
            DialogueRouter::new("medassist.ai", None),
            Arc::new(MockCompletion::new("Rest well.")),
            Duration::from_secs(1),
        ));
        let (_, json) = send(
            &api_router(dispatcher),
            "POST",
            "/chat",
            Some(json!({"user_id": "u", "message": "why is the sky blue"})),
        )
        .await;
        assert_eq!(json["response"], "Rest well.");
    }

    #[tokio::test]
    async fn webhook_processes_whatsapp_payload() {
        let app = app();
        let payload = json!({
            "entry": [{"changes": [{"value": {"messages": [
                {
                    "from": "919800000001",
                    "text": {"body": "[Voice message: Mujhe pet mein dard hai]"}
                }
            ]}}]}]
        });
        let (status, json) = send(&app, "POST", "/webhook", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user_id"], "919800000001");
        assert_eq!(json["input_type"], "voice_message");
        assert!(json["response"].as_str().unwrap().contains("Stomach pain"));
    }

    #[tokio::test]
    async fn webhook_without_message_is_acknowledged() {
        let app = app();
        let (status, json) = send(&app, "POST", "/webhook", Some(json!({"entry": []}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "no message processed");
        let (_, json) = send(&app, "GET", "/session/unknown", None).await;
        assert!(json["session"].is_null());
    }

    #[tokio::test]
    async fn session_snapshot_and_clear() {
        let app = app();
        let (_, json) = send(&app, "GET", "/session/u1", None).await;
        assert_eq!(json["user_id"], "u1");
        assert!(json["session"].is_null());

        send(&app, "POST", "/chat", Some(json!({"user_id": "u1", "message": "Hi"}))).await;
        let (_, json) = send(&app, "GET", "/session/u1", None).await;
        assert_eq!(json["session"]["onboarding_step"], 1);

        let (status, json) = send(&app, "DELETE", "/session/u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "session cleared");
        assert_eq!(json["existed"], true);

        let (_, json) = send(&app, "GET", "/session/u1", None).await;
        assert!(json["session"].is_null());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _) = send(&app(), "GET", "/api/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

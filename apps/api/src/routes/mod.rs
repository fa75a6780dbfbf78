pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::conversation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/cv", post(handlers::handle_upload_resume))
        .route("/api/reset-conversacion", post(handlers::handle_reset))
        .route("/api/conversation", get(handlers::handle_get_conversation))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::conversation::intent::KeywordClassifier;
    use crate::conversation::sessions::{SessionStore, SESSION_HEADER};
    use crate::listings::ListingStore;
    use crate::llm_client::{CompletionProvider, LlmError};

    const LISTINGS: &str = "title,company,location,modality\nData Analyst,Acme,Santiago,Remote";
    const RESUME: &str = "Jane Doe. Data analyst with 5 years of SQL and Python.";

    /// Records every call and echoes the user text back.
    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingProvider {
        fn last_instructions(&self) -> String {
            self.calls
                .lock()
                .unwrap()
                .last()
                .map(|(instructions, _)| instructions.clone())
                .unwrap_or_default()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn generate(&self, instructions: &str, user_text: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((instructions.to_string(), user_text.to_string()));
            Ok(format!("echo: {user_text}"))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        async fn generate(&self, _instructions: &str, _user_text: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "upstream overloaded".to_string(),
            })
        }
    }

    fn app_with(llm: Arc<dyn CompletionProvider>) -> Router {
        build_router(AppState {
            config: Config::for_tests(),
            llm,
            classifier: Arc::new(KeywordClassifier::new().unwrap()),
            sessions: Arc::new(SessionStore::new()),
            listings: ListingStore::from_text(LISTINGS),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn post_json(
        app: &Router,
        uri: &str,
        session: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        send(app, builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn chat(app: &Router, session: Option<&str>, message: &str) -> (StatusCode, Value) {
        post_json(app, "/api/chat", session, json!({ "message": message })).await
    }

    async fn snapshot(app: &Router, session: Option<&str>) -> Value {
        let mut builder = Request::builder().uri("/api/conversation");
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        let (status, body) = send(app, builder.body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_remote_conversation_reaches_ready() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());

        let (status, body) = chat(&app, None, "I'm looking for a job").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "echo: I'm looking for a job");
        let instructions = provider.last_instructions();
        assert!(instructions.contains("- ask_area = yes"));
        assert!(instructions.contains("- ready_to_recommend = no"));
        assert!(instructions.contains("Data Analyst,Acme"));
        assert_eq!(snapshot(&app, None).await["pendingSlot"], "area");

        chat(&app, None, "data analytics").await;
        let state = snapshot(&app, None).await;
        assert_eq!(state["area"]["value"], "data analytics");
        assert_eq!(state["pendingSlot"], "modality");
        assert!(provider.last_instructions().contains("- ask_modality = yes"));

        chat(&app, None, "remote").await;
        let state = snapshot(&app, None).await;
        assert_eq!(state["modality"], "remote");
        assert_eq!(state["pendingSlot"], Value::Null);
        assert_eq!(state["flags"]["ready_to_recommend"], true);
        assert!(provider.last_instructions().contains("- ready_to_recommend = yes"));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_small_talk_withholds_listings() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());

        chat(&app, None, "hello!").await;
        let instructions = provider.last_instructions();
        assert!(!instructions.contains("Data Analyst,Acme"));
        assert!(instructions.contains("- topic_engaged = no"));

        let state = snapshot(&app, None).await;
        assert_eq!(state["topicEngaged"], false);
        assert_eq!(state["pendingSlot"], Value::Null);
    }

    #[tokio::test]
    async fn test_hybrid_then_indifferent_location() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        for message in ["busco trabajo", "ciberseguridad", "híbrido"] {
            chat(&app, None, message).await;
        }
        assert_eq!(snapshot(&app, None).await["pendingSlot"], "location");

        chat(&app, None, "me da lo mismo").await;
        let state = snapshot(&app, None).await;
        assert_eq!(state["location"]["kind"], "any");
        assert_eq!(state["pendingSlot"], Value::Null);
        assert_eq!(state["stage"]["stage"], "ready_to_recommend");
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_or_non_text_message() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());

        for body in [json!({}), json!({ "message": 42 }), json!({ "message": null })] {
            let (status, response) = post_json(&app, "/api/chat", None, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(response["error"].is_string());
        }

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from("not json"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_message_re_asks_pending_slot() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());
        chat(&app, None, "busco trabajo").await;

        let (status, body) = chat(&app, None, "   ").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].is_string());
        assert_eq!(snapshot(&app, None).await["pendingSlot"], "area");
        assert!(provider.last_instructions().contains("- ask_area = yes"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_raw_text() {
        let app = app_with(Arc::new(FailingProvider));
        let (status, body) = chat(&app, None, "hola").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "upstream overloaded");
    }

    #[tokio::test]
    async fn test_short_resume_is_rejected_and_keeps_previous() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());

        let (status, body) = post_json(&app, "/api/cv", None, json!({ "cv": RESUME })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, _) = post_json(&app, "/api/cv", None, json!({ "cv": "too short" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = post_json(&app, "/api/cv", None, json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        chat(&app, None, "what do you think of my profile?").await;
        assert!(provider.last_instructions().contains(RESUME));
    }

    #[tokio::test]
    async fn test_resume_upload_clears_preferences() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        for message in ["job", "marketing", "presencial"] {
            chat(&app, None, message).await;
        }
        assert_eq!(snapshot(&app, None).await["pendingSlot"], "location");

        post_json(&app, "/api/cv", None, json!({ "cv": RESUME })).await;
        let state = snapshot(&app, None).await;
        assert_eq!(state["hasResume"], true);
        assert_eq!(state["topicEngaged"], false);
        assert_eq!(state["area"], Value::Null);
        assert_eq!(state["modality"], Value::Null);
        assert_eq!(state["location"], Value::Null);
        assert_eq!(state["pendingSlot"], Value::Null);
    }

    #[tokio::test]
    async fn test_resume_is_truncated() {
        let provider = Arc::new(RecordingProvider::default());
        let app = app_with(provider.clone());
        let long = format!("{RESUME} {}", "z".repeat(1000));

        post_json(&app, "/api/cv", None, json!({ "cv": long })).await;
        chat(&app, None, "hola").await;

        let limit = Config::for_tests().max_resume_chars;
        let stored: String = long.chars().take(limit).collect();
        let instructions = provider.last_instructions();
        assert!(instructions.contains(&stored));
        assert!(!instructions.contains(&long));
    }

    #[tokio::test]
    async fn test_reset_keep_cv() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        post_json(&app, "/api/cv", None, json!({ "cv": RESUME })).await;
        for message in ["job", "data", "hybrid"] {
            chat(&app, None, message).await;
        }

        let (status, body) = post_json(
            &app,
            "/api/reset-conversacion",
            None,
            json!({ "keepCv": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cvPresente"], true);

        let state = snapshot(&app, None).await;
        assert_eq!(state["hasResume"], true);
        assert_eq!(state["topicEngaged"], false);
        assert_eq!(state["area"], Value::Null);
        assert_eq!(state["modality"], Value::Null);
        assert_eq!(state["pendingSlot"], Value::Null);
    }

    #[tokio::test]
    async fn test_reset_without_body_drops_cv() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        post_json(&app, "/api/cv", None, json!({ "cv": RESUME })).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/reset-conversacion")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cvPresente"], false);
        assert_eq!(snapshot(&app, None).await["hasResume"], false);
    }

    #[tokio::test]
    async fn test_malformed_reset_is_rejected_and_keeps_cv() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        post_json(&app, "/api/cv", None, json!({ "cv": RESUME })).await;

        let without_content_type = Request::builder()
            .method("POST")
            .uri("/api/reset-conversacion")
            .body(Body::from(r#"{"keepCv":true}"#))
            .unwrap();
        let (status, body) = send(&app, without_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = post_json(
            &app,
            "/api/reset-conversacion",
            None,
            json!({ "keepCv": "true" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("POST")
            .uri("/api/reset-conversacion")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(snapshot(&app, None).await["hasResume"], true);
    }

    #[tokio::test]
    async fn test_sessions_do_not_interfere() {
        let app = app_with(Arc::new(RecordingProvider::default()));

        chat(&app, Some("tab-a"), "I want a job").await;
        chat(&app, Some("tab-a"), "backend development").await;
        post_json(&app, "/api/cv", Some("tab-b"), json!({ "cv": RESUME })).await;

        let a = snapshot(&app, Some("tab-a")).await;
        assert_eq!(a["pendingSlot"], "modality");
        assert_eq!(a["hasResume"], false);

        let b = snapshot(&app, Some("tab-b")).await;
        assert_eq!(b["topicEngaged"], false);
        assert_eq!(b["hasResume"], true);

        let default = snapshot(&app, None).await;
        assert_eq!(default["topicEngaged"], false);
    }

    #[tokio::test]
    async fn test_invalid_session_header_is_rejected() {
        let app = app_with(Arc::new(RecordingProvider::default()));
        let (status, body) = chat(&app, Some("two words"), "hola").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

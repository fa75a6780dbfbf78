use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::conversation::assembler::build_system_prompt;
use crate::conversation::machine::apply_turn;
use crate::conversation::resume::normalize_resume;
use crate::conversation::sessions::SessionKey;
use crate::conversation::state::ConversationSnapshot;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeUploadRequest {
    pub cv: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default, rename = "keepCv")]
    pub keep_cv: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    #[serde(rename = "cvPresente")]
    pub cv_present: bool,
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    session: SessionKey,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let message = req
        .message
        .ok_or_else(|| AppError::Validation("Invalid message".to_string()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, session = %session.0);

    async move {
        let intent = state.classifier.classify(&message);

        // The session lock is released before the completion call.
        let system_prompt = {
            let handle = state.sessions.get_or_create(&session.0).await;
            let mut conversation = handle.lock().await;
            let outcome = apply_turn(&mut conversation, &intent);
            debug!(
                pending_at_start = ?outcome.pending_at_start,
                filled = ?outcome.filled,
                known_place = intent.known_place,
                snapshot = ?conversation.snapshot(),
                "Applied chat turn"
            );
            build_system_prompt(&conversation, &outcome.flags, &state.listings)
        };

        let reply = state.llm.generate(&system_prompt, &message).await?;
        info!("Reply generated ({} chars)", reply.chars().count());

        Ok::<_, AppError>(Json(ChatResponse { reply }))
    }
    .instrument(span)
    .await
}

/// POST /api/cv
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    session: SessionKey,
    payload: Result<Json<ResumeUploadRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(req) = payload?;
    let raw = req
        .cv
        .ok_or_else(|| AppError::Validation("Résumé is missing or too short".to_string()))?;

    let resume = normalize_resume(&raw, state.config.max_resume_chars).await?;
    let preview: String = resume.chars().take(50).collect();

    let handle = state.sessions.get_or_create(&session.0).await;
    handle.lock().await.replace_resume(resume);

    info!(session = %session.0, "Résumé received: {preview:?}");

    Ok(Json(MessageResponse {
        message: "Résumé received successfully".to_string(),
    }))
}

/// POST /api/reset-conversacion
pub async fn handle_reset(
    State(state): State<AppState>,
    session: SessionKey,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ResetResponse>, AppError> {
    let req = parse_reset_body(&headers, &body)?;

    let handle = state.sessions.get_or_create(&session.0).await;
    let cv_present = {
        let mut conversation = handle.lock().await;
        conversation.reset(req.keep_cv);
        conversation.resume.is_some()
    };

    info!(session = %session.0, keep_cv = req.keep_cv, "Conversation reset");

    Ok(Json(ResetResponse {
        message: "Conversation reset".to_string(),
        cv_present,
    }))
}

/// An empty body means "reset everything". Anything else must be a valid JSON request.
fn parse_reset_body(headers: &HeaderMap, body: &Bytes) -> Result<ResetRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResetRequest::default());
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(AppError::Validation(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    let Json(req) = Json::<ResetRequest>::from_bytes(body)?;
    Ok(req)
}

/// GET /api/conversation
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    session: SessionKey,
) -> Json<ConversationSnapshot> {
    let handle = state.sessions.get_or_create(&session.0).await;
    let snapshot = handle.lock().await.snapshot();
    Json(snapshot)
}

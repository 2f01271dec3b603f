//! `POST /chat`: direct message endpoint for workflow tools.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DEFAULT_CHAT_USER, MAX_MESSAGE_BYTES};
use crate::models::{Intent, Session};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub user_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message_id: String,
    pub response: String,
    pub input_type: Intent,
    pub session: Session,
}

pub async fn send(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    let message = req
        .message
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;
    if message.len() > MAX_MESSAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Message too long (max {MAX_MESSAGE_BYTES} bytes)"
        )));
    }
    let user_id = req
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CHAT_USER.to_string());

    let processed = ctx.dispatcher.process_message(&user_id, &message).await?;

    Ok(Json(ChatResponse {
        message_id: processed.message_id.to_string(),
        response: processed.reply_text,
        input_type: processed.intent,
        session: processed.session,
    }))
}

//! `POST /webhook`: WhatsApp Business API payload adapter.
//!
//! Only the first message of the first change of the first entry is
//! processed. Payloads without a text message (delivery receipts, media)
//! are acknowledged without touching any session.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MAX_MESSAGE_BYTES, UNKNOWN_WEBHOOK_USER};
use crate::models::Intent;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub value: WebhookValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    pub from: Option<String>,
    pub text: Option<WebhookText>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookText {
    #[serde(default)]
    pub body: String,
}

impl WebhookPayload {
    /// Sender and text of the first inbound text message, if any.
    pub fn first_message(&self) -> Option<(&str, &str)> {
        let message = self
            .entry
            .first()?
            .changes
            .first()?
            .value
            .messages
            .first()?;
        let body = message.text.as_ref().map(|t| t.body.as_str())?;
        if body.trim().is_empty() {
            return None;
        }
        let from = message
            .from
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(UNKNOWN_WEBHOOK_USER);
        Some((from, body))
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WebhookResponse {
    Replied {
        user_id: String,
        response: String,
        input_type: Intent,
    },
    Ignored {
        status: &'static str,
    },
}

pub async fn receive(
    State(ctx): State<ApiContext>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Json(payload) = payload?;

    let Some((user_id, text)) = payload.first_message() else {
        tracing::debug!("Webhook payload without a text message");
        return Ok(Json(WebhookResponse::Ignored {
            status: "no message processed",
        }));
    };
    if text.len() > MAX_MESSAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Message too long (max {MAX_MESSAGE_BYTES} bytes)"
        )));
    }

    let processed = ctx.dispatcher.process_message(user_id, text).await?;

    Ok(Json(WebhookResponse::Replied {
        user_id: user_id.to_string(),
        response: processed.reply_text,
        input_type: processed.intent,
    }))
}

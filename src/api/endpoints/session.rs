//! Session inspection endpoints.
//!
//! - `GET /session/:user_id`: read-only snapshot (`session` is null when absent)
//! - `DELETE /session/:user_id`: explicit clear

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Session;

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub session: Option<Session>,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub existed: bool,
}

pub async fn snapshot(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = ctx.dispatcher.snapshot(&user_id)?;
    Ok(Json(SessionResponse { user_id, session }))
}

pub async fn clear(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<ClearResponse>, ApiError> {
    let existed = ctx.dispatcher.clear(&user_id).await?;
    Ok(Json(ClearResponse {
        status: "session cleared",
        existed,
    }))
}

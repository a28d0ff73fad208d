//! POST /user_msg_Api: answers a message grounded on the closest verse.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;
use verse_chat::ChatAnswer;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::user_msg::{user_msg_request::UserMsgRequest, user_msg_response::UserMsgResponse},
};

/// Handler: POST /user_msg_Api
///
/// A missing or blank `message` is `400 Empty input` whatever the rest of
/// the body holds; a usable message with a malformed `history` is a 500.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/user_msg_Api \
///   -H 'content-type: application/json' \
///   -d '{"message":"What is the nature of the soul?","history":[]}'
/// ```
pub async fn user_msg(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserMsgRequest>, JsonRejection>,
) -> AppResult<Json<UserMsgResponse>> {
    let Json(body) = payload?;
    let message = body.message.as_deref().unwrap_or_default();
    if message.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }
    let history = body
        .turns()
        .map_err(|e| AppError::Internal(format!("malformed history: {e}")))?;

    let ChatAnswer {
        matched_verse,
        gemini_response,
        generated,
    } = state.chat.respond(message, &history).await?;
    info!(
        chapter = matched_verse.chapter,
        verse = matched_verse.verse,
        generated,
        "user_msg answered"
    );

    Ok(Json(UserMsgResponse {
        status: "success",
        matched_verse,
        gemini_response,
    }))
}

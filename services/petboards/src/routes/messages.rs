//! Messages posted on a board

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Message, MessageRequest, NewMessage},
    ownership::ensure_owner,
    pagination::{MessageListing, Paginated},
    routes::{current_user, parse_id},
    security::Identity,
    state::AppState,
    validation,
};

async fn ensure_board(state: &AppState, raw_board_id: &str) -> Result<Uuid, ApiError> {
    let board_id = parse_id(raw_board_id, "Board")?;
    if !state.boards.exists(board_id).await? {
        return Err(ApiError::not_found("Board not found"));
    }
    Ok(board_id)
}

async fn load_message(
    state: &AppState,
    raw_board_id: &str,
    raw_message_id: &str,
) -> Result<Message, ApiError> {
    let board_id = parse_id(raw_board_id, "Board")?;
    let message_id = parse_id(raw_message_id, "Message")?;

    state
        .messages
        .find(board_id, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))
}

/// List a board's messages in the order they were posted
pub async fn list_messages(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    paginated: Paginated<MessageListing>,
) -> Result<impl IntoResponse, ApiError> {
    let board_id = ensure_board(&state, &board_id).await?;
    let messages = state.messages.list(board_id, paginated.page).await?;
    Ok(Json(messages))
}

/// Get one message of a board
pub async fn get_message(
    State(state): State<AppState>,
    Path((board_id, message_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let message = load_message(&state, &board_id, &message_id).await?;
    Ok(Json(message))
}

/// Post a message as the caller
pub async fn post_message(
    State(state): State<AppState>,
    identity: Identity,
    Path(board_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<MessageRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let board_id = ensure_board(&state, &board_id).await?;
    let author = current_user(&state, &identity).await?;
    let text = validation::message_text(payload)?;

    let message = state
        .messages
        .create(NewMessage {
            board_id,
            author_id: author.user_id,
            text,
        })
        .await?;
    info!(
        "User {} posted message {} on board {}",
        author.username, message.message_id, board_id
    );

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/boards/{}/messages/{}", board_id, message.message_id),
        )],
        Json(json!({})),
    ))
}

/// Replace the text of a message authored by the caller
pub async fn edit_message(
    State(state): State<AppState>,
    identity: Identity,
    Path((board_id, message_id)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<MessageRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let message = load_message(&state, &board_id, &message_id).await?;
    ensure_owner(&identity, &message)?;
    let text = validation::message_text(payload)?;

    let updated = state
        .messages
        .update_text(
            message.board_id,
            message.message_id,
            message.author_id,
            text,
            Utc::now(),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(updated))
}

/// Delete a message authored by the caller
pub async fn delete_message(
    State(state): State<AppState>,
    identity: Identity,
    Path((board_id, message_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let message = load_message(&state, &board_id, &message_id).await?;
    ensure_owner(&identity, &message)?;

    let deleted = state
        .messages
        .delete(message.board_id, message.message_id, message.author_id)
        .await?;

    if deleted {
        info!("User {} deleted message {}", identity.username(), message.message_id);
        Ok(Json(json!({})))
    } else {
        Err(ApiError::not_found("Message not found"))
    }
}

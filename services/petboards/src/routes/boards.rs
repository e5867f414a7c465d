//! Boards

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::info;

use crate::{
    error::ApiError,
    models::{CreateBoardRequest, NewBoard},
    pagination::{BoardListing, Paginated},
    routes::{current_user, parse_id},
    security::Identity,
    state::AppState,
    validation,
};

/// List boards in creation order
pub async fn list_boards(
    State(state): State<AppState>,
    paginated: Paginated<BoardListing>,
) -> Result<impl IntoResponse, ApiError> {
    let boards = state.boards.list_views(paginated.page).await?;
    Ok(Json(boards))
}

/// Get a board with its creator and first message
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let board_id = parse_id(&board_id, "Board")?;

    let board = state
        .boards
        .find_view(board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Board not found"))?;

    Ok(Json(board))
}

/// Create a board owned by the caller
pub async fn create_board(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(payload), _): WithRejection<Json<CreateBoardRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let creator = current_user(&state, &identity).await?;
    let topic = validation::board_topic(payload)?;

    let board = state
        .boards
        .create(NewBoard {
            topic,
            creator_id: creator.user_id,
        })
        .await?;
    info!("User {} created board {}", creator.username, board.board_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/boards/{}", board.board_id))],
        Json(json!({})),
    ))
}

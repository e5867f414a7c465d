//! User profiles

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::ApiError,
    pagination::{Paginated, UserListing},
    routes::parse_id,
    state::AppState,
};

/// List users ordered by username
pub async fn list_users(
    State(state): State<AppState>,
    paginated: Paginated<UserListing>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list_views(paginated.page).await?;
    Ok(Json(users))
}

/// Get a user with the boards they created
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_id(&user_id, "User")?;

    let user = state
        .users
        .find_view(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}

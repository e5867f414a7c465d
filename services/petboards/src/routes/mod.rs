//! HTTP routes for the boards service

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::ApiError, middleware::auth_middleware, models::User, security::Identity,
    state::AppState,
};

pub mod auth;
pub mod boards;
pub mod messages;
pub mod users;

/// Create the router for the boards service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::get_user))
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route("/boards/:board_id", get(boards::get_board))
        .route(
            "/boards/:board_id/messages",
            get(messages::list_messages).post(messages::post_message),
        )
        .route(
            "/boards/:board_id/messages/:message_id",
            get(messages::get_message)
                .patch(messages::edit_message)
                .delete(messages::delete_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "petboards"
    }))
}

/// Parse a path identifier; a malformed id is reported like an unknown one
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{what} not found")))
}

/// Load the user behind a validated token
pub(crate) async fn current_user(state: &AppState, identity: &Identity) -> Result<User, ApiError> {
    state
        .users
        .find_by_username(identity.username())
        .await?
        .ok_or_else(|| {
            warn!(
                username = identity.username(),
                "Token refers to an unknown user"
            );
            ApiError::Unauthorized
        })
}

//! Registration and login

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::ApiError,
    models::{LoginRequest, NewUser, RegisterRequest, Registration, TokenResponse},
    state::AppState,
    validation,
};

const USERNAME_TAKEN: &str = "The username is already taken";
const INVALID_LOGIN: &str = "Invalid login or password";

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let form = validation::registration(payload)?;
    info!("Registration attempt for user: {}", form.username);

    if state.users.find_by_username(&form.username).await?.is_some() {
        return Ok(username_taken());
    }

    let hasher = state.hasher.clone();
    let password = form.password;
    let credential = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            error!("Password hashing task failed: {}", e);
            ApiError::InternalServerError
        })?
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    let registration = state
        .users
        .create(NewUser {
            username: form.username,
            password: credential,
            first_name: form.first_name,
            last_name: form.last_name,
        })
        .await?;

    match registration {
        Registration::Created(user) => {
            info!("Registered user {} ({})", user.username, user.user_id);
            Ok((StatusCode::CREATED, Json(json!({}))))
        }
        Registration::UsernameTaken => Ok(username_taken()),
    }
}

fn username_taken() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "error": USERNAME_TAKEN })))
}

/// Exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let form = validation::login(payload)?;
    info!("Login attempt for user: {}", form.username);

    let user = state
        .users
        .find_by_username(&form.username)
        .await?
        .ok_or_else(|| ApiError::not_found(INVALID_LOGIN))?;

    let hasher = state.hasher.clone();
    let password = form.password;
    let credential = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &credential))
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            ApiError::InternalServerError
        })?;

    if !verified {
        info!("Rejected login for user: {}", user.username);
        return Err(ApiError::not_found(INVALID_LOGIN));
    }

    state.users.record_login(user.user_id, Utc::now()).await?;

    let token = state.token_service.issue(&user.username).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, format!("/users/{}", user.user_id))],
        Json(TokenResponse { token }),
    ))
}

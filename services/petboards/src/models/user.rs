//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::board::BoardSummary;
use crate::security::Credential;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub password: Credential,
    pub first_name: String,
    pub last_name: String,
    pub registered: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: Credential,
    pub first_name: String,
    pub last_name: String,
}

/// Outcome of storing a new user
#[derive(Debug, Clone)]
pub enum Registration {
    Created(User),
    UsernameTaken,
}

/// Public user fields, without the boards they created
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub registered: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            user_id: user.user_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            registered: user.registered,
            last_login: user.last_login,
        }
    }
}

/// User as returned by the users endpoints
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: UserSummary,
    pub boards: Vec<BoardSummary>,
}

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

//! Board model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{message::MessageSummary, user::UserSummary};

/// Board entity
#[derive(Debug, Clone)]
pub struct Board {
    pub board_id: Uuid,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub creator_id: Uuid,
}

/// New board creation payload
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub topic: String,
    pub creator_id: Uuid,
}

/// Board with its creator and opening message
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub board_id: Uuid,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub created_by: UserSummary,
    pub first_message: Option<MessageSummary>,
}

/// Board as listed inside a user profile
#[derive(Debug, Clone, Serialize)]
pub struct BoardSummary {
    pub board_id: Uuid,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub first_message: Option<MessageSummary>,
}

/// Request for board creation
#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub topic: Option<String>,
}

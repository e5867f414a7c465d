//! Message model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message entity, joined with its author's username
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message_id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    #[serde(skip_serializing)]
    pub author_username: String,
    pub board_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

/// New message creation payload
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub board_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}

/// Message as embedded in board and user views
#[derive(Debug, Clone, Serialize)]
pub struct MessageSummary {
    pub message_id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl From<&Message> for MessageSummary {
    fn from(message: &Message) -> Self {
        MessageSummary {
            message_id: message.message_id,
            text: message.text.clone(),
            author_id: message.author_id,
            timestamp: message.timestamp,
            last_edited: message.last_edited,
        }
    }
}

/// Request for posting or editing a message
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: Option<String>,
}

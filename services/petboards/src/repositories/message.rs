//! Message repository backed by PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    error::{DatabaseError, DatabaseResult},
    pagination::PageRequest,
};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::{Message, NewMessage};
use crate::repositories::MessageRepository;

/// Message columns joined with the author's username, read from a source named `m`
const MESSAGE_COLUMNS: &str = r#"
    m.message_id, m.text, m.author_id, u.username AS author_username,
    m.board_id, m.posted_at, m.last_edited
"#;

#[derive(FromRow)]
struct MessageRow {
    message_id: Uuid,
    text: String,
    author_id: Uuid,
    author_username: String,
    board_id: Uuid,
    posted_at: DateTime<Utc>,
    last_edited: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            message_id: row.message_id,
            text: row.text,
            author_id: row.author_id,
            author_username: row.author_username,
            board_id: row.board_id,
            timestamp: row.posted_at,
            last_edited: row.last_edited,
        }
    }
}

/// Message repository for database operations
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new message repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, new_message: NewMessage) -> DatabaseResult<Message> {
        info!(
            "Posting message to board {} by {}",
            new_message.board_id, new_message.author_id
        );

        let sql = format!(
            "WITH m AS ( \
                 INSERT INTO messages (message_id, text, posted_at, last_edited, author_id, board_id) \
                 VALUES ($1, $2, $3, $3, $4, $5) \
                 RETURNING * \
             ) \
             SELECT {MESSAGE_COLUMNS} FROM m JOIN users u ON u.user_id = m.author_id"
        );

        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_message.text)
            .bind(Utc::now())
            .bind(new_message.author_id)
            .bind(new_message.board_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.into())
    }

    async fn find(&self, board_id: Uuid, message_id: Uuid) -> DatabaseResult<Option<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN users u ON u.user_id = m.author_id \
             WHERE m.board_id = $1 AND m.message_id = $2"
        );

        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(board_id)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.map(Message::from))
    }

    async fn list(&self, board_id: Uuid, page: PageRequest) -> DatabaseResult<Vec<Message>> {
        let (limit, offset) = page.limit_offset();
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN users u ON u.user_id = m.author_id \
             WHERE m.board_id = $1 \
             ORDER BY m.seq \
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(board_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn update_text(
        &self,
        board_id: Uuid,
        message_id: Uuid,
        author_id: Uuid,
        text: String,
        edited_at: DateTime<Utc>,
    ) -> DatabaseResult<Option<Message>> {
        info!("Editing message {} on board {}", message_id, board_id);

        let sql = format!(
            "WITH m AS ( \
                 UPDATE messages SET text = $4, last_edited = $5 \
                 WHERE board_id = $1 AND message_id = $2 AND author_id = $3 \
                 RETURNING * \
             ) \
             SELECT {MESSAGE_COLUMNS} FROM m JOIN users u ON u.user_id = m.author_id"
        );

        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(board_id)
            .bind(message_id)
            .bind(author_id)
            .bind(&text)
            .bind(edited_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.map(Message::from))
    }

    async fn delete(
        &self,
        board_id: Uuid,
        message_id: Uuid,
        author_id: Uuid,
    ) -> DatabaseResult<bool> {
        info!("Deleting message {} on board {}", message_id, board_id);

        let result = sqlx::query(
            "DELETE FROM messages WHERE board_id = $1 AND message_id = $2 AND author_id = $3",
        )
        .bind(board_id)
        .bind(message_id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

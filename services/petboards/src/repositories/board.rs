//! Board repository backed by PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    error::{DatabaseError, DatabaseResult},
    pagination::PageRequest,
};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::{Board, BoardView, MessageSummary, NewBoard, UserSummary};
use crate::repositories::BoardRepository;

/// Lateral join yielding the earliest message of board `b`
pub(crate) const FIRST_MESSAGE_JOIN: &str = r#"
    LEFT JOIN LATERAL (
        SELECT message_id AS first_message_id,
               text AS first_message_text,
               author_id AS first_message_author_id,
               posted_at AS first_message_posted_at,
               last_edited AS first_message_last_edited
        FROM messages
        WHERE messages.board_id = b.board_id
        ORDER BY seq
        LIMIT 1
    ) m ON TRUE
"#;

const BOARD_VIEW_SELECT: &str = r#"
    SELECT b.board_id, b.topic, b.created_at,
           u.user_id, u.username, u.first_name, u.last_name, u.registered, u.last_login,
           m.first_message_id, m.first_message_text, m.first_message_author_id,
           m.first_message_posted_at, m.first_message_last_edited
    FROM boards b
    JOIN users u ON u.user_id = b.creator_id
"#;

/// Columns produced by [`FIRST_MESSAGE_JOIN`]
#[derive(FromRow)]
pub(crate) struct FirstMessageColumns {
    first_message_id: Option<Uuid>,
    first_message_text: Option<String>,
    first_message_author_id: Option<Uuid>,
    first_message_posted_at: Option<DateTime<Utc>>,
    first_message_last_edited: Option<DateTime<Utc>>,
}

impl FirstMessageColumns {
    pub(crate) fn into_summary(self) -> Option<MessageSummary> {
        Some(MessageSummary {
            message_id: self.first_message_id?,
            text: self.first_message_text?,
            author_id: self.first_message_author_id?,
            timestamp: self.first_message_posted_at?,
            last_edited: self.first_message_last_edited?,
        })
    }
}

#[derive(FromRow)]
struct BoardRow {
    board_id: Uuid,
    topic: String,
    created_at: DateTime<Utc>,
    creator_id: Uuid,
}

#[derive(FromRow)]
struct BoardViewRow {
    board_id: Uuid,
    topic: String,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    registered: DateTime<Utc>,
    last_login: DateTime<Utc>,
    #[sqlx(flatten)]
    first_message: FirstMessageColumns,
}

impl From<BoardViewRow> for BoardView {
    fn from(row: BoardViewRow) -> Self {
        BoardView {
            board_id: row.board_id,
            topic: row.topic,
            created_at: row.created_at,
            created_by: UserSummary {
                user_id: row.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                registered: row.registered,
                last_login: row.last_login,
            },
            first_message: row.first_message.into_summary(),
        }
    }
}

/// Board repository for database operations
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    /// Create a new board repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    async fn create(&self, new_board: NewBoard) -> DatabaseResult<Board> {
        info!("Creating board for user: {}", new_board.creator_id);

        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            INSERT INTO boards (board_id, topic, created_at, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING board_id, topic, created_at, creator_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_board.topic)
        .bind(Utc::now())
        .bind(new_board.creator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(Board {
            board_id: row.board_id,
            topic: row.topic,
            created_at: row.created_at,
            creator_id: row.creator_id,
        })
    }

    async fn exists(&self, board_id: Uuid) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM boards WHERE board_id = $1)")
            .bind(board_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_view(&self, board_id: Uuid) -> DatabaseResult<Option<BoardView>> {
        let sql = format!("{BOARD_VIEW_SELECT} {FIRST_MESSAGE_JOIN} WHERE b.board_id = $1");

        let row = sqlx::query_as::<_, BoardViewRow>(&sql)
            .bind(board_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(row.map(BoardView::from))
    }

    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<BoardView>> {
        let (limit, offset) = page.limit_offset();
        let sql = format!(
            "{BOARD_VIEW_SELECT} {FIRST_MESSAGE_JOIN} \
             ORDER BY b.created_at, b.board_id LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, BoardViewRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.into_iter().map(BoardView::from).collect())
    }
}

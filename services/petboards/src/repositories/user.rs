//! User repository backed by PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    error::{DatabaseError, DatabaseResult},
    pagination::PageRequest,
};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::models::{BoardSummary, NewUser, Registration, User, UserSummary, UserView};
use crate::repositories::{UserRepository, board::FIRST_MESSAGE_JOIN, board::FirstMessageColumns};
use crate::security::Credential;

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    registered: DateTime<Utc>,
    last_login: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            username: row.username,
            password: Credential::from_stored(row.password),
            first_name: row.first_name,
            last_name: row.last_name,
            registered: row.registered,
            last_login: row.last_login,
        }
    }
}

#[derive(FromRow)]
struct BoardSummaryRow {
    board_id: Uuid,
    topic: String,
    created_at: DateTime<Utc>,
    creator_id: Uuid,
    #[sqlx(flatten)]
    first_message: FirstMessageColumns,
}

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Boards created by each of `user_ids`, oldest first
    async fn boards_by_creator(
        &self,
        user_ids: &[Uuid],
    ) -> DatabaseResult<HashMap<Uuid, Vec<BoardSummary>>> {
        let sql = format!(
            "SELECT b.board_id, b.topic, b.created_at, b.creator_id, \
                    m.first_message_id, m.first_message_text, m.first_message_author_id, \
                    m.first_message_posted_at, m.first_message_last_edited \
             FROM boards b {FIRST_MESSAGE_JOIN} \
             WHERE b.creator_id = ANY($1) \
             ORDER BY b.created_at, b.board_id"
        );

        let rows = sqlx::query_as::<_, BoardSummaryRow>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        let mut boards: HashMap<Uuid, Vec<BoardSummary>> = HashMap::new();
        for row in rows {
            boards.entry(row.creator_id).or_default().push(BoardSummary {
                board_id: row.board_id,
                topic: row.topic,
                created_at: row.created_at,
                first_message: row.first_message.into_summary(),
            });
        }

        Ok(boards)
    }

    async fn with_boards(&self, users: Vec<User>) -> DatabaseResult<Vec<UserView>> {
        let ids: Vec<Uuid> = users.iter().map(|user| user.user_id).collect();
        let mut boards = self.boards_by_creator(&ids).await?;

        Ok(users
            .iter()
            .map(|user| UserView {
                user: UserSummary::from(user),
                boards: boards.remove(&user.user_id).unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<Registration> {
        info!("Creating new user: {}", new_user.username);

        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (user_id, username, password, first_name, last_name, registered, last_login)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (username) DO NOTHING
            RETURNING user_id, username, password, first_name, last_name, registered, last_login
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(new_user.password.as_str())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(match row {
            Some(row) => Registration::Created(row.into()),
            None => Registration::UsernameTaken,
        })
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, password, first_name, last_name, registered, last_login
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.map(User::from))
    }

    async fn find_view(&self, user_id: Uuid) -> DatabaseResult<Option<UserView>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, password, first_name, last_name, registered, last_login
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        match row {
            Some(row) => Ok(self.with_boards(vec![row.into()]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<UserView>> {
        let (limit, offset) = page.limit_offset();

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, password, first_name, last_name, registered, last_login
            FROM users
            ORDER BY username COLLATE "C"
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        self.with_boards(rows.into_iter().map(User::from).collect())
            .await
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> DatabaseResult<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE user_id = $2")
            .bind(at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }
}

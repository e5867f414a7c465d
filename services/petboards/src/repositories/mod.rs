//! Repositories for database operations
//!
//! Each trait returns plain data aggregates. Handlers never follow lazy
//! associations; anything a response needs is fetched by an explicit lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    error::{DatabaseError, DatabaseResult},
    pagination::PageRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Board, BoardView, Message, NewBoard, NewMessage, NewUser, Registration, User, UserView,
};

pub mod board;
pub mod memory;
pub mod message;
pub mod user;

pub use board::PgBoardRepository;
pub use memory::InMemoryStore;
pub use message::PgMessageRepository;
pub use user::PgUserRepository;

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseError::Migration)
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user unless the username is already taken
    async fn create(&self, new_user: NewUser) -> DatabaseResult<Registration>;

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    async fn find_view(&self, user_id: Uuid) -> DatabaseResult<Option<UserView>>;

    /// Users ordered by username, compared bytewise
    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<UserView>>;

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> DatabaseResult<()>;
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn create(&self, new_board: NewBoard) -> DatabaseResult<Board>;

    async fn exists(&self, board_id: Uuid) -> DatabaseResult<bool>;

    async fn find_view(&self, board_id: Uuid) -> DatabaseResult<Option<BoardView>>;

    /// Boards ordered by creation time
    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<BoardView>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, new_message: NewMessage) -> DatabaseResult<Message>;

    async fn find(&self, board_id: Uuid, message_id: Uuid) -> DatabaseResult<Option<Message>>;

    /// Messages of one board in insertion order
    async fn list(&self, board_id: Uuid, page: PageRequest) -> DatabaseResult<Vec<Message>>;

    /// Replace the text of a message still authored by `author_id`.
    ///
    /// Returns `None` when no such message exists any more.
    async fn update_text(
        &self,
        board_id: Uuid,
        message_id: Uuid,
        author_id: Uuid,
        text: String,
        edited_at: DateTime<Utc>,
    ) -> DatabaseResult<Option<Message>>;

    /// Delete a message still authored by `author_id`
    async fn delete(&self, board_id: Uuid, message_id: Uuid, author_id: Uuid)
    -> DatabaseResult<bool>;
}

//! Process-local store implementing every repository trait
//!
//! Used by the router tests and for running the service without PostgreSQL.
//! Ordering mirrors the SQL repositories: users by username, boards by
//! creation, messages by insertion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{error::DatabaseResult, pagination::PageRequest};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Board, BoardSummary, BoardView, Message, MessageSummary, NewBoard, NewMessage, NewUser,
    Registration, User, UserSummary, UserView,
};
use crate::repositories::{BoardRepository, MessageRepository, UserRepository};

#[derive(Default)]
struct Tables {
    /// Keyed by username
    users: BTreeMap<String, User>,
    boards: Vec<Board>,
    messages: Vec<Message>,
}

impl Tables {
    fn user_by_id(&self, user_id: Uuid) -> Option<&User> {
        self.users.values().find(|user| user.user_id == user_id)
    }

    fn first_message(&self, board_id: Uuid) -> Option<MessageSummary> {
        self.messages
            .iter()
            .find(|message| message.board_id == board_id)
            .map(MessageSummary::from)
    }

    fn board_view(&self, board: &Board) -> Option<BoardView> {
        let creator = self.user_by_id(board.creator_id)?;
        Some(BoardView {
            board_id: board.board_id,
            topic: board.topic.clone(),
            created_at: board.created_at,
            created_by: UserSummary::from(creator),
            first_message: self.first_message(board.board_id),
        })
    }

    fn user_view(&self, user: &User) -> UserView {
        let boards = self
            .boards
            .iter()
            .filter(|board| board.creator_id == user.user_id)
            .map(|board| BoardSummary {
                board_id: board.board_id,
                topic: board.topic.clone(),
                created_at: board.created_at,
                first_message: self.first_message(board.board_id),
            })
            .collect();

        UserView {
            user: UserSummary::from(user),
            boards,
        }
    }
}

/// In-memory store shared by clones
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<Registration> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&new_user.username) {
            return Ok(Registration::UsernameTaken);
        }

        let now = Utc::now();
        let user = User {
            user_id: Uuid::new_v4(),
            username: new_user.username,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            registered: now,
            last_login: now,
        };
        tables.users.insert(user.username.clone(), user.clone());

        Ok(Registration::Created(user))
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }

    async fn find_view(&self, user_id: Uuid) -> DatabaseResult<Option<UserView>> {
        let tables = self.tables.read().await;
        Ok(tables.user_by_id(user_id).map(|user| tables.user_view(user)))
    }

    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<UserView>> {
        let tables = self.tables.read().await;
        let users: Vec<&User> = tables.users.values().collect();

        Ok(page
            .window(&users)
            .iter()
            .map(|user| tables.user_view(user))
            .collect())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> DatabaseResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.values_mut().find(|user| user.user_id == user_id) {
            user.last_login = at;
        }
        Ok(())
    }
}

#[async_trait]
impl BoardRepository for InMemoryStore {
    async fn create(&self, new_board: NewBoard) -> DatabaseResult<Board> {
        let board = Board {
            board_id: Uuid::new_v4(),
            topic: new_board.topic,
            created_at: Utc::now(),
            creator_id: new_board.creator_id,
        };
        self.tables.write().await.boards.push(board.clone());

        Ok(board)
    }

    async fn exists(&self, board_id: Uuid) -> DatabaseResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.boards.iter().any(|board| board.board_id == board_id))
    }

    async fn find_view(&self, board_id: Uuid) -> DatabaseResult<Option<BoardView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .boards
            .iter()
            .find(|board| board.board_id == board_id)
            .and_then(|board| tables.board_view(board)))
    }

    async fn list_views(&self, page: PageRequest) -> DatabaseResult<Vec<BoardView>> {
        let tables = self.tables.read().await;
        Ok(page
            .window(&tables.boards)
            .iter()
            .filter_map(|board| tables.board_view(board))
            .collect())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create(&self, new_message: NewMessage) -> DatabaseResult<Message> {
        let mut tables = self.tables.write().await;
        let author_username = tables
            .user_by_id(new_message.author_id)
            .map(|user| user.username.clone())
            .unwrap_or_default();

        let now = Utc::now();
        let message = Message {
            message_id: Uuid::new_v4(),
            text: new_message.text,
            author_id: new_message.author_id,
            author_username,
            board_id: new_message.board_id,
            timestamp: now,
            last_edited: now,
        };
        tables.messages.push(message.clone());

        Ok(message)
    }

    async fn find(&self, board_id: Uuid, message_id: Uuid) -> DatabaseResult<Option<Message>> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .find(|message| message.board_id == board_id && message.message_id == message_id)
            .cloned())
    }

    async fn list(&self, board_id: Uuid, page: PageRequest) -> DatabaseResult<Vec<Message>> {
        let tables = self.tables.read().await;
        let messages: Vec<&Message> = tables
            .messages
            .iter()
            .filter(|message| message.board_id == board_id)
            .collect();

        Ok(page
            .window(&messages)
            .iter()
            .map(|message| (*message).clone())
            .collect())
    }

    async fn update_text(
        &self,
        board_id: Uuid,
        message_id: Uuid,
        author_id: Uuid,
        text: String,
        edited_at: DateTime<Utc>,
    ) -> DatabaseResult<Option<Message>> {
        let mut tables = self.tables.write().await;
        let Some(message) = tables.messages.iter_mut().find(|message| {
            message.board_id == board_id
                && message.message_id == message_id
                && message.author_id == author_id
        }) else {
            return Ok(None);
        };

        message.text = text;
        message.last_edited = edited_at;
        Ok(Some(message.clone()))
    }

    async fn delete(
        &self,
        board_id: Uuid,
        message_id: Uuid,
        author_id: Uuid,
    ) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.messages.len();
        tables.messages.retain(|message| {
            !(message.board_id == board_id
                && message.message_id == message_id
                && message.author_id == author_id)
        });

        Ok(tables.messages.len() < before)
    }
}

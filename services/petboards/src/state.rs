//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    repositories::{
        BoardRepository, InMemoryStore, MessageRepository, PgBoardRepository,
        PgMessageRepository, PgUserRepository, UserRepository,
    },
    security::{CredentialHasher, TokenService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub token_service: TokenService,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        boards: Arc<dyn BoardRepository>,
        messages: Arc<dyn MessageRepository>,
        token_service: TokenService,
    ) -> Self {
        Self {
            users,
            boards,
            messages,
            token_service,
            hasher: CredentialHasher::new(),
        }
    }

    /// State backed by PostgreSQL repositories sharing one pool
    pub fn with_postgres(pool: PgPool, token_service: TokenService) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgBoardRepository::new(pool.clone())),
            Arc::new(PgMessageRepository::new(pool)),
            token_service,
        )
    }

    /// State backed by a fresh [`InMemoryStore`]
    pub fn in_memory(token_service: TokenService) -> Self {
        let store = InMemoryStore::new();
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            token_service,
        )
    }
}

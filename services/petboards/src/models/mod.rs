//! API models for stored entities and request/response payloads

pub mod board;
pub mod message;
pub mod user;

// Re-export for convenience
pub use board::{Board, BoardSummary, BoardView, CreateBoardRequest, NewBoard};
pub use message::{Message, MessageRequest, MessageSummary, NewMessage};
pub use user::{
    LoginRequest, NewUser, RegisterRequest, Registration, TokenResponse, User, UserSummary,
    UserView,
};

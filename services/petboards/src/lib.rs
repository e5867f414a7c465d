//! Message boards service
//!
//! Users register and log in for a bearer token, then create topic boards
//! and post messages on them. Only a message's author may edit or delete it.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod pagination;
pub mod repositories;
pub mod routes;
pub mod security;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;

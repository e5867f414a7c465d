//! Author checks for message mutation

use tracing::warn;

use crate::{error::ApiError, models::Message, security::Identity};

/// A resource with a recorded author
pub trait Owned {
    /// Username of the author
    fn owner(&self) -> &str;
}

impl Owned for Message {
    fn owner(&self) -> &str {
        &self.author_username
    }
}

/// Allow the request to proceed only when `identity` authored `resource`
pub fn ensure_owner<R: Owned>(identity: &Identity, resource: &R) -> Result<(), ApiError> {
    if resource.owner() == identity.username() {
        return Ok(());
    }

    warn!(
        caller = identity.username(),
        owner = resource.owner(),
        "Rejected mutation by non-owner"
    );
    Err(ApiError::Forbidden)
}

//! Credential hashing and bearer tokens

pub mod password;
pub mod token;

pub use password::{Credential, CredentialHasher};
pub use token::{Identity, SigningSecret, TokenError, TokenService};

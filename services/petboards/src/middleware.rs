//! Authentication middleware for bearer token validation

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{
    error::ApiError,
    security::{Identity, TokenService},
    state::AppState,
};

/// Resolve the caller's identity from an optional bearer token.
///
/// Every failure collapses into [`ApiError::Unauthorized`].
pub fn authenticate(tokens: &TokenService, bearer: Option<&str>) -> Result<Identity, ApiError> {
    let token = bearer.ok_or(ApiError::Unauthorized)?;
    tokens.validate(token).ok_or(ApiError::Unauthorized)
}

/// Authentication middleware
///
/// Rejects the request unless it carries a valid `Authorization: Bearer`
/// token, and stores the resolved [`Identity`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());

    let identity = authenticate(&state.token_service, token).inspect_err(|_| {
        debug!(path = %req.uri().path(), "Rejected unauthenticated request");
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

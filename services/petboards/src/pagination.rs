//! Per-resource pagination extractor
//!
//! Listing handlers take a `Paginated<L>` argument; axum runs the extractor
//! before the handler body, so an out-of-range request is rejected before any
//! repository is touched.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use common::pagination::{PageParams, PageRequest};
use std::{fmt, marker::PhantomData};

use crate::error::ApiError;

/// Maximum page size of a listable resource
pub trait PageLimit {
    const MAX_ELEMENTS: u32;
}

/// `GET /users`
pub struct UserListing;

/// `GET /boards`
pub struct BoardListing;

/// `GET /boards/{board_id}/messages`
pub struct MessageListing;

impl PageLimit for UserListing {
    const MAX_ELEMENTS: u32 = 50;
}

impl PageLimit for BoardListing {
    const MAX_ELEMENTS: u32 = 30;
}

impl PageLimit for MessageListing {
    const MAX_ELEMENTS: u32 = 50;
}

/// Validated `page`/`elements` query parameters for resource `L`
pub struct Paginated<L> {
    pub page: PageRequest,
    _limit: PhantomData<fn() -> L>,
}

impl<L> fmt::Debug for Paginated<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated").field("page", &self.page).finish()
    }
}

impl<L: PageLimit> Paginated<L> {
    pub fn from_params(params: &PageParams) -> Result<Self, ApiError> {
        let page = PageRequest::from_params(params, L::MAX_ELEMENTS)?;
        Ok(Self {
            page,
            _limit: PhantomData,
        })
    }
}

#[async_trait]
impl<S, L> FromRequestParts<S> for Paginated<L>
where
    S: Send + Sync,
    L: PageLimit,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(None, rejection.body_text()))?;

        Self::from_params(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: &str, elements: &str) -> PageParams {
        PageParams {
            page: Some(page.to_string()),
            elements: Some(elements.to_string()),
        }
    }

    #[test]
    fn test_limits_differ_per_resource() {
        assert!(Paginated::<UserListing>::from_params(&params("0", "50")).is_ok());
        assert!(Paginated::<UserListing>::from_params(&params("0", "51")).is_err());

        assert!(Paginated::<BoardListing>::from_params(&params("0", "30")).is_ok());
        assert!(Paginated::<BoardListing>::from_params(&params("0", "31")).is_err());

        assert!(Paginated::<MessageListing>::from_params(&params("0", "50")).is_ok());
        assert!(Paginated::<MessageListing>::from_params(&params("0", "51")).is_err());
    }

    #[test]
    fn test_rejection_names_field() {
        let err = Paginated::<BoardListing>::from_params(&params("-1", "10")).unwrap_err();
        match err {
            ApiError::BadRequest { field, .. } => assert_eq!(field, Some("page")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

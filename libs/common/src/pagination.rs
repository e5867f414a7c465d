//! Pagination primitives shared by every list endpoint
//!
//! A [`PageRequest`] is only ever constructed through validation against a
//! resource-specific maximum page size, so holding one means the `page` and
//! `elements` bounds have already been checked.

use serde::Deserialize;
use thiserror::Error;

/// Raw `page`/`elements` query parameters, before validation.
///
/// Both are kept as strings so that a missing value, a non-integer value and
/// an out-of-range value can each be reported against the offending field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub elements: Option<String>,
}

/// Reasons a pagination request is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("The `{0}` parameter is required")]
    Missing(&'static str),

    #[error("The `{0}` parameter must be an integer")]
    NotAnInteger(&'static str),

    #[error("The page index cannot be negative")]
    NegativePage,

    #[error("The number of elements per page cannot be negative")]
    NegativeElements,

    #[error("The maximum number of elements per page is {max}")]
    TooManyElements { max: u32 },
}

impl PaginationError {
    /// Name of the query parameter the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            PaginationError::Missing(field) | PaginationError::NotAnInteger(field) => field,
            PaginationError::NegativePage => "page",
            PaginationError::NegativeElements | PaginationError::TooManyElements { .. } => {
                "elements"
            }
        }
    }
}

/// A validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    elements: u32,
}

impl PageRequest {
    /// Validate already-parsed values against `max_elements`
    pub fn new(page: i64, elements: i64, max_elements: u32) -> Result<Self, PaginationError> {
        let page = u64::try_from(page).map_err(|_| PaginationError::NegativePage)?;

        let elements = u32::try_from(elements).map_err(|_| {
            if elements < 0 {
                PaginationError::NegativeElements
            } else {
                PaginationError::TooManyElements { max: max_elements }
            }
        })?;

        if elements > max_elements {
            return Err(PaginationError::TooManyElements { max: max_elements });
        }

        Ok(Self { page, elements })
    }

    /// Parse and validate raw query parameters against `max_elements`
    pub fn from_params(params: &PageParams, max_elements: u32) -> Result<Self, PaginationError> {
        let page = parse_param("page", params.page.as_deref())?;
        let elements = parse_param("elements", params.elements.as_deref())?;

        Self::new(page, elements, max_elements)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn elements(&self) -> u32 {
        self.elements
    }

    /// Number of records skipped before this page starts
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(u64::from(self.elements))
    }

    /// `(limit, offset)` as SQL bind values
    pub fn limit_offset(&self) -> (i64, i64) {
        let offset = i64::try_from(self.offset()).unwrap_or(i64::MAX);
        (i64::from(self.elements), offset)
    }

    /// Slice of `items` covered by this page. Empty once the offset runs
    /// past the end of the collection.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        if start >= items.len() {
            return &[];
        }

        let end = start
            .saturating_add(self.elements as usize)
            .min(items.len());
        &items[start..end]
    }
}

fn parse_param(field: &'static str, raw: Option<&str>) -> Result<i64, PaginationError> {
    let raw = raw.ok_or(PaginationError::Missing(field))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PaginationError::NotAnInteger(field))
}

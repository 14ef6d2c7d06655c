//! Pagination envelopes returned by list endpoints.
//!
//! List endpoints answer with `{ "data": [...], "metadata": {...} }`;
//! detail endpoints with `{ "data": {...} }`.

use serde::{Deserialize, Deserializer, Serialize};

/// Default number of rows per page used by the list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination descriptor sent alongside list data.
///
/// `total_count` and `total_pages` are only reported by the online
/// transactions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl PageMetadata {
    /// Whether a previous page can be requested.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Whether a next page can be requested, given how many rows came back.
    ///
    /// A short page always ends the listing. When the backend reports
    /// `total_pages`, the current page must also be below it.
    #[must_use]
    pub fn has_next(&self, items_on_page: usize) -> bool {
        let full_page = usize::try_from(self.page_size).is_ok_and(|size| items_on_page >= size);
        let below_total = self
            .total_pages
            .is_none_or(|total| self.page_number < total);
        full_page && below_total
    }
}

/// A page of list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Page<T> {
    /// Whether a next page can be requested for this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.metadata.has_next(self.data.len())
    }
}

/// `data: null` is how the backend reports an empty result set.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope of a single-record response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

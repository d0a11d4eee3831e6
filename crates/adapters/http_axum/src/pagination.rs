//! `?limit=&offset=` pagination for list endpoints.

use serde::{Deserialize, Serialize};

use pawhub_app::ports::{PageRequest, Paged};

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 500;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A page of results together with the total number of matches.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

impl Pagination {
    /// The window to fetch from storage, with the limit capped.
    #[must_use]
    pub fn request(self) -> PageRequest {
        PageRequest {
            limit: self
                .limit
                .unwrap_or(PageRequest::DEFAULT_LIMIT)
                .min(MAX_LIMIT),
            offset: self.offset.unwrap_or(0),
        }
    }
}

impl<T> From<Paged<T>> for Page<T> {
    fn from(paged: Paged<T>) -> Self {
        Self {
            count: paged.count,
            results: paged.items,
        }
    }
}

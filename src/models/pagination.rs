//! Pagination query and list envelope shared across all list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters sent with every list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    /// Maximum items per page accepted by the backend.
    const MAX_PER_PAGE: u32 = 100;

    /// Highest page number accepted by the backend.
    const MAX_PAGE: u32 = 1000;

    /// Default items per page.
    const DEFAULT_PER_PAGE: u32 = 20;

    pub fn with_page_size(per_page: u32) -> Self {
        Self {
            page: None,
            per_page: Some(per_page),
        }
    }

    pub fn limit(&self) -> u32 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1).clamp(1, Self::MAX_PAGE)
    }

    /// Query-string pairs in the order the backend documents them.
    pub fn pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.current_page().to_string()),
            ("per_page", self.limit().to_string()),
        ]
    }
}

/// Page metadata attached to list responses. Absent fields decode as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// `{ data, meta }` envelope returned by list endpoints.
///
/// A missing or `null` `data` field decodes as an empty collection.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Option::default")]
    data: Option<Vec<T>>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> DataEnvelope<T> {
    pub fn into_records(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

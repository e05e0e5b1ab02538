//! Query parameters and pagination utilities

use crate::config::QueryConfig;
use serde::{Deserialize, Serialize};

/// Upper bound on page size when no configuration says otherwise
pub const MAX_PAGE_SIZE: usize = 20;

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort key used when the client does not ask for one
pub const DEFAULT_ORDER_BY: &str = "Id";

/// Query parameters for searching, sorting, paging and shaping a resource
///
/// This structure is extracted from URL query strings. All parameters have
/// defaults, and values are clamped by [`normalized`](Self::normalized)
/// before the pipeline uses them.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_coins(
///     Query(params): Query<ResourceQueryParameters>,
/// ) -> Result<PagedJson, ShelfError> {
///     // params.page defaults to 1
///     // params.page_size() falls back to the configured default once normalized
/// }
///
/// // Usage:
/// GET /coins?page=2&pageSize=5
/// GET /coins?search=pesos&orderBy=Country,Year desc&fields=Id,Type
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceQueryParameters {
    /// Free-text search term
    pub search: Option<String>,

    /// Comma-separated sort keys, each optionally followed by `asc`/`desc`
    ///
    /// # Example
    /// ```text
    /// orderBy=Name
    /// orderBy=Country, Year desc
    /// ```
    pub order_by: Option<String>,

    /// Comma-separated field names to return (all fields when absent)
    pub fields: Option<String>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page (configured default when absent)
    pub page_size: Option<usize>,
}

impl Default for ResourceQueryParameters {
    fn default() -> Self {
        Self {
            search: None,
            order_by: None,
            fields: None,
            page: 1,
            page_size: None,
        }
    }
}

impl ResourceQueryParameters {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = Some(page_size);
        self
    }

    /// Search term, or `None` when absent or blank
    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Sort expression, or `None` when absent or blank
    pub fn order_by(&self) -> Option<&str> {
        non_blank(self.order_by.as_deref())
    }

    /// Field selection, or `None` when absent or blank
    pub fn fields(&self) -> Option<&str> {
        non_blank(self.fields.as_deref())
    }

    /// Requested page size, or [`DEFAULT_PAGE_SIZE`] when absent
    ///
    /// After [`normalized`](Self::normalized) this is the configured default
    /// instead.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Apply configured defaults and limits
    ///
    /// - `page` is at least 1
    /// - an absent `page_size` takes the configured default
    /// - `page_size` is within `1..=max_page_size`
    /// - an absent or blank `order_by` falls back to the configured default
    pub fn normalized(&self, config: &QueryConfig) -> Self {
        let order_by = self
            .order_by()
            .unwrap_or(config.default_order_by.as_str())
            .to_string();
        let page_size = self
            .page_size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        Self {
            search: self.search().map(str::to_string),
            order_by: Some(order_by),
            fields: self.fields().map(str::to_string),
            page: self.page.max(1),
            page_size: Some(page_size),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// One page of a filtered, sorted sequence plus its position metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_count: usize,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl<T> PagedResult<T> {
    /// Slice one page out of an already filtered and sorted sequence
    ///
    /// Uses [`MAX_PAGE_SIZE`] as the page size limit.
    pub fn create(source: Vec<T>, page: usize, page_size: usize) -> Self {
        Self::create_with_limit(source, page, page_size, MAX_PAGE_SIZE)
    }

    /// Slice one page, clamping `page_size` to `max_page_size`
    ///
    /// A page past the end is empty but still reports the full counts.
    pub fn create_with_limit(
        source: Vec<T>,
        page: usize,
        page_size: usize,
        max_page_size: usize,
    ) -> Self {
        let current_page = page.max(1);
        let page_size = page_size.clamp(1, max_page_size.max(1));
        let total_count = source.len();
        let total_pages = total_count.div_ceil(page_size);

        let items = match (current_page - 1).checked_mul(page_size) {
            Some(skip) if skip < total_count => {
                source.into_iter().skip(skip).take(page_size).collect()
            }
            _ => Vec::new(),
        };

        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Convert the page's items without touching the metadata
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }

    /// Pagination metadata for headers or envelopes
    pub fn metadata(&self) -> PaginationMeta {
        PaginationMeta {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            previous_page: self.has_previous().then(|| self.current_page - 1),
            next_page: self.has_next().then(|| self.current_page + 1),
        }
    }
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of items (after filters)
    pub total_count: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_previous: bool,

    /// Previous page number, for link building
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<usize>,

    /// Next page number, for link building
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
}

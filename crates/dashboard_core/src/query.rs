use crate::ValidationError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// The service clamps `limit` to this value; larger page sizes are rejected
/// up front instead of silently shrinking.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The operator's current page, page size and search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    search_term: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
        }
    }
}

impl QueryState {
    pub fn new(page: u32, page_size: u32, search_term: impl Into<String>) -> Result<Self, ValidationError> {
        validate_page(page)?;
        validate_page_size(page_size)?;
        Ok(Self {
            page,
            page_size,
            search_term: search_term.into(),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Number of pages needed for `total` matching jobs, never less than one.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size)).max(1)
    }

    /// Returns the query for another page, or `None` if nothing changes.
    pub(crate) fn with_page(&self, page: u32) -> Result<Option<Self>, ValidationError> {
        validate_page(page)?;
        if page == self.page {
            return Ok(None);
        }
        Ok(Some(Self {
            page,
            ..self.clone()
        }))
    }

    /// A new page size starts again from the first page.
    pub(crate) fn with_page_size(&self, page_size: u32) -> Result<Option<Self>, ValidationError> {
        validate_page_size(page_size)?;
        if page_size == self.page_size {
            return Ok(None);
        }
        Ok(Some(Self {
            page: 1,
            page_size,
            search_term: self.search_term.clone(),
        }))
    }

    /// A new search term starts again from the first page.
    pub(crate) fn with_search_term(&self, search_term: String) -> Option<Self> {
        if search_term == self.search_term {
            return None;
        }
        Some(Self {
            page: 1,
            page_size: self.page_size,
            search_term,
        })
    }
}

fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page == 0 {
        return Err(ValidationError::InvalidPage(page));
    }
    Ok(())
}

fn validate_page_size(page_size: u32) -> Result<(), ValidationError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::InvalidPageSize(page_size));
    }
    Ok(())
}

/// Tags an in-flight refresh with the query it was issued for.
///
/// `seq` grows with every refresh issued by one `AppState`; only the
/// response for the latest ticket may be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    pub query: QueryState,
}

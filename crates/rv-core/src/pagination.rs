use crate::config::PaginationConfig;
use crate::error::{QueryError, ServiceError};

/// Page and page size taken from a request and normalised against the
/// configured defaults, before the total row count is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested_page: i64,
    page: u64,
    page_size: u64,
}

/// A validated window over `total_count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl PageRequest {
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, ServiceError> {
        let default_size = config.default_page_size()?;

        let requested_page = match non_blank(page) {
            None => 1,
            Some(raw) => raw.parse::<i64>().map_err(|_| QueryError::InvalidPage {
                value: raw.to_string(),
            })?,
        };
        let page = u64::try_from(requested_page).unwrap_or(0).max(1);

        let page_size = match non_blank(page_size) {
            None => default_size,
            Some(raw) => {
                let value = raw.parse::<i64>().map_err(|_| QueryError::InvalidPageSize {
                    value: raw.to_string(),
                })?;
                match u64::try_from(value) {
                    Ok(size) if size > 0 && size <= u64::from(config.max_page_size) => size,
                    _ => default_size,
                }
            }
        };

        Ok(Self {
            requested_page,
            page,
            page_size,
        })
    }

    /// Applies the request to a known row count. A page past the end is
    /// rejected rather than answered with an empty page.
    pub fn window(&self, total_count: u64) -> Result<PageWindow, QueryError> {
        let total_pages = total_pages(total_count, self.page_size);
        let beyond_end = u64::try_from(self.requested_page)
            .map(|requested| requested > total_pages)
            .unwrap_or(false);
        if beyond_end || total_pages == 0 {
            return Err(QueryError::PageOutOfRange {
                page: self.requested_page,
                total_pages,
            });
        }
        Ok(PageWindow {
            page: self.page,
            page_size: self.page_size,
            total_pages,
            total_count,
        })
    }
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

use crate::error::ConfigError;
use url::Url;

pub const DEFAULT_PAGE_SIZE: &str = "10";
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Kept as the operator wrote it; it is parsed on use so a bad value
    /// surfaces as a server error on the request that needs it.
    pub default_page_size: String,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE.to_string(),
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    pub fn default_page_size(&self) -> Result<u64, ConfigError> {
        let raw = self.default_page_size.trim();
        match raw.parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidDefaultPageSize {
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub pagination: PaginationConfig,
    /// Externally visible origin (and optional path prefix) used for
    /// prev/next links, which may differ from the host the request hit.
    pub public_base_url: Url,
}

impl ServiceConfig {
    pub fn new(pagination: PaginationConfig, public_base_url: Url) -> Self {
        Self {
            pagination,
            public_base_url,
        }
    }
}

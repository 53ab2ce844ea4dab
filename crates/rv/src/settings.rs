use rv_core::{PaginationConfig, ServiceConfig};
use rv_serve::upstream::UpstreamConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

const ENV_PREFIX: &str = "REVIEWS_";
const DEV_ENVIRONMENT: &str = "DEV";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime settings: defaults, then an optional TOML file, then
/// `REVIEWS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub db_path: String,
    pub auth_url: String,
    pub auction_url: String,
    pub item_url: String,
    pub public_base_url: String,
    pub page_size: String,
    pub max_page_size: u32,
    pub environment: String,
    pub log_level: String,
    pub version: String,
}

impl Default for Settings {
    fn default() -> Self {
        let pagination = PaginationConfig::default();
        Self {
            port: 8020,
            db_path: "reviews.db".to_string(),
            auth_url: "http://localhost:8000/authy/checkaccess/10".to_string(),
            auction_url: "http://localhost:8010/auctions".to_string(),
            item_url: "http://localhost:8030/items".to_string(),
            public_base_url: "http://localhost:8020".to_string(),
            page_size: pagination.default_page_size,
            max_page_size: pagination.max_page_size,
            environment: "PROD".to_string(),
            log_level: "info".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|err| SettingsError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        toml::from_str(&content).map_err(|err| SettingsError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("PORT") {
            self.port = parse_number("PORT", &value)?;
        }
        if let Some(value) = var("MAX_PAGE_SIZE") {
            self.max_page_size = parse_number("MAX_PAGE_SIZE", &value)?;
        }
        for (name, field) in [
            ("DB_PATH", &mut self.db_path),
            ("AUTH_URL", &mut self.auth_url),
            ("AUCTION_URL", &mut self.auction_url),
            ("ITEM_URL", &mut self.item_url),
            ("PUBLIC_BASE_URL", &mut self.public_base_url),
            ("PAGE_SIZE", &mut self.page_size),
            ("ENVIRONMENT", &mut self.environment),
            ("LOG_LEVEL", &mut self.log_level),
            ("VERSION", &mut self.version),
        ] {
            if let Some(value) = var(name) {
                *field = value;
            }
        }
        Ok(())
    }

    /// The page size is passed through unparsed; a bad value is reported by
    /// the requests that need it.
    pub fn service_config(&self) -> Result<ServiceConfig, SettingsError> {
        let public_base_url =
            Url::parse(&self.public_base_url).map_err(|_| SettingsError::InvalidValue {
                key: "public_base_url".to_string(),
                value: self.public_base_url.clone(),
            })?;
        let pagination = PaginationConfig {
            default_page_size: self.page_size.clone(),
            max_page_size: self.max_page_size,
        };
        Ok(ServiceConfig::new(pagination, public_base_url))
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            auth_url: self.auth_url.clone(),
            auction_url: self.auction_url.clone(),
            item_url: self.item_url.clone(),
            insecure_tls: self.environment.eq_ignore_ascii_case(DEV_ENVIRONMENT),
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, SettingsError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| SettingsError::InvalidValue {
            key: format!("{ENV_PREFIX}{name}"),
            value: value.to_string(),
        })
}

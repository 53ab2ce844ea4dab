pub mod config;
pub mod error;
pub mod links;
pub mod pagination;
pub mod reviews;
pub mod score;
pub mod service;
pub mod store;
pub mod validation;

pub mod types;

pub use crate::config::{PaginationConfig, ServiceConfig};
pub use crate::error::ServiceError;
pub use crate::service::ReviewService;
pub use crate::store::Store;

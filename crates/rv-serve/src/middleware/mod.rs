pub mod correlation;
pub mod json;

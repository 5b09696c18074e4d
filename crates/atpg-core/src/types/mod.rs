//! Core request addressing types.
//!
//! These types enforce their invariants at construction time, so a request
//! can never be aimed outside the configured API.

mod api_path;
mod api_url;

pub use api_path::ApiPath;
pub use api_url::ApiUrl;

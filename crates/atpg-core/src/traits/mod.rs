//! Core traits for API access.

mod api;

pub use api::Api;

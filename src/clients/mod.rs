//! Clients - HTTP Clients for External APIs
//!
//! This module contains the content source interface consumed by the cache
//! and its HTTP implementation against the REST API.

pub mod content_source;
pub mod content_api_client;

pub use content_api_client::ContentApiClient;
pub use content_source::ContentSource;

//! HTTP client module
//!
//! Provides the client the paginator issues page requests with.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};

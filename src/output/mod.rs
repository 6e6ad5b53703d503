//! Output module
//!
//! # Overview
//!
//! - [`CloudDestination`] wraps an `object_store` backend (GCS, in-memory, or
//!   local filesystem) addressed by a URL
//! - [`JsonSink`] serializes a collection and writes it as one JSON object

mod cloud;
mod sink;

pub use cloud::CloudDestination;
pub use sink::JsonSink;

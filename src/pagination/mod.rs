//! Pagination module
//!
//! # Overview
//!
//! Collections are fetched with offset/limit pagination. Each page is parsed
//! into a [`PageResponse`], folded into a [`PaginationState`], and the loop ends
//! on the first empty page, once the declared total is reached, or when a
//! request fails (keeping the items fetched so far).

mod paginator;
mod types;

pub use paginator::OffsetPaginator;
pub use types::{
    extract_path, FetchOutcome, NextPage, PageResponse, PaginationConfig, PaginationState,
    RecordLocator, StopReason, AUTO_COLLECTION_KEYS, FALLBACK_COLLECTION_KEY,
};

//! Offset paginator
//!
//! Issues `?limit=N&skip=M` requests one after another until a page comes back
//! empty or the accumulated count reaches the declared total.

use super::types::{
    FetchOutcome, NextPage, PageResponse, PaginationConfig, PaginationState, RecordLocator,
    StopReason,
};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use tracing::{debug, error, info};
use url::Url;

/// Offset/limit pagination over a single base endpoint
///
/// Common patterns:
/// - `?limit=30&skip=60` (DummyJSON)
/// - `?limit=50&offset=100` (with `skip_param: offset`)
#[derive(Debug, Clone, Default)]
pub struct OffsetPaginator {
    config: PaginationConfig,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Get the pagination config
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Build the URL for the page at `offset`, keeping any query the base URL already has
    pub fn page_url(&self, base_url: &str, offset: u64) -> Result<String> {
        let mut url = Url::parse(base_url)?;
        url.query_pairs_mut()
            .append_pair(&self.config.limit_param, &self.config.limit.to_string())
            .append_pair(&self.config.skip_param, &offset.to_string());
        Ok(url.into())
    }

    /// Fold one page into the state and decide whether to continue
    ///
    /// A declared total of 0 means the API did not report one; only an
    /// empty page ends such a collection.
    pub fn process_page(&self, page: &PageResponse, state: &mut PaginationState) -> NextPage {
        state.pages += 1;
        state.last_total = page.total;

        if page.is_empty() {
            state.finish(StopReason::EmptyPage);
            return NextPage::Done(StopReason::EmptyPage);
        }

        state.add_fetched(page.items.len());

        if page.total > 0 && state.total_fetched as u64 >= page.total {
            state.finish(StopReason::TotalReached);
            return NextPage::Done(StopReason::TotalReached);
        }

        state.add_offset(self.config.limit);
        NextPage::Continue {
            offset: state.offset,
        }
    }

    /// Fetch every page of `base_url` and return the accumulated items
    ///
    /// Transport failures end the loop and return what was accumulated.
    /// Exceeding `max_pages` / `max_items`, an invalid base URL, or a page
    /// whose records cannot be located are errors.
    pub async fn fetch_all(
        &self,
        client: &HttpClient,
        base_url: &str,
        locator: &RecordLocator,
    ) -> Result<FetchOutcome> {
        let mut state = PaginationState::new();
        let mut items = Vec::new();

        self.check_page_cap(&state, base_url)?;

        while !state.is_done() {
            let url = self.page_url(base_url, state.offset)?;
            let body = match client.get_json(&url).await {
                Ok(body) => body,
                Err(e) if e.is_transport() => {
                    error!("Error fetching data from {url}: {e}");
                    state.finish(StopReason::TransportError);
                    break;
                }
                Err(e) => return Err(e),
            };

            let page = PageResponse::parse(body, locator, &self.config.total_path)?;
            debug!(
                "Page {} from {url}: {} items, total {}",
                state.pages + 1,
                page.items.len(),
                page.total
            );

            let next = self.process_page(&page, &mut state);
            items.extend(page.items);

            if let Some(max_items) = self.config.max_items {
                if items.len() > max_items {
                    return Err(Error::ItemLimitExceeded {
                        url: base_url.to_string(),
                        max_items,
                        fetched: items.len(),
                    });
                }
            }

            if let NextPage::Continue { .. } = next {
                self.check_page_cap(&state, base_url)?;
                tokio::time::sleep(self.config.delay).await;
                info!("Fetched {} items so far", state.total_fetched);
            }
        }

        info!("Total items fetched: {}", state.total_fetched);

        Ok(FetchOutcome {
            items,
            pages: state.pages,
            stop: state.stop.unwrap_or(StopReason::EmptyPage),
            reported_total: state.last_total,
        })
    }

    fn check_page_cap(&self, state: &PaginationState, base_url: &str) -> Result<()> {
        match self.config.max_pages {
            Some(max_pages) if state.pages >= max_pages => Err(Error::PageLimitExceeded {
                url: base_url.to_string(),
                max_pages,
            }),
            _ => Ok(()),
        }
    }
}

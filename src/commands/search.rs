//! Search command implementation.

use crate::amazon::{Criteria, ItemsResponse, ProductApi, Transport};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// The service serves at most this many result pages.
pub const MAX_ITEM_PAGE: u32 = 10;

/// Executes an `ItemSearch`, optionally across several result pages.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, keywords: &str, pages: u32) -> Result<String> {
        let api = ProductApi::http(self.config.signer()?, &self.config.transport_options())
            .context("Failed to create HTTP client")?;

        self.execute_with_api(&api, keywords, pages).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_api(
        &self,
        api: &ProductApi<impl Transport>,
        keywords: &str,
        pages: u32,
    ) -> Result<String> {
        let pages = pages.clamp(1, MAX_ITEM_PAGE);
        info!("Searching {} for: {} ({} page(s))", self.config.search_index, keywords, pages);

        let mut combined = ItemsResponse::default();

        for page in 1..=pages {
            let mut criteria = Criteria::new(&self.config.search_index, keywords)
                .response_group(&self.config.response_group);
            if page > 1 {
                criteria = criteria.page(page);
            }

            let response = api
                .item_search(&criteria)
                .await
                .with_context(|| format!("ItemSearch failed on page {}", page))?;

            if page == 1 {
                combined.is_valid = response.is_valid;
                combined.total_results = response.total_results;
                combined.total_pages = response.total_pages;
                combined.more_search_results_url = response.more_search_results_url.clone();
            }

            let last_page = response.items.is_empty() || page >= response.total_pages;
            combined.errors.extend(response.errors);
            combined.items.extend(response.items);

            if last_page {
                debug!("No more pages after page {}", page);
                break;
            }
        }

        info!("Found {} items", combined.items.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_response(&combined))
    }
}

//! Item lookup command implementation.

use crate::amazon::client::MAX_LOOKUP_ITEMS;
use crate::amazon::{ItemsResponse, ProductApi, Transport};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Executes an `ItemLookup` by ASIN.
pub struct LookupCommand {
    config: Config,
}

/// Normalises an ASIN, or returns `None` if it is not 10 alphanumerics.
pub fn normalize_asin(raw: &str) -> Option<String> {
    let asin = raw.trim().to_uppercase();
    if asin.len() == 10 && asin.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(asin)
    } else {
        None
    }
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Looks up the given ASINs and returns formatted output.
    pub async fn execute(&self, asins: &[String]) -> Result<String> {
        let api = ProductApi::http(self.config.signer()?, &self.config.transport_options())
            .context("Failed to create HTTP client")?;

        self.execute_with_api(&api, asins).await
    }

    /// Looks up ASINs with a provided client (for testing).
    pub async fn execute_with_api(
        &self,
        api: &ProductApi<impl Transport>,
        asins: &[String],
    ) -> Result<String> {
        let mut valid = Vec::new();
        for raw in asins {
            match normalize_asin(raw) {
                Some(asin) => valid.push(asin),
                None => warn!("Skipping invalid ASIN: {}", raw.trim()),
            }
        }

        if valid.is_empty() {
            anyhow::bail!("No valid ASINs given. An ASIN is 10 alphanumeric characters.");
        }

        let mut combined = ItemsResponse { is_valid: true, ..ItemsResponse::default() };

        for batch in valid.chunks(MAX_LOOKUP_ITEMS) {
            info!("Looking up {} item(s)", batch.len());

            let response = api
                .item_lookup(batch, &self.config.response_group)
                .await
                .with_context(|| format!("ItemLookup failed for {}", batch.join(",")))?;

            combined.is_valid &= response.is_valid;
            combined.errors.extend(response.errors);
            combined.items.extend(response.items);
        }

        let formatter = Formatter::new(self.config.format);
        if combined.items.len() == 1 && combined.errors.is_empty() {
            return Ok(formatter.format_item(&combined.items[0]));
        }
        Ok(formatter.format_response(&combined))
    }
}

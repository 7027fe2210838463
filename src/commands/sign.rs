//! Sign command: prints a signed `ItemSearch` URL without sending it.

use crate::amazon::{Criteria, RequestSigner};
use crate::config::Config;
use anyhow::{Context, Result};

/// Prints a signed `ItemSearch` URL without sending it.
pub struct SignCommand {
    config: Config,
}

impl SignCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Signs a search for `keywords` at the current time.
    pub fn execute(&self, keywords: &str, explain: bool) -> Result<String> {
        let signer = self.config.signer()?;
        self.execute_with_signer(&signer, keywords, explain)
    }

    /// Signs with a provided signer (for testing). With `explain`, the
    /// canonical query and string-to-sign are printed above the URL.
    pub fn execute_with_signer(
        &self,
        signer: &RequestSigner,
        keywords: &str,
        explain: bool,
    ) -> Result<String> {
        let criteria = Criteria::new(&self.config.search_index, keywords)
            .response_group(&self.config.response_group);

        let signed = signer.sign(&criteria.to_parameters()).context("Failed to sign request")?;

        if !explain {
            return Ok(signed.into_url());
        }

        Ok(format!(
            "Canonical query:\n{}\n\nString to sign:\n{}\n\nSignature:\n{}\n\nURL:\n{}",
            signed.canonical_query(),
            signed.string_to_sign(),
            signed.signature(),
            signed.url()
        ))
    }
}

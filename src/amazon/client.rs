//! Transport and top-level client for signed Product Advertising API calls.

use crate::amazon::models::ItemsResponse;
use crate::amazon::parser;
use crate::amazon::signer::{ParameterSet, RequestSigner, SignedRequest, OPERATION_ITEM_LOOKUP};
use crate::error::PaapiError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Response group requested when the caller does not pick one.
pub const DEFAULT_RESPONSE_GROUP: &str = "Images,ItemAttributes";

/// `ItemLookup` accepts at most this many ASINs per request.
pub const MAX_LOOKUP_ITEMS: usize = 10;

/// Issues GET requests for signed URLs - enables mocking for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the response body of a successful response.
    async fn get(&self, url: &str) -> Result<String, PaapiError>;
}

/// Timeouts and proxy for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxy: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), connect_timeout: Duration::from_secs(10), proxy: None }
    }
}

/// HTTP transport backed by wreq.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(options: &TransportOptions) -> Result<Self, PaapiError> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout);

        if let Some(proxy_url) = &options.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).map_err(PaapiError::transport)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(PaapiError::transport)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, PaapiError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/xml,text/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(PaapiError::transport)?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await.map_err(PaapiError::transport)?;

        if !status.is_success() {
            let message = match parser::parse_error(&body) {
                Some(error) => format!("{}: {}", error.code, error.message),
                None => body.trim().chars().take(200).collect(),
            };
            warn!("Request rejected with status {}: {}", status, message);
            return Err(PaapiError::BadStatus { status: status.as_u16(), message });
        }

        Ok(body)
    }
}

/// Caller-facing `ItemSearch` parameters.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub search_index: String,
    pub keywords: String,
    /// Defaults to [`DEFAULT_RESPONSE_GROUP`] when empty.
    pub response_group: String,
    /// 1-based result page.
    pub item_page: Option<u32>,
    /// Any further parameters, passed through as-is.
    pub extra: ParameterSet,
}

impl Criteria {
    pub fn new(search_index: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self { search_index: search_index.into(), keywords: keywords.into(), ..Self::default() }
    }

    pub fn response_group(mut self, group: impl Into<String>) -> Self {
        self.response_group = group.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.item_page = Some(page);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parameter set handed to the signer.
    pub fn to_parameters(&self) -> ParameterSet {
        let mut params = self.extra.clone();
        params.insert("SearchIndex".to_string(), self.search_index.clone());
        params.insert("Keywords".to_string(), self.keywords.clone());
        params.insert("ResponseGroup".to_string(), response_group_or_default(&self.response_group));
        if let Some(page) = self.item_page {
            params.insert("ItemPage".to_string(), page.to_string());
        }
        params
    }
}

fn response_group_or_default(group: &str) -> String {
    if group.trim().is_empty() {
        DEFAULT_RESPONSE_GROUP.to_string()
    } else {
        group.to_string()
    }
}

/// Signs requests and sends them through a [`Transport`].
pub struct ProductApi<T> {
    signer: RequestSigner,
    transport: T,
}

impl ProductApi<HttpTransport> {
    /// Client that talks to the real service over HTTP.
    pub fn http(signer: RequestSigner, options: &TransportOptions) -> Result<Self, PaapiError> {
        Ok(Self::new(signer, HttpTransport::new(options)?))
    }
}

impl<T: Transport> ProductApi<T> {
    pub fn new(signer: RequestSigner, transport: T) -> Self {
        Self { signer, transport }
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Signs an `ItemSearch` request without sending it.
    pub fn signed_search(&self, criteria: &Criteria) -> Result<SignedRequest, PaapiError> {
        self.signer.sign(&criteria.to_parameters())
    }

    /// Runs an `ItemSearch`.
    pub async fn item_search(&self, criteria: &Criteria) -> Result<ItemsResponse, PaapiError> {
        info!("ItemSearch: '{}' in {}", criteria.keywords, criteria.search_index);
        let signed = self.signed_search(criteria)?;
        self.fetch(signed).await
    }

    /// Runs an `ItemLookup` for up to [`MAX_LOOKUP_ITEMS`] ASINs.
    pub async fn item_lookup(
        &self,
        asins: &[String],
        response_group: &str,
    ) -> Result<ItemsResponse, PaapiError> {
        if asins.is_empty() {
            return Err(PaapiError::InvalidRequest("ItemLookup needs at least one ASIN".to_string()));
        }
        if asins.len() > MAX_LOOKUP_ITEMS {
            return Err(PaapiError::InvalidRequest(format!(
                "ItemLookup accepts at most {} ASINs, got {}",
                MAX_LOOKUP_ITEMS,
                asins.len()
            )));
        }

        info!("ItemLookup: {}", asins.join(","));

        let mut params = ParameterSet::new();
        params.insert("Operation".to_string(), OPERATION_ITEM_LOOKUP.to_string());
        params.insert("ItemId".to_string(), asins.join(","));
        params.insert("ResponseGroup".to_string(), response_group_or_default(response_group));

        let signed = self.signer.sign(&params)?;
        self.fetch(signed).await
    }

    async fn fetch(&self, signed: SignedRequest) -> Result<ItemsResponse, PaapiError> {
        debug!("GET {}", signed.url());
        let body = self.transport.get(signed.url()).await?;
        parser::parse_items(&body)
    }
}

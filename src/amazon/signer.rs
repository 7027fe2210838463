//! Canonical request signing for the Product Advertising API.
//!
//! The service recomputes the signature from the query it receives, so the
//! parameter order, the escaping and the layout of the string-to-sign all
//! have to match byte for byte:
//!
//! 1. protocol parameters are merged with the caller's parameters
//! 2. keys are sorted byte-wise
//! 3. keys and values are percent-encoded (space is `%20`, never `+`)
//! 4. `GET\n{host}\n{path}\n{query}` is signed with HMAC-SHA256
//! 5. the base64 digest is appended as `Signature`

use crate::amazon::regions::Endpoint;
use crate::error::PaapiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Request parameters keyed by name. `BTreeMap<String, _>` iterates in
/// byte-wise key order, which is the canonical order.
pub type ParameterSet = BTreeMap<String, String>;

pub const SERVICE: &str = "AWSECommerceService";
pub const API_VERSION: &str = "2013-08-01";
pub const OPERATION_ITEM_SEARCH: &str = "ItemSearch";
pub const OPERATION_ITEM_LOOKUP: &str = "ItemLookup";

/// Long-lived API credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    associate_tag: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        associate_tag: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            associate_tag: associate_tag.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn associate_tag(&self) -> &str {
        &self.associate_tag
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("associate_tag", &self.associate_tag)
            .finish()
    }
}

/// Service identity sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub service: String,
    pub version: String,
    /// Used unless the caller passes its own `Operation` parameter.
    pub operation: String,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            service: SERVICE.to_string(),
            version: API_VERSION.to_string(),
            operation: OPERATION_ITEM_SEARCH.to_string(),
        }
    }
}

/// Source of the `Timestamp` parameter.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// Parses an RFC 3339 timestamp, keeping its offset.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Formats a timestamp the way the service expects: converted to UTC,
/// RFC 3339, whole seconds, `Z` suffix.
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn escape(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Sorted, escaped, `&`-joined `key=value` pairs.
pub fn canonical_query(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// The exact blob that gets signed.
pub fn string_to_sign(endpoint: &Endpoint, canonical_query: &str) -> String {
    format!("GET\n{}\n{}\n{}", endpoint.host(), endpoint.path(), canonical_query)
}

fn hmac_base64(secret: &str, message: &str) -> Result<String, PaapiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaapiError::Signing(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// A fully signed request URL plus the intermediate values that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    url: String,
    timestamp: String,
    canonical_query: String,
    string_to_sign: String,
    signature: String,
}

impl SignedRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Query string the signature was computed over (without `Signature`).
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// Base64 signature, unescaped.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl fmt::Display for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Signs parameter sets for one endpoint with one set of credentials.
///
/// Holds no mutable state; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    endpoint: Endpoint,
    protocol: Protocol,
    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    pub fn new(credentials: Credentials, endpoint: Endpoint) -> Self {
        Self {
            credentials,
            endpoint,
            protocol: Protocol::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Signs `params` at the current clock time.
    pub fn sign(&self, params: &ParameterSet) -> Result<SignedRequest, PaapiError> {
        self.sign_at(params, self.clock.now())
    }

    /// Signs `params` with an explicit timestamp.
    pub fn sign_at(
        &self,
        params: &ParameterSet,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<SignedRequest, PaapiError> {
        let timestamp = format_timestamp(&timestamp);

        let mut query = self.protocol_parameters(&timestamp);
        for (key, value) in params {
            query.insert(key.clone(), value.clone());
        }

        let canonical = canonical_query(&query);
        let string_to_sign = string_to_sign(&self.endpoint, &canonical);
        let signature = hmac_base64(&self.credentials.secret_access_key, &string_to_sign)?;

        debug!(
            "Signed {} request for {} ({} parameters)",
            query.get("Operation").map(String::as_str).unwrap_or_default(),
            self.endpoint.host(),
            query.len()
        );

        query.insert("Signature".to_string(), signature.clone());
        let url = self.endpoint.url_with_query(&canonical_query(&query));

        Ok(SignedRequest { url, timestamp, canonical_query: canonical, string_to_sign, signature })
    }

    fn protocol_parameters(&self, timestamp: &str) -> ParameterSet {
        let mut params = ParameterSet::new();
        params.insert("Service".to_string(), self.protocol.service.clone());
        params.insert("Version".to_string(), self.protocol.version.clone());
        params.insert("Operation".to_string(), self.protocol.operation.clone());
        params.insert("AWSAccessKeyId".to_string(), self.credentials.access_key_id.clone());
        params.insert("AssociateTag".to_string(), self.credentials.associate_tag.clone());
        params.insert("Timestamp".to_string(), timestamp.to_string());
        params
    }
}

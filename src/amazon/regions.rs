//! Product Advertising API regions and endpoint resolution.

use crate::error::PaapiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Request path shared by every regional endpoint.
pub const DEFAULT_PATH: &str = "/onca/xml";

/// Regions served by the Product Advertising API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Ca,
    Cn,
    De,
    Es,
    Fr,
    It,
    Jp,
    Uk,
    #[default]
    Us,
}

impl Region {
    /// Returns the API host for this region.
    pub fn host(&self) -> &'static str {
        match self {
            Region::Ca => "ecs.amazonaws.ca",
            Region::Cn => "webservices.amazon.cn",
            Region::De => "ecs.amazonaws.de",
            Region::Es => "webservices.amazon.es",
            Region::Fr => "ecs.amazonaws.fr",
            Region::It => "webservices.amazon.it",
            Region::Jp => "ecs.amazonaws.jp",
            Region::Uk => "ecs.amazonaws.co.uk",
            Region::Us => "ecs.amazonaws.com",
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Ca,
            Region::Cn,
            Region::De,
            Region::Es,
            Region::Fr,
            Region::It,
            Region::Jp,
            Region::Uk,
            Region::Us,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Ca => "ca",
            Region::Cn => "cn",
            Region::De => "de",
            Region::Es => "es",
            Region::Fr => "fr",
            Region::It => "it",
            Region::Jp => "jp",
            Region::Uk => "uk",
            Region::Us => "us",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ca" | "canada" => Ok(Region::Ca),
            "cn" | "china" => Ok(Region::Cn),
            "de" | "germany" => Ok(Region::De),
            "es" | "spain" => Ok(Region::Es),
            "fr" | "france" => Ok(Region::Fr),
            "it" | "italy" => Ok(Region::It),
            "jp" | "japan" => Ok(Region::Jp),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "us" | "usa" | "united states" => Ok(Region::Us),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown region '{0}'. Valid regions: ca, cn, de, es, fr, it, jp, uk, us")]
pub struct RegionParseError(String);

impl From<RegionParseError> for PaapiError {
    fn from(err: RegionParseError) -> Self {
        PaapiError::Endpoint(err.to_string())
    }
}

/// Where signed requests are sent. The host and path are part of the
/// string-to-sign, so they must match what the service sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    path: String,
}

impl Endpoint {
    /// Regional endpoint over https.
    pub fn for_region(region: Region) -> Self {
        Self {
            scheme: "https".to_string(),
            host: region.host().to_string(),
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Resolves a region code, failing on codes outside the region table.
    pub fn from_region_code(code: &str) -> Result<Self, PaapiError> {
        let region: Region = code.parse()?;
        Ok(Self::for_region(region))
    }

    /// Parses a full endpoint override such as `http://127.0.0.1:8080`.
    ///
    /// A non-default port stays part of the host. A missing path falls back
    /// to [`DEFAULT_PATH`].
    pub fn parse(raw: &str) -> Result<Self, PaapiError> {
        let url = Url::parse(raw)
            .map_err(|e| PaapiError::Endpoint(format!("'{}' is not a valid URL: {}", raw, e)))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PaapiError::Endpoint(format!("'{}' has no host", raw)))?;

        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let path = match url.path() {
            "" | "/" => DEFAULT_PATH.to_string(),
            p => p.to_string(),
        };

        Ok(Self { scheme: url.scheme().to_string(), host, path })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builds the request URL for an already-encoded query string.
    pub fn url_with_query(&self, query: &str) -> String {
        format!("{}://{}{}?{}", self.scheme, self.host, self.path, query)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing_all() {
        assert_eq!(Region::from_str("ca").unwrap(), Region::Ca);
        assert_eq!(Region::from_str("cn").unwrap(), Region::Cn);
        assert_eq!(Region::from_str("de").unwrap(), Region::De);
        assert_eq!(Region::from_str("es").unwrap(), Region::Es);
        assert_eq!(Region::from_str("fr").unwrap(), Region::Fr);
        assert_eq!(Region::from_str("it").unwrap(), Region::It);
        assert_eq!(Region::from_str("jp").unwrap(), Region::Jp);
        assert_eq!(Region::from_str("uk").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("gb").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("us").unwrap(), Region::Us);
        assert_eq!(Region::from_str("spain").unwrap(), Region::Es);

        // Case insensitive, uppercase codes included
        assert_eq!(Region::from_str("ES").unwrap(), Region::Es);
        assert_eq!(Region::from_str("UK").unwrap(), Region::Uk);
        assert_eq!(Region::from_str(" JP ").unwrap(), Region::Jp);

        assert!(Region::from_str("au").is_err());
        assert!(Region::from_str("").is_err());
    }

    #[test]
    fn test_region_hosts_all() {
        assert_eq!(Region::Ca.host(), "ecs.amazonaws.ca");
        assert_eq!(Region::Cn.host(), "webservices.amazon.cn");
        assert_eq!(Region::De.host(), "ecs.amazonaws.de");
        assert_eq!(Region::Es.host(), "webservices.amazon.es");
        assert_eq!(Region::Fr.host(), "ecs.amazonaws.fr");
        assert_eq!(Region::It.host(), "webservices.amazon.it");
        assert_eq!(Region::Jp.host(), "ecs.amazonaws.jp");
        assert_eq!(Region::Uk.host(), "ecs.amazonaws.co.uk");
        assert_eq!(Region::Us.host(), "ecs.amazonaws.com");
    }

    #[test]
    fn test_region_all() {
        let all = Region::all();
        assert_eq!(all.len(), 9);
        for region in all {
            let parsed: Region = region.to_string().parse().unwrap();
            assert_eq!(parsed, *region);
        }
    }

    #[test]
    fn test_region_parse_error_display() {
        let err = Region::from_str("xyz").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid regions"));
    }

    #[test]
    fn test_region_serde() {
        let json = serde_json::to_string(&Region::Es).unwrap();
        assert_eq!(json, "\"es\"");

        let parsed: Region = serde_json::from_str("\"jp\"").unwrap();
        assert_eq!(parsed, Region::Jp);
    }

    #[test]
    fn test_endpoint_for_region() {
        let endpoint = Endpoint::for_region(Region::Es);
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host(), "webservices.amazon.es");
        assert_eq!(endpoint.path(), "/onca/xml");
        assert_eq!(endpoint.to_string(), "https://webservices.amazon.es/onca/xml");
    }

    #[test]
    fn test_endpoint_from_unknown_region_fails() {
        let err = Endpoint::from_region_code("XX").unwrap_err();
        assert!(matches!(err, PaapiError::Endpoint(_)));
        assert!(err.to_string().contains("XX"));

        assert!(Endpoint::from_region_code("").is_err());
        assert_eq!(Endpoint::from_region_code("DE").unwrap().host(), "ecs.amazonaws.de");
    }

    #[test]
    fn test_endpoint_parse_override() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(endpoint.scheme(), "http");
        assert_eq!(endpoint.host(), "127.0.0.1:8080");
        assert_eq!(endpoint.path(), DEFAULT_PATH);

        let endpoint = Endpoint::parse("https://example.com:443/custom/xml").unwrap();
        assert_eq!(endpoint.host(), "example.com");
        assert_eq!(endpoint.path(), "/custom/xml");
    }

    #[test]
    fn test_endpoint_parse_invalid() {
        assert!(matches!(Endpoint::parse("webservices.amazon.es"), Err(PaapiError::Endpoint(_))));
        assert!(matches!(Endpoint::parse("mailto:someone"), Err(PaapiError::Endpoint(_))));
    }

    #[test]
    fn test_endpoint_url_with_query() {
        let endpoint = Endpoint::for_region(Region::Us);
        assert_eq!(endpoint.url_with_query("a=b"), "https://ecs.amazonaws.com/onca/xml?a=b");
    }
}

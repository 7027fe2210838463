//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::amazon::client::{TransportOptions, DEFAULT_RESPONSE_GROUP};
use crate::amazon::regions::{Endpoint, Region};
use crate::amazon::signer::{Credentials, RequestSigner};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API region
    #[serde(default)]
    pub region: Region,

    /// Full endpoint URL, replaces the regional host when set
    #[serde(default)]
    pub endpoint: Option<String>,

    /// AWS access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// AWS secret access key
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Associate (affiliate) tag
    #[serde(default)]
    pub associate_tag: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Default search index
    #[serde(default = "default_search_index")]
    pub search_index: String,

    /// Default response group
    #[serde(default = "default_response_group")]
    pub response_group: String,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_search_index() -> String {
    "All".to_string()
}

fn default_response_group() -> String {
    DEFAULT_RESPONSE_GROUP.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Us,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            associate_tag: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            search_index: default_search_index(),
            response_group: default_response_group(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-paapi").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. An unknown
    /// `AWS_PRODUCT_REGION` is an error.
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(key) = std::env::var("AWS_ACCESS_KEY_ID") {
            self.access_key_id = Some(key);
        }

        if let Ok(secret) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(secret);
        }

        if let Ok(tag) = std::env::var("AWS_ASSOCIATE_TAG") {
            self.associate_tag = Some(tag);
        }

        if let Ok(region) = std::env::var("AWS_PRODUCT_REGION") {
            self.region = region.parse::<Region>().context("Invalid AWS_PRODUCT_REGION")?;
        }

        if let Ok(endpoint) = std::env::var("PAAPI_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Ok(proxy) = std::env::var("PAAPI_PROXY") {
            self.proxy = Some(proxy);
        }

        Ok(self)
    }

    /// Returns credentials, failing if any part is missing or empty.
    pub fn credentials(&self) -> Result<Credentials> {
        fn required<'a>(value: &'a Option<String>, name: &str, env: &str) -> Result<&'a str> {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Missing {}. Set {} or pass it on the command line", name, env))
        }

        Ok(Credentials::new(
            required(&self.access_key_id, "access key id", "AWS_ACCESS_KEY_ID")?,
            required(&self.secret_access_key, "secret access key", "AWS_SECRET_ACCESS_KEY")?,
            required(&self.associate_tag, "associate tag", "AWS_ASSOCIATE_TAG")?,
        ))
    }

    /// Resolves the endpoint override, or the regional endpoint.
    pub fn endpoint(&self) -> Result<Endpoint> {
        match &self.endpoint {
            Some(raw) => Endpoint::parse(raw).context("Invalid endpoint override"),
            None => Ok(Endpoint::for_region(self.region)),
        }
    }

    /// Builds a signer from the credentials and endpoint.
    pub fn signer(&self) -> Result<RequestSigner> {
        Ok(RequestSigner::new(self.credentials()?, self.endpoint()?))
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            proxy: self.proxy.clone(),
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

//! amz-paapi - Signed-request client for the Amazon Product Advertising API
//!
//! The core is [`amazon::signer::RequestSigner`], which turns a parameter set
//! and credentials into a signed request URL. [`amazon::ProductApi`] pairs it
//! with a pluggable [`amazon::Transport`] and parses the XML responses.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;

pub use amazon::models::{Item, ItemsResponse};
pub use amazon::regions::{Endpoint, Region};
pub use amazon::signer::{Credentials, RequestSigner, SignedRequest};
pub use config::Config;
pub use error::PaapiError;

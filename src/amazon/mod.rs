//! Product Advertising API modules: signing, transport, parsing and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod signer;

pub use client::{Criteria, HttpTransport, ProductApi, Transport, TransportOptions};
pub use models::{ApiError, Image, Item, ItemsResponse, ListPrice};
pub use regions::{Endpoint, Region};
pub use signer::{Clock, Credentials, FixedClock, ParameterSet, RequestSigner, SignedRequest, SystemClock};

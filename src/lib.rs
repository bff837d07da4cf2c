//! Client for the WHO ICD-11 REST API.
//!
//! Authenticate once with [`Icd11Client::connect`], then look up codes,
//! search the foundation or a linearization release, or fetch many codes
//! concurrently with [`Icd11Client::fetch_all`].

pub mod auth;
pub mod batch;
pub mod client;
pub mod code;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod runtime;
pub mod search;

pub use batch::{FetchCode, WorkerCount, fetch_all};
pub use client::{EndpointFetcher, Icd11Client};
pub use code::Icd11Code;
pub use config::ClientOptions;
pub use endpoint::{DEFAULT_LINEARIZATION, DEFAULT_RELEASE_ID, Endpoint, RATE_LIMIT};
pub use error::{IcdError, Result};
pub use http::{HttpClient, HttpGet, HttpResponse};
pub use search::{SearchParameters, build_search_url};

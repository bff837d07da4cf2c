//! ICD-11 API client.
//!
//! [`Icd11Client`] owns a transport and a base URL. It looks up single codes,
//! runs searches and drives batches. Every request shares one status mapping:
//! 2xx decodes the body as JSON, 401 is an authorization failure, 404 is
//! "code not found" for lookups and "query failed" for searches, and every
//! other status is returned verbatim.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use crate::auth::{Credentials, request_token};
use crate::batch::{self, FetchCode, WorkerCount};
use crate::code::{Icd11Code, parse_codes};
use crate::config::ClientOptions;
use crate::endpoint::{
    DEFAULT_LINEARIZATION, DEFAULT_RELEASE_ID, Endpoint, foundation_search_url, release_search_url,
};
use crate::error::{IcdError, Result};
use crate::http::{HttpClient, HttpGet, HttpResponse};
use crate::runtime::Runtime;
use crate::search::{SearchParameters, build_search_url};

pub struct Icd11Client<H: HttpGet = HttpClient> {
    http: H,
    base_url: String,
}

impl Icd11Client<HttpClient> {
    /// Loads credentials, obtains a bearer token and returns a client whose
    /// requests carry the session headers.
    #[tracing::instrument(skip(runtime, options))]
    pub async fn connect<R: Runtime>(runtime: &R, options: &ClientOptions) -> Result<Self> {
        let credentials = Credentials::load(runtime, options.credentials_path.as_deref())?;

        let token_client = options.build_token_client()?;
        let token = request_token(&token_client, &options.token_endpoint, &credentials).await?;

        let session = options.build_session_client(&token)?;
        info!("Connected to ICD API at {}", options.base_url);

        Ok(Self::new(HttpClient::new(session), options.base_url.clone()))
    }
}

impl<H: HttpGet> Icd11Client<H> {
    pub fn new(http: H, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Looks up one code at `endpoint`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_code(&self, code: &Icd11Code, endpoint: &Endpoint) -> Result<Value> {
        let url = endpoint.url(&self.base_url, code);
        debug!("Fetching {} from {}...", code, url);

        let response = self.http.get(&url).await?;
        decode(response, || IcdError::CodeNotFound {
            code: code.to_string(),
        })
    }

    /// Fetches an entity from the foundation.
    pub async fn foundation_data(&self, code: &str) -> Result<Value> {
        let code = Icd11Code::new(code)?;
        self.fetch_code(&code, &Endpoint::Foundation).await
    }

    /// Fetches a code from the latest release of a linearization, optionally
    /// qualified by a residual code. `linearization` defaults to
    /// [`DEFAULT_LINEARIZATION`].
    pub async fn linearization_data(
        &self,
        code: &str,
        linearization: Option<&str>,
        residual: Option<&str>,
    ) -> Result<Value> {
        let code = Icd11Code::new(code)?;
        let endpoint = Endpoint::Linearization {
            linearization: or_default("linearization", linearization, DEFAULT_LINEARIZATION)?,
            residual: residual.map(parse_residual).transpose()?,
        };
        self.fetch_code(&code, &endpoint).await
    }

    /// Fetches a code from a specific release of a linearization, optionally
    /// qualified by a residual code. Release and linearization default to
    /// [`DEFAULT_RELEASE_ID`] and [`DEFAULT_LINEARIZATION`].
    pub async fn release_data(
        &self,
        code: &str,
        release_id: Option<&str>,
        linearization: Option<&str>,
        residual: Option<&str>,
    ) -> Result<Value> {
        let code = Icd11Code::new(code)?;
        let endpoint = Endpoint::Release {
            release_id: or_default("release_id", release_id, DEFAULT_RELEASE_ID)?,
            linearization: or_default("linearization", linearization, DEFAULT_LINEARIZATION)?,
            residual: residual.map(parse_residual).transpose()?,
        };
        self.fetch_code(&code, &endpoint).await
    }

    /// Fetches the code info record of a code in a specific release.
    pub async fn release_code_info(
        &self,
        code: &str,
        release_id: Option<&str>,
        linearization: Option<&str>,
    ) -> Result<Value> {
        let code = Icd11Code::new(code)?;
        let endpoint = Endpoint::CodeInfo {
            release_id: or_default("release_id", release_id, DEFAULT_RELEASE_ID)?,
            linearization: or_default("linearization", linearization, DEFAULT_LINEARIZATION)?,
        };
        self.fetch_code(&code, &endpoint).await
    }

    /// Searches the foundation.
    pub async fn foundation_search(&self, params: &SearchParameters) -> Result<Value> {
        self.search(&foundation_search_url(&self.base_url), params).await
    }

    /// Searches one release of a linearization. The release is addressed by
    /// the path, so `params.release_id` is not sent.
    pub async fn linearization_search(
        &self,
        release_id: Option<&str>,
        linearization: Option<&str>,
        params: &SearchParameters,
    ) -> Result<Value> {
        let search_base = release_search_url(
            &self.base_url,
            &or_default("release_id", release_id, DEFAULT_RELEASE_ID)?,
            &or_default("linearization", linearization, DEFAULT_LINEARIZATION)?,
        );
        let params = SearchParameters {
            release_id: None,
            ..params.clone()
        };
        self.search(&search_base, &params).await
    }

    /// Builds the query string on `search_base` and runs the search.
    #[tracing::instrument(skip(self, params))]
    pub async fn search(&self, search_base: &str, params: &SearchParameters) -> Result<Value> {
        let url = build_search_url(search_base, params)?;
        debug!("Searching {}...", url);

        let response = self.http.get(&url).await?;
        decode(response, || IcdError::QueryExecution { url: url.clone() })
    }

    /// A [`FetchCode`] bound to `endpoint`, for batches against linearization
    /// or release endpoints.
    pub fn endpoint(&self, endpoint: Endpoint) -> EndpointFetcher<'_, H> {
        EndpointFetcher {
            client: self,
            endpoint,
        }
    }

    /// Fetches many foundation entities, at most `worker_count` at a time.
    ///
    /// The worker count and every code are validated before anything is
    /// sent; any invalid argument fails the whole call. After that each code
    /// gets its own `Result` in input order.
    pub async fn fetch_all<S: AsRef<str>>(
        &self,
        codes: &[S],
        worker_count: i64,
    ) -> Result<Vec<Result<Value>>> {
        let workers = WorkerCount::new(worker_count)?;
        let codes = parse_codes(codes)?;
        Ok(batch::fetch_all(self, &codes, workers).await)
    }
}

#[async_trait]
impl<H: HttpGet> FetchCode for Icd11Client<H> {
    async fn fetch(&self, code: &Icd11Code) -> Result<Value> {
        self.fetch_code(code, &Endpoint::Foundation).await
    }
}

/// Looks up codes at a fixed endpoint.
pub struct EndpointFetcher<'a, H: HttpGet> {
    client: &'a Icd11Client<H>,
    endpoint: Endpoint,
}

impl<'a, H: HttpGet> EndpointFetcher<'a, H> {
    pub async fn fetch_all(
        &self,
        codes: &[Icd11Code],
        workers: WorkerCount,
    ) -> Vec<Result<Value>> {
        batch::fetch_all(self, codes, workers).await
    }
}

#[async_trait]
impl<'a, H: HttpGet> FetchCode for EndpointFetcher<'a, H> {
    async fn fetch(&self, code: &Icd11Code) -> Result<Value> {
        self.client.fetch_code(code, &self.endpoint).await
    }
}

/// Maps a response to its JSON body or a classified failure.
///
/// An empty 2xx body (such as a 204) is not valid JSON and fails with
/// [`IcdError::Decode`].
fn decode(response: HttpResponse, not_found: impl FnOnce() -> IcdError) -> Result<Value> {
    if response.is_success() {
        return Ok(serde_json::from_str(&response.body)?);
    }
    match response.status {
        401 => Err(IcdError::Authorization {
            reason: "the access token is invalid or expired".to_string(),
        }),
        404 => Err(not_found()),
        status => Err(IcdError::Upstream {
            status,
            body: response.body,
        }),
    }
}

fn or_default(name: &str, value: Option<&str>, default: &str) -> Result<String> {
    let value = value.unwrap_or(default);
    if value.trim().is_empty() {
        return Err(IcdError::configuration(format!("Expected a non-empty {}", name)));
    }
    Ok(value.to_string())
}

fn parse_residual(residual: &str) -> Result<Icd11Code> {
    Icd11Code::new(residual)
        .map_err(|_| IcdError::configuration("Expected a non-empty residual code"))
}

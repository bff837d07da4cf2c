use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{AccessToken, mask};
use crate::endpoint::{DEFAULT_BASE_URL, TOKEN_ENDPOINT};
use crate::error::{IcdError, Result};

const API_VERSION: HeaderName = HeaderName::from_static("api-version");

/// Settings for connecting to the ICD API.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub token_endpoint: String,
    /// Credentials file; `config.json` in the current directory when unset.
    pub credentials_path: Option<PathBuf>,
    pub language: String,
    pub api_version: String,
    /// Per-request timeout. No timeout when unset.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            credentials_path: None,
            language: "en".to_string(),
            api_version: "v2".to_string(),
            timeout: None,
            user_agent: concat!("icd11/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Headers every API request carries.
    pub fn session_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth_value = header_value(&format!("Bearer {}", token.access_token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(API_VERSION, header_value(&self.api_version)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&self.language)?);

        debug!(
            "Using bearer token for authentication: {}",
            mask(&token.access_token)
        );

        Ok(headers)
    }

    /// Client used for the token request, before any session headers exist.
    pub fn build_token_client(&self) -> Result<Client> {
        Ok(self.client_builder().build()?)
    }

    /// Client carrying the session headers for `token`.
    pub fn build_session_client(&self, token: &AccessToken) -> Result<Client> {
        let headers = self.session_headers(token)?;
        Ok(self.client_builder().default_headers(headers).build()?)
    }

    fn client_builder(&self) -> reqwest::ClientBuilder {
        let builder = Client::builder().user_agent(self.user_agent.as_str());
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| IcdError::configuration(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn token() -> AccessToken {
        AccessToken {
            access_token: "test_token".to_string(),
            expires_in: Some(3600),
            token_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, "http://id.who.int/icd");
        assert_eq!(
            options.token_endpoint,
            "https://icdaccessmanagement.who.int/connect/token"
        );
        assert_eq!(options.language, "en");
        assert_eq!(options.api_version, "v2");
        assert!(options.credentials_path.is_none());
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_session_headers() {
        let headers = ClientOptions::default().session_headers(&token()).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer test_token");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers["api-version"], "v2");
        assert_eq!(headers[ACCEPT_LANGUAGE], "en");
    }

    #[test]
    fn test_invalid_language_rejected() {
        let options = ClientOptions {
            language: "en\nX-Injected: 1".to_string(),
            ..ClientOptions::default()
        };
        let result = options.session_headers(&token());
        assert!(matches!(result, Err(IcdError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_session_client_sends_headers() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header("Authorization", Matcher::Exact("Bearer test_token".into()))
            .match_header("Accept", "application/json")
            .match_header("API-Version", "v2")
            .match_header("Accept-Language", "es")
            .create_async()
            .await;

        let options = ClientOptions {
            language: "es".to_string(),
            ..ClientOptions::default()
        };
        let client = options.build_session_client(&token()).unwrap();
        let _ = client.get(server.url()).send().await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_client_sends_no_authorization() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header("Authorization", Matcher::Missing)
            .create_async()
            .await;

        let client = ClientOptions::default().build_token_client().unwrap();
        let _ = client.get(server.url()).send().await;

        mock.assert_async().await;
    }
}

//! OAuth2 client-credentials flow against the WHO token endpoint.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IcdError, Result};
use crate::runtime::Runtime;

/// Credentials file looked up in the working directory when no path is given.
pub const DEFAULT_CREDENTIALS_FILE: &str = "config.json";

pub const TOKEN_SCOPE: &str = "icdapi_access";

/// API client id and secret, as issued by the ICD API portal.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "ClientId")]
    pub client_id: String,
    #[serde(rename = "ClientSecret")]
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl Credentials {
    /// Reads credentials from `path`, or from `config.json` in the current
    /// directory when `path` is `None`.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => runtime
                .current_dir()
                .map(|dir| dir.join(DEFAULT_CREDENTIALS_FILE))
                .map_err(|e| credentials_error(Path::new(DEFAULT_CREDENTIALS_FILE), e))?,
        };

        debug!("Loading credentials from {:?}...", path);

        let content = runtime
            .read_to_string(&path)
            .map_err(|e| credentials_error(&path, e))?;

        serde_json::from_str(&content).map_err(|e| IcdError::Credentials {
            path: path.clone(),
            message: format!("Expected ClientId and ClientSecret: {}", e),
        })
    }
}

fn credentials_error(path: &Path, error: anyhow::Error) -> IcdError {
    IcdError::Credentials {
        path: PathBuf::from(path),
        message: format!("{:#}", error),
    }
}

/// A bearer token returned by the token endpoint.
#[derive(Deserialize, Clone)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &mask(&self.access_token))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Shows at most the first and last four characters of a secret.
pub(crate) fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

/// Exchanges client credentials for a bearer token.
#[tracing::instrument(skip(client, credentials))]
pub async fn request_token(
    client: &Client,
    token_endpoint: &str,
    credentials: &Credentials,
) -> Result<AccessToken> {
    debug!("Requesting token from {}...", token_endpoint);

    let form = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("scope", TOKEN_SCOPE),
        ("grant_type", "client_credentials"),
    ];

    let response = client.post(token_endpoint).form(&form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(IcdError::Authorization {
            reason: format!("token endpoint returned HTTP {}", status.as_u16()),
        });
    }

    let token: AccessToken = serde_json::from_str(&body).map_err(|_| IcdError::Authorization {
        reason: "token endpoint response did not contain an access_token".to_string(),
    })?;

    debug!("Obtained access token {}", mask(&token.access_token));

    Ok(token)
}

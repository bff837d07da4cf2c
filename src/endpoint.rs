//! ICD-11 API endpoint templates.
//!
//! Foundation endpoints:
//! - `/icd/entity/{id}`
//! - `/icd/entity/search`
//!
//! Linearization endpoints:
//! - `/icd/release/11/{linearization}/{id}[/{residual}]`
//! - `/icd/release/11/{releaseId}/{linearization}/{id}[/{residual}]`
//! - `/icd/release/11/{releaseId}/{linearization}/codeinfo/{id}`
//! - `/icd/release/11/{releaseId}/{linearization}/search`

use std::time::Duration;

use crate::code::Icd11Code;

/// Public ICD API root.
pub const DEFAULT_BASE_URL: &str = "http://id.who.int/icd";

/// OAuth2 token endpoint of the WHO access management service.
pub const TOKEN_ENDPOINT: &str = "https://icdaccessmanagement.who.int/connect/token";

/// Minimum spacing between requests recommended by the API operators.
/// Not enforced by this crate.
pub const RATE_LIMIT: Duration = Duration::from_millis(500);

pub const DEFAULT_RELEASE_ID: &str = "2019-04";
pub const DEFAULT_LINEARIZATION: &str = "mms";

/// Where a single code is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// `{base}/entity/{code}`
    #[default]
    Foundation,
    /// `{base}/release/11/{linearization}/{code}[/{residual}]`
    Linearization {
        linearization: String,
        residual: Option<Icd11Code>,
    },
    /// `{base}/release/11/{release_id}/{linearization}/{code}[/{residual}]`
    Release {
        release_id: String,
        linearization: String,
        residual: Option<Icd11Code>,
    },
    /// `{base}/release/11/{release_id}/{linearization}/codeinfo/{code}`
    CodeInfo {
        release_id: String,
        linearization: String,
    },
}

impl Endpoint {
    /// Substitutes `code` into the template.
    pub fn url(&self, base_url: &str, code: &Icd11Code) -> String {
        let base_url = base_url.trim_end_matches('/');
        match self {
            Endpoint::Foundation => format!("{}/entity/{}", base_url, code),
            Endpoint::Linearization {
                linearization,
                residual,
            } => with_residual(
                format!("{}/release/11/{}/{}", base_url, linearization, code),
                residual.as_ref(),
            ),
            Endpoint::Release {
                release_id,
                linearization,
                residual,
            } => with_residual(
                format!(
                    "{}/release/11/{}/{}/{}",
                    base_url, release_id, linearization, code
                ),
                residual.as_ref(),
            ),
            Endpoint::CodeInfo {
                release_id,
                linearization,
            } => format!(
                "{}/release/11/{}/{}/codeinfo/{}",
                base_url, release_id, linearization, code
            ),
        }
    }
}

fn with_residual(url: String, residual: Option<&Icd11Code>) -> String {
    match residual {
        Some(residual) => format!("{}/{}", url, residual),
        None => url,
    }
}

/// Base URL for searching the foundation.
pub fn foundation_search_url(base_url: &str) -> String {
    format!("{}/entity/search", base_url.trim_end_matches('/'))
}

/// Base URL for searching one release of a linearization.
pub fn release_search_url(base_url: &str, release_id: &str, linearization: &str) -> String {
    format!(
        "{}/release/11/{}/{}/search",
        base_url.trim_end_matches('/'),
        release_id,
        linearization
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://id.who.int/icd";

    fn code(s: &str) -> Icd11Code {
        Icd11Code::new(s).unwrap()
    }

    #[test]
    fn test_foundation_url() {
        assert_eq!(
            Endpoint::Foundation.url(BASE, &code("257068234")),
            "http://id.who.int/icd/entity/257068234"
        );
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        assert_eq!(
            Endpoint::Foundation.url("http://id.who.int/icd/", &code("1")),
            "http://id.who.int/icd/entity/1"
        );
        assert_eq!(
            foundation_search_url("http://id.who.int/icd/"),
            "http://id.who.int/icd/entity/search"
        );
    }

    #[test]
    fn test_linearization_urls() {
        let endpoint = Endpoint::Linearization {
            linearization: "mms".to_string(),
            residual: None,
        };
        assert_eq!(
            endpoint.url(BASE, &code("1A00")),
            "http://id.who.int/icd/release/11/mms/1A00"
        );

        let endpoint = Endpoint::Linearization {
            linearization: "mms".to_string(),
            residual: Some(code("other")),
        };
        assert_eq!(
            endpoint.url(BASE, &code("1A00")),
            "http://id.who.int/icd/release/11/mms/1A00/other"
        );
    }

    #[test]
    fn test_release_urls() {
        let endpoint = Endpoint::Release {
            release_id: "2019-04".to_string(),
            linearization: "mms".to_string(),
            residual: None,
        };
        assert_eq!(
            endpoint.url(BASE, &code("1A00")),
            "http://id.who.int/icd/release/11/2019-04/mms/1A00"
        );

        let endpoint = Endpoint::Release {
            release_id: "2019-04".to_string(),
            linearization: "mms".to_string(),
            residual: Some(code("unspecified")),
        };
        assert_eq!(
            endpoint.url(BASE, &code("1A00")),
            "http://id.who.int/icd/release/11/2019-04/mms/1A00/unspecified"
        );
    }

    #[test]
    fn test_codeinfo_url() {
        let endpoint = Endpoint::CodeInfo {
            release_id: "2019-04".to_string(),
            linearization: "mms".to_string(),
        };
        assert_eq!(
            endpoint.url(BASE, &code("1A00")),
            "http://id.who.int/icd/release/11/2019-04/mms/codeinfo/1A00"
        );
    }

    #[test]
    fn test_release_search_url() {
        assert_eq!(
            release_search_url(BASE, "2019-04", "mms"),
            "http://id.who.int/icd/release/11/2019-04/mms/search"
        );
    }
}

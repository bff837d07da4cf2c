//! Search parameters and query-string construction.
//!
//! Every parameter is validated before a single character of the URL is
//! written, so a rejected search never reaches the transport. The order of
//! the emitted parameters is fixed, which keeps URLs byte-identical for
//! identical parameters.

use serde_json::Value;

use crate::code::json_type_name;
use crate::error::{IcdError, Result};

/// Filters accepted by the `search` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    pub query: String,
    pub subtrees_filter: Option<String>,
    pub chapter_filter: Option<String>,
    pub properties_to_search: Option<String>,
    pub flexi_search: bool,
    pub flat_results: bool,
    pub release_id: Option<String>,
    pub keyword_result: bool,
}

impl SearchParameters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            subtrees_filter: None,
            chapter_filter: None,
            properties_to_search: None,
            flexi_search: false,
            flat_results: true,
            release_id: None,
            keyword_result: false,
        }
    }

    pub fn subtrees_filter(mut self, filter: impl Into<String>) -> Self {
        self.subtrees_filter = Some(filter.into());
        self
    }

    pub fn chapter_filter(mut self, filter: impl Into<String>) -> Self {
        self.chapter_filter = Some(filter.into());
        self
    }

    pub fn properties_to_search(mut self, properties: impl Into<String>) -> Self {
        self.properties_to_search = Some(properties.into());
        self
    }

    pub fn flexi_search(mut self, enabled: bool) -> Self {
        self.flexi_search = enabled;
        self
    }

    pub fn flat_results(mut self, enabled: bool) -> Self {
        self.flat_results = enabled;
        self
    }

    pub fn release_id(mut self, release_id: impl Into<String>) -> Self {
        self.release_id = Some(release_id.into());
        self
    }

    pub fn keyword_result(mut self, enabled: bool) -> Self {
        self.keyword_result = enabled;
        self
    }

    /// Builds parameters from a loosely typed JSON object.
    ///
    /// String fields must be strings (or `null` for "not supplied"), flag
    /// fields must be booleans, `query` must be a string. Unknown keys are
    /// rejected. Both the long names and the short aliases `props_to_search`
    /// and `keyword_res` are accepted.
    pub fn from_json(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| {
            IcdError::configuration(format!(
                "Expected search parameters as an object, got: {}",
                json_type_name(value)
            ))
        })?;

        let query = match fields.get("query") {
            Some(Value::String(query)) => query.clone(),
            Some(other) => return Err(type_error("query", "str", other)),
            None => return Err(IcdError::configuration("Missing search query")),
        };
        let mut params = SearchParameters::new(query);

        for (name, value) in fields {
            match name.as_str() {
                "query" => {}
                "subtrees_filter" => params.subtrees_filter = optional_string(name, value)?,
                "chapter_filter" => params.chapter_filter = optional_string(name, value)?,
                "properties_to_search" | "props_to_search" => {
                    params.properties_to_search = optional_string(name, value)?
                }
                "release_id" => params.release_id = optional_string(name, value)?,
                "flexi_search" => params.flexi_search = boolean(name, value)?,
                "flat_results" => params.flat_results = boolean(name, value)?,
                "keyword_result" | "keyword_res" => params.keyword_result = boolean(name, value)?,
                unknown => {
                    return Err(IcdError::configuration(format!(
                        "Unknown search parameter: {}",
                        unknown
                    )));
                }
            }
        }

        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(IcdError::configuration("Expected a non-empty search query"));
        }
        Ok(())
    }
}

fn type_error(name: &str, expected: &str, got: &Value) -> IcdError {
    IcdError::configuration(format!(
        "Expected {} in {} format, got: {}",
        name,
        expected,
        json_type_name(got)
    ))
}

fn optional_string(name: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(type_error(name, "str", other)),
    }
}

fn boolean(name: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_error(name, "bool", value))
}

/// Appends the search parameters to `base_url` in their fixed order:
/// `q`, `subtreesFilter`, `chapterFilter`, `propertiesToBeSearched`,
/// `useFlexisearch`, `flatResults`, `releaseId`, `includeKeywordResult`.
pub fn build_search_url(base_url: &str, params: &SearchParameters) -> Result<String> {
    params.validate()?;

    let mut url = format!("{}?q={}", base_url, urlencoding::encode(&params.query));
    let mut push = |key: &str, value: &str| {
        url.push('&');
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    };

    if let Some(filter) = &params.subtrees_filter {
        push("subtreesFilter", filter);
    }
    if let Some(filter) = &params.chapter_filter {
        push("chapterFilter", filter);
    }
    if let Some(properties) = &params.properties_to_search {
        push("propertiesToBeSearched", properties);
    }
    push("useFlexisearch", bool_str(params.flexi_search));
    push("flatResults", bool_str(params.flat_results));
    if let Some(release_id) = &params.release_id {
        push("releaseId", release_id);
    }
    if params.keyword_result {
        push("includeKeywordResult", "true");
    }

    Ok(url)
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

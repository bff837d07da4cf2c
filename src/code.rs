//! ICD-11 code identifiers.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{IcdError, Result};

/// An opaque ICD-11 code or entity id (e.g. `1A00`, `257068234`).
///
/// Only emptiness is checked locally; the API decides whether the code exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icd11Code(String);

impl Icd11Code {
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(IcdError::configuration("Expected a non-empty ICD-11 code"));
        }
        Ok(Icd11Code(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Icd11Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Icd11Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Icd11Code {
    type Err = IcdError;

    fn from_str(s: &str) -> Result<Self> {
        Icd11Code::new(s)
    }
}

impl TryFrom<&str> for Icd11Code {
    type Error = IcdError;

    fn try_from(s: &str) -> Result<Self> {
        Icd11Code::new(s)
    }
}

impl TryFrom<String> for Icd11Code {
    type Error = IcdError;

    fn try_from(s: String) -> Result<Self> {
        Icd11Code::new(s)
    }
}

/// Codes arriving as loosely typed JSON must be strings.
impl TryFrom<&Value> for Icd11Code {
    type Error = IcdError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Icd11Code::new(s.as_str()),
            other => Err(IcdError::configuration(format!(
                "Expected ICD-11 code in string format, got: {}",
                json_type_name(other)
            ))),
        }
    }
}

/// Parses a whole list of codes, failing on the first invalid one.
pub fn parse_codes<I, S>(codes: I) -> Result<Vec<Icd11Code>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .enumerate()
        .map(|(index, code)| {
            Icd11Code::new(code.as_ref()).map_err(|_| {
                IcdError::configuration(format!(
                    "Expected a non-empty ICD-11 code at position {}",
                    index
                ))
            })
        })
        .collect()
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_parse() {
        let code: Icd11Code = "1A00".parse().unwrap();
        assert_eq!(code.as_str(), "1A00");
        assert_eq!(code.to_string(), "1A00");
    }

    #[test]
    fn test_code_empty_rejected() {
        assert!(matches!(
            "".parse::<Icd11Code>(),
            Err(IcdError::Configuration { .. })
        ));
        assert!("   ".parse::<Icd11Code>().is_err());
    }

    #[test]
    fn test_code_from_json_value() {
        let code = Icd11Code::try_from(&json!("2B3Z")).unwrap();
        assert_eq!(code.as_str(), "2B3Z");

        let err = Icd11Code::try_from(&json!(1234)).unwrap_err();
        assert!(err.to_string().contains("int"));

        assert!(Icd11Code::try_from(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_codes_reports_position() {
        let err = parse_codes(["1A00", "", "2B3Z"]).unwrap_err();
        assert!(err.to_string().contains("position 1"));

        let codes = parse_codes(vec!["1A00".to_string(), "2B3Z".to_string()]).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[1].as_str(), "2B3Z");
    }
}

//! File system operations.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine current directory")
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_read_to_string() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");

        std::fs::write(&file_path, r#"{"ClientId": "id"}"#).unwrap();

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, r#"{"ClientId": "id"}"#);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let missing = std::path::Path::new("/nonexistent/path/config.json");

        let err = runtime.read_to_string(missing).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_real_runtime_current_dir() {
        let runtime = RealRuntime;
        assert!(runtime.current_dir().unwrap().is_absolute());
    }
}

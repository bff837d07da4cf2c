//! Runtime abstraction for the few system operations the client performs.
//!
//! Reading the credentials file goes through [`Runtime`] so tests can supply
//! file contents without touching the disk.

mod fs;

use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Directory relative paths are resolved against.
    fn current_dir(&self) -> Result<PathBuf>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }
}

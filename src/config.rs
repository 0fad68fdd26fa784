//! Runtime configuration.
//!
//! The files root is injected explicitly rather than read from ambient
//! global state, so tests can point each run at an isolated temporary root.

use std::path::PathBuf;

/// Environment variable overriding the default files root.
pub const FILES_ROOT_ENV: &str = "STICKERMILL_FILES_ROOT";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory under which session working directories are created.
    pub files_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files_root: PathBuf::from("storage/files"),
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(FILES_ROOT_ENV) {
            Some(root) => Self {
                files_root: PathBuf::from(root),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_files_root() {
        let config = Config::default();
        assert_eq!(config.files_root, PathBuf::from("storage/files"));
    }
}

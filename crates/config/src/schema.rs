//! Settings schema for the env manager

use serde::{Deserialize, Serialize};

/// File loaded when no other file is configured
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Settings controlling which files are loaded and how they are exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettings {
    /// Env files parsed in order; later files override earlier keys
    #[serde(default = "default_files")]
    pub files: Vec<String>,
    /// Replace variables that are already set in the process on export
    #[serde(default = "default_true")]
    pub overwrite_existing: bool,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            files: default_files(),
            overwrite_existing: default_true(),
        }
    }
}

fn default_files() -> Vec<String> {
    vec![DEFAULT_ENV_FILE.to_string()]
}

fn default_true() -> bool {
    true
}

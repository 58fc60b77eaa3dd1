//! Collaborator interfaces for file content and the external environment

use crate::error::ConfigError;
use crate::utils::is_exportable_name;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of env file content
pub trait TextSource {
    /// Read the whole content of `path` as text
    fn read_text(&self, path: &Path) -> Result<String, ConfigError>;
}

/// Accessor for the external (process) environment
pub trait EnvironmentAccess {
    /// Look up a variable by name
    fn get(&self, name: &str) -> Option<String>;

    /// Set a variable
    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError>;
}

/// Reads files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl TextSource for FsSource {
    fn read_text(&self, path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|source| ConfigError::FileUnreadable {
            path: path.display().to_string(),
            source,
        })
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvironmentAccess for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        if !is_exportable_name(name) {
            return None;
        }
        std::env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        if !is_exportable_name(name) {
            return Err(ConfigError::ExportFailed {
                name: name.to_string(),
                reason: "name must be non-empty and contain no '=' or NUL".to_string(),
            });
        }
        if value.contains('\0') {
            return Err(ConfigError::ExportFailed {
                name: name.to_string(),
                reason: "value contains a NUL character".to_string(),
            });
        }
        std::env::set_var(name, value);
        Ok(())
    }
}

/// In-memory file contents keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl TextSource for MemorySource {
    fn read_text(&self, path: &Path) -> Result<String, ConfigError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ConfigError::FileUnreadable {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }
}

/// In-memory environment, isolated from the process
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvironmentAccess for MemoryEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

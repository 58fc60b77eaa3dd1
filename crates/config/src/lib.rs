//! Settings management for the env manager
//!
//! This crate handles loading and validation of the manager's own settings
//! from YAML files and `ENVMGR_`-prefixed environment variables.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{SettingsLoader, ENV_PREFIX};
pub use schema::*;
pub use validation::*;

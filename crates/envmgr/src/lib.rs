//! Env file management
//!
//! The [`EnvManager`] ties the workspace together: it loads one or more env
//! files into a resolved [`EnvironmentMap`], exports that map into the
//! external environment, and binds it into described structures.
//!
//! ```no_run
//! use envmgr::{EnvBind, EnvManager, Fields};
//!
//! #[derive(Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl EnvBind for Server {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.scalar("Host", |s| &mut s.host).default("127.0.0.1");
//!         fields.scalar("Port", |s| &mut s.port).env("PORT");
//!     }
//! }
//!
//! let manager = EnvManager::new([".env"]);
//! let server: Server = manager.load_and_bind()?;
//! # Ok::<(), envmgr::EnvError>(())
//! ```

pub mod export;
pub mod manager;

pub use export::export_map;
pub use manager::EnvManager;

pub use binder::{Binder, EnvBind, Fields};
pub use config::{ManagerSettings, SettingsLoader, SettingsValidator};
pub use types::{EnvError, EnvironmentAccess, EnvironmentMap, Result, TextSource};

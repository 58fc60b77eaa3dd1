//! Shared types for the envmgr workspace
//!
//! This crate contains the error types, the environment map shared between
//! the parser and the binder, the scalar value model used by the type cast
//! library, and the collaborator traits for reading files and accessing the
//! process environment.

pub mod access;
pub mod env;
pub mod error;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use access::{EnvironmentAccess, FsSource, MemoryEnv, MemorySource, ProcessEnv, TextSource};
pub use env::{EnvironmentMap, QuoteKind, RawEntry};
pub use error::{CastError, CastFailure, ConfigError, EnvError, Result};
pub use value::{Complex, Complex128, Complex64, PrimitiveKind, Value};

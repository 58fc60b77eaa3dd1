//! Typed configuration binding
//!
//! Structures describe their fields once through [`EnvBind`]; the [`Binder`]
//! walks that description depth-first, derives each lookup key, casts the
//! text it finds and assembles a fully populated value.

pub mod bind;
pub mod cast;
pub mod descriptor;
pub mod naming;

pub use bind::Binder;
pub use cast::{cast_list, cast_scalar};
pub use descriptor::{Bound, EnvBind, Field, FieldDescriptor, FieldKind, Fields, Primitive};
pub use naming::{join_prefix, resolve_key, to_upper_snake_case};

use types::{EnvironmentMap, ProcessEnv, Result};

/// Bind `T` from `vars`, falling back to the process environment
pub fn bind<T: EnvBind>(vars: &EnvironmentMap) -> Result<T> {
    Binder::new(vars, &ProcessEnv).bind()
}

//! Env file parsing
//!
//! This crate turns the text of `KEY=VALUE` files into a resolved
//! [`EnvironmentMap`]: the tokenizer applies the quoting and comment rules,
//! then every non-literal value goes through `${NAME}` substitution.

pub mod substitution;
pub mod tokenizer;

pub use substitution::{Substitutor, MAX_SUBSTITUTION_DEPTH};
pub use tokenizer::Tokenizer;

use std::collections::BTreeSet;
use tracing::debug;
use types::{EnvironmentAccess, EnvironmentMap, ProcessEnv, Result};

const INLINE_SOURCE: &str = "<inline>";

/// Parse `content` into a fresh map, falling back to the process environment
/// for references the content does not define.
pub fn parse(content: &str) -> Result<EnvironmentMap> {
    parse_with(content, &ProcessEnv)
}

/// Parse `content` into a fresh map with an explicit external environment
pub fn parse_with(content: &str, external: &dyn EnvironmentAccess) -> Result<EnvironmentMap> {
    let mut vars = EnvironmentMap::new();
    parse_into(INLINE_SOURCE, content, &mut vars, external)?;
    Ok(vars)
}

/// Parse the content of `file` into an existing map.
///
/// Later assignments override earlier ones, including those already in
/// `vars`. Only the keys assigned by this content are substituted. Returns
/// the number of assignments read.
pub fn parse_into(
    file: &str,
    content: &str,
    vars: &mut EnvironmentMap,
    external: &dyn EnvironmentAccess,
) -> Result<usize> {
    let entries = Tokenizer::new(file, content).tokenize()?;
    let count = entries.len();

    let mut pending = BTreeSet::new();
    for entry in entries {
        if entry.quote.is_literal() {
            pending.remove(&entry.key);
            vars.insert_literal(entry.key, entry.value);
        } else {
            pending.insert(entry.key.clone());
            vars.insert(entry.key, entry.value);
        }
    }

    Substitutor::new(vars, external).resolve_keys(pending.iter().map(String::as_str))?;
    debug!(file, assignments = count, "parsed env file");
    Ok(count)
}

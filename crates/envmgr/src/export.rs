//! Exporting a resolved map into the external environment

use tracing::{debug, trace, warn};
use types::utils::sanitize_for_logging;
use types::{EnvironmentAccess, EnvironmentMap, Result};

/// Set every variable of `map` in `env`.
///
/// Variables already set in `env` are kept unless `overwrite` is true.
/// Returns the number of variables written; the first failing write aborts.
pub fn export_map(map: &EnvironmentMap, env: &mut dyn EnvironmentAccess, overwrite: bool) -> Result<usize> {
    let mut written = 0;
    for (name, value) in map.iter() {
        if !overwrite && env.get(name).is_some() {
            warn!(variable = name, "variable already set, skipping export");
            continue;
        }
        trace!(variable = name, value = %sanitize_for_logging(value), "exporting variable");
        env.set(name, value)?;
        written += 1;
    }
    debug!(exported = written, skipped = map.len() - written, "exported environment map");
    Ok(written)
}

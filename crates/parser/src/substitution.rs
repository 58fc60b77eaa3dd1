//! `${NAME}` substitution with cycle detection and write-through memoization

use std::collections::HashSet;
use tracing::trace;
use types::{ConfigError, EnvironmentAccess, EnvironmentMap, Result};

/// Maximum nesting of `${NAME}` references resolved for one value
pub const MAX_SUBSTITUTION_DEPTH: usize = 10;

const OPEN_MARKER: &str = "${";
const CLOSE_MARKER: char = '}';

/// Resolves references against the in-progress map, falling back to the
/// external environment.
///
/// Resolved values of referenced keys are written back into the map, so a
/// later reference to the same key is a plain lookup.
pub struct Substitutor<'a> {
    vars: &'a mut EnvironmentMap,
    external: &'a dyn EnvironmentAccess,
}

impl<'a> Substitutor<'a> {
    pub fn new(vars: &'a mut EnvironmentMap, external: &'a dyn EnvironmentAccess) -> Self {
        Self { vars, external }
    }

    /// Substitute every reference in `value` (one top-level call)
    pub fn substitute(&mut self, value: &str) -> Result<String> {
        let mut visited = HashSet::new();
        self.substitute_at(value, 0, &mut visited)
    }

    /// Resolve the stored values of `keys` in place; literal and already
    /// resolved keys are left alone
    pub fn resolve_keys<'k, I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = &'k str>,
    {
        for key in keys {
            if self.vars.is_resolved(key) {
                continue;
            }
            let Some(raw) = self.vars.get(key).map(str::to_string) else {
                continue;
            };
            let resolved = self.substitute(&raw)?;
            self.vars.update(key, resolved);
        }
        Ok(())
    }

    fn substitute_at(
        &mut self,
        value: &str,
        depth: usize,
        visited: &mut HashSet<String>,
    ) -> Result<String> {
        if depth > MAX_SUBSTITUTION_DEPTH {
            return Err(ConfigError::DepthExceeded {
                max: MAX_SUBSTITUTION_DEPTH,
            }
            .into());
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(open) = rest.find(OPEN_MARKER) {
            let after = &rest[open + OPEN_MARKER.len()..];
            // an unclosed marker is kept as plain text
            let Some(close) = after.find(CLOSE_MARKER) else {
                break;
            };
            let name = &after[..close];
            out.push_str(&rest[..open]);
            out.push_str(&self.resolve(name, depth, visited)?);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn resolve(&mut self, name: &str, depth: usize, visited: &mut HashSet<String>) -> Result<String> {
        if let Some(cached) = self.vars.get(name) {
            if self.vars.is_resolved(name) || !cached.contains(OPEN_MARKER) {
                return Ok(cached.to_string());
            }
        }

        if visited.contains(name) {
            return Err(ConfigError::CircularReference {
                name: name.to_string(),
            }
            .into());
        }

        let raw = match self.vars.get(name) {
            Some(value) => value.to_string(),
            None => self
                .external
                .get(name)
                .ok_or_else(|| ConfigError::VariableNotFound {
                    name: name.to_string(),
                })?,
        };

        trace!(variable = name, depth, "resolving nested reference");
        visited.insert(name.to_string());
        let resolved = self.substitute_at(&raw, depth + 1, visited)?;
        if self.vars.contains_key(name) {
            self.vars.update(name, resolved.clone());
        }
        visited.remove(name);

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{EnvError, MemoryEnv};

    fn map(pairs: &[(&str, &str)]) -> EnvironmentMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_plain_value_is_unchanged() {
        let mut vars = map(&[]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);
        assert_eq!(sub.substitute("no markers here").unwrap(), "no markers here");
    }

    #[test]
    fn test_reference_is_spliced() {
        let mut vars = map(&[("OTHER", "42")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);
        assert_eq!(sub.substitute("answer=${OTHER}!").unwrap(), "answer=42!");
    }

    #[test]
    fn test_multiple_and_adjacent_references() {
        let mut vars = map(&[("HOST", "127.0.0.1"), ("PORT", "8080")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);
        assert_eq!(
            sub.substitute("http://${HOST}:${PORT}${PORT}").unwrap(),
            "http://127.0.0.1:80808080"
        );
    }

    #[test]
    fn test_nested_references_are_memoized() {
        let mut vars = map(&[("A", "${B}/a"), ("B", "${C}/b"), ("C", "root")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        assert_eq!(sub.substitute("${A}").unwrap(), "root/b/a");
        assert_eq!(vars.get("A"), Some("root/b/a"));
        assert_eq!(vars.get("B"), Some("root/b"));
    }

    #[test]
    fn test_falls_back_to_external_environment() {
        let mut vars = map(&[]);
        let external = MemoryEnv::new().with_var("HOME", "/home/app");
        let mut sub = Substitutor::new(&mut vars, &external);

        assert_eq!(sub.substitute("${HOME}/data").unwrap(), "/home/app/data");
        // external names are not copied into the map
        assert!(!vars.contains_key("HOME"));
    }

    #[test]
    fn test_map_takes_precedence_over_external() {
        let mut vars = map(&[("USER", "from-file")]);
        let external = MemoryEnv::new().with_var("USER", "from-process");
        let mut sub = Substitutor::new(&mut vars, &external);
        assert_eq!(sub.substitute("${USER}").unwrap(), "from-file");
    }

    #[test]
    fn test_missing_variable() {
        let mut vars = map(&[]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        let err = sub.substitute("${NOPE}").unwrap_err();
        assert!(matches!(
            err,
            EnvError::Config(ConfigError::VariableNotFound { ref name }) if name == "NOPE"
        ));
    }

    #[test]
    fn test_circular_reference() {
        let mut vars = map(&[("A", "${B}"), ("B", "${A}")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        let err = sub.substitute("${A}").unwrap_err();
        assert!(err.is_circular_reference());
    }

    #[test]
    fn test_self_reference_is_circular() {
        let mut vars = map(&[("A", "x${A}")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);
        assert!(sub.substitute("${A}").unwrap_err().is_circular_reference());
    }

    #[test]
    fn test_depth_limit_is_distinct_from_cycle() {
        // V00 -> V01 -> ... -> V12, no cycle but deeper than the limit
        let mut pairs: Vec<(String, String)> = (0..12)
            .map(|i| (format!("V{:02}", i), format!("${{V{:02}}}", i + 1)))
            .collect();
        pairs.push(("V12".to_string(), "end".to_string()));
        let mut vars: EnvironmentMap = pairs.into_iter().collect();
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        let err = sub.substitute("${V00}").unwrap_err();
        assert!(matches!(
            err,
            EnvError::Config(ConfigError::DepthExceeded { max: MAX_SUBSTITUTION_DEPTH })
        ));
    }

    #[test]
    fn test_chain_within_limit_resolves() {
        let mut pairs: Vec<(String, String)> = (0..5)
            .map(|i| (format!("V{:02}", i), format!("${{V{:02}}}", i + 1)))
            .collect();
        pairs.push(("V05".to_string(), "end".to_string()));
        let mut vars: EnvironmentMap = pairs.into_iter().collect();
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        assert_eq!(sub.substitute("${V00}").unwrap(), "end");
    }

    #[test]
    fn test_literal_values_are_spliced_verbatim() {
        let mut vars = EnvironmentMap::new();
        vars.insert_literal("RAW", "${NOT_A_REF}");
        vars.insert("USES_RAW", "${RAW}");
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        sub.resolve_keys(["RAW", "USES_RAW"]).unwrap();
        assert_eq!(vars.get("RAW"), Some("${NOT_A_REF}"));
        assert_eq!(vars.get("USES_RAW"), Some("${NOT_A_REF}"));
    }

    #[test]
    fn test_text_from_a_literal_is_not_substituted_again() {
        let mut vars = EnvironmentMap::new();
        vars.insert_literal("RAW", "${NOT_A_REF}");
        vars.insert("A", "${RAW}");
        vars.insert("B", "${A}");
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);

        sub.resolve_keys(["A", "B", "RAW"]).unwrap();
        assert_eq!(vars.get("A"), Some("${NOT_A_REF}"));
        assert_eq!(vars.get("B"), Some("${NOT_A_REF}"));

        // same outcome when B pulls A in through write-through first
        let mut vars = EnvironmentMap::new();
        vars.insert_literal("RAW", "${NOT_A_REF}");
        vars.insert("A", "${RAW}");
        vars.insert("B", "${A}");
        let mut sub = Substitutor::new(&mut vars, &external);

        sub.resolve_keys(["B", "A"]).unwrap();
        assert_eq!(sub.substitute("x${A}").unwrap(), "x${NOT_A_REF}");
        assert_eq!(vars.get("A"), Some("${NOT_A_REF}"));
        assert_eq!(vars.get("B"), Some("${NOT_A_REF}"));
    }

    #[test]
    fn test_unclosed_marker_is_kept() {
        let mut vars = map(&[("A", "1")]);
        let external = MemoryEnv::new();
        let mut sub = Substitutor::new(&mut vars, &external);
        assert_eq!(sub.substitute("${A} and ${B").unwrap(), "1 and ${B");
    }

    #[test]
    fn test_resolution_order_does_not_matter() {
        let pairs = [("A", "${B}-${C}"), ("B", "${C}"), ("C", "c")];
        let external = MemoryEnv::new();

        let mut forward = map(&pairs);
        Substitutor::new(&mut forward, &external)
            .resolve_keys(["A", "B", "C"])
            .unwrap();

        let mut backward = map(&pairs);
        Substitutor::new(&mut backward, &external)
            .resolve_keys(["C", "B", "A"])
            .unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward.get("A"), Some("c-c"));
    }
}

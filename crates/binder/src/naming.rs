//! Lookup key derivation for bound fields

/// Separator used between prefixes and names
pub const SEPARATOR: char = '_';

/// Convert `PascalCase`, `camelCase` or `snake_case` to `UPPER_SNAKE_CASE`.
///
/// Runs of capitals are kept together: `TLSCert` becomes `TLS_CERT`.
pub fn to_upper_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev_lower || (next_lower && chars[i - 1] != SEPARATOR);
            if boundary && !result.ends_with(SEPARATOR) {
                result.push(SEPARATOR);
            }
        }
        result.extend(c.to_uppercase());
    }
    result
}

/// Join a parent prefix and a name, omitting the separator for an empty prefix
pub fn join_prefix(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}{}{}", prefix, SEPARATOR, name),
    }
}

/// The final lookup key of a field: the explicit name if any, otherwise the
/// converted field name, qualified by `prefix`
pub fn resolve_key(explicit: Option<&str>, field_name: &str, prefix: &str) -> String {
    let name = match explicit {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => to_upper_snake_case(field_name),
    };
    join_prefix(prefix, &name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_and_camel_case() {
        assert_eq!(to_upper_snake_case("AppName"), "APP_NAME");
        assert_eq!(to_upper_snake_case("appName"), "APP_NAME");
        assert_eq!(to_upper_snake_case("Host"), "HOST");
    }

    #[test]
    fn test_abbreviations_stay_together() {
        assert_eq!(to_upper_snake_case("TLSCert"), "TLS_CERT");
        assert_eq!(to_upper_snake_case("APPName"), "APP_NAME");
        assert_eq!(to_upper_snake_case("APPPort"), "APP_PORT");
        assert_eq!(to_upper_snake_case("JWT"), "JWT");
        assert_eq!(to_upper_snake_case("RefreshTokenTTL"), "REFRESH_TOKEN_TTL");
    }

    #[test]
    fn test_snake_case_input() {
        assert_eq!(to_upper_snake_case("app_name"), "APP_NAME");
        assert_eq!(to_upper_snake_case("app_Name"), "APP_NAME");
        assert_eq!(to_upper_snake_case("max_connections2"), "MAX_CONNECTIONS2");
    }

    #[test]
    fn test_digits_before_capitals() {
        assert_eq!(to_upper_snake_case("Http2Port"), "HTTP2_PORT");
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("", "HOST"), "HOST");
        assert_eq!(join_prefix("EMAIL", "HOST"), "EMAIL_HOST");
        assert_eq!(join_prefix("APP", ""), "APP");
        assert_eq!(join_prefix(&join_prefix("APP", "DB"), "URL"), "APP_DB_URL");
    }

    #[test]
    fn test_resolve_key() {
        assert_eq!(resolve_key(None, "AppSeed", ""), "APP_SEED");
        assert_eq!(resolve_key(Some("SEED"), "AppSeed", ""), "SEED");
        assert_eq!(resolve_key(Some("SEED"), "AppSeed", "APP"), "APP_SEED");
        assert_eq!(resolve_key(None, "Host", "EMAIL"), "EMAIL_HOST");
        assert_eq!(resolve_key(Some(""), "Port", "EMAIL"), "EMAIL_PORT");
    }
}

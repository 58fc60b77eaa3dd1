//! Utility functions and helpers

/// Whether `name` can be used as a process environment variable name
pub fn is_exportable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.contains('\0')
}

/// Sanitize a value for logging (never print full values)
pub fn sanitize_for_logging(s: &str) -> String {
    let count = s.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }

    // Show the first 3 characters and the length
    let head: String = s.chars().take(3).collect();
    format!("{}... ({} chars)", head, count)
}

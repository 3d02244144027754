//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::config::MAX_CONCURRENCY;

/// Validate a root package name.
///
/// Surrounding whitespace is trimmed. Registry-specific spelling rules are
/// left to the registry, which answers 404 for names it does not know.
pub fn validate_package_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Package name cannot be empty".to_string());
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Package name cannot contain whitespace: '{s}'"));
    }

    if s.chars().any(char::is_control) {
        return Err("Package name cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate the worker count: 1 to [`MAX_CONCURRENCY`].
pub fn validate_concurrency(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if n == 0 {
        return Err("Concurrency must be at least 1".to_string());
    }
    if n > MAX_CONCURRENCY {
        return Err(format!("Concurrency cannot exceed {MAX_CONCURRENCY}"));
    }

    Ok(n)
}

/// Validate a timeout in whole seconds (at least 1).
pub fn validate_timeout(s: &str) -> Result<u64, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number of seconds"))?;

    if secs == 0 {
        return Err("Timeout must be at least 1 second".to_string());
    }

    Ok(secs)
}

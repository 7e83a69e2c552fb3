//! Environment variable helpers shared by the pool and service config.

use std::str::FromStr;

/// Read `key` and parse it, falling back to `default` when unset or malformed.
///
/// ```ignore
/// let max: u32 = parse_env_with_default("DB_MAX_CONNECTIONS", 20);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// `None` when the variable is missing, empty, or does not parse.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    let raw = std::env::var(key).map_err(|_| format!("{key} environment variable not set"))?;
    raw.trim()
        .parse()
        .map_err(|_| format!("{key} has an invalid value: {raw}"))
}

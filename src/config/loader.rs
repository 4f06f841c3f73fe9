//! Typed lookups over an environment-like source.

use crate::error::ConfigError;
use std::str::FromStr;

/// Value of `name`, or `default` when unset.
pub fn string_or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).unwrap_or_else(|| default.to_string())
}

/// Value of `name` parsed as `T`, or `default` when unset or unparsable.
pub fn int_or_default<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Value of `name` parsed as `T`. Unset or unparsable values are errors.
pub fn int_or_fail<T, F>(lookup: &F, name: &str, expected: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).ok_or_else(|| ConfigError::Missing(name.to_string()))?;
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        expected,
    })
}

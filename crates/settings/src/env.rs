// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::error::SettingsError;

/// Reads `var`, falling back to `default` when unset or blank.
pub(crate) fn env_or(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Reads and parses `var` as `T`, falling back to `default` when unset or
/// blank. A set-but-unparseable value is a hard configuration error.
pub(crate) fn parse_env_or<T>(var: &'static str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| SettingsError::InvalidValue {
                    var,
                    value,
                    details: e.to_string(),
                })
        }
        _ => Ok(default),
    }
}

// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised while parsing environment-variable configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// An environment variable was set but could not be parsed as its
    /// expected type.
    #[error("invalid value for {var}='{value}': {details}")]
    InvalidValue {
        var: &'static str,
        value: String,
        details: String,
    },
}

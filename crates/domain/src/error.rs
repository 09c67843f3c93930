// SPDX-License-Identifier: Apache-2.0

//! Validation errors raised while constructing or updating domain entities.

use thiserror::Error;

/// A request violated one of the domain's field-level invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A percent-valued field fell outside `[0, 100]`.
    #[error("field '{field}' must be within [0, 100], got {value}")]
    PercentOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value, formatted for display.
        value: String,
    },

    /// A string field exceeded its maximum length.
    #[error("field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// The configured maximum length.
        max: usize,
        /// The actual length received.
        actual: usize,
    },

    /// A required string field was empty.
    #[error("field '{field}' must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A port number was outside the valid `u16` range as documented (0-65535 is
    /// always representable, this only fires for fields parsed from untyped JSON).
    #[error("field 'port' must be within [0, 65535]")]
    InvalidPort,

    /// A bounded integer field (e.g. a pagination limit) fell outside its
    /// documented `[min, max]` range.
    #[error("field '{field}' must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    /// A task-type, job-status, or role-preference string did not match any
    /// known alias.
    #[error("unrecognized {kind} value '{raw}'")]
    UnknownEnumValue {
        /// The kind of enum being parsed, e.g. "task_type".
        kind: &'static str,
        /// The raw string that failed to parse.
        raw: String,
    },
}

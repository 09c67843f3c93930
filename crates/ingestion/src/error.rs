// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use edgemesh_domain::ValidationError;

/// Errors raised while registering or heartbeating a node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    /// A field failed a domain validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Operator-expressed preference steering the scheduler's role-match bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RolePreference {
    /// No preference; matches both GPU and CPU task families.
    #[default]
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "PREFER_INFERENCE")]
    PreferInference,
    #[serde(rename = "PREFER_EMBEDDINGS")]
    PreferEmbeddings,
    #[serde(rename = "PREFER_PREPROCESS")]
    PreferPreprocess,
}

impl RolePreference {
    fn as_str(self) -> &'static str {
        match self {
            RolePreference::Auto => "AUTO",
            RolePreference::PreferInference => "PREFER_INFERENCE",
            RolePreference::PreferEmbeddings => "PREFER_EMBEDDINGS",
            RolePreference::PreferPreprocess => "PREFER_PREPROCESS",
        }
    }
}

impl FromStr for RolePreference {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Ok(RolePreference::Auto),
            "PREFER_INFERENCE" => Ok(RolePreference::PreferInference),
            "PREFER_EMBEDDINGS" => Ok(RolePreference::PreferEmbeddings),
            "PREFER_PREPROCESS" => Ok(RolePreference::PreferPreprocess),
            other => Err(ValidationError::UnknownEnumValue {
                kind: "role_preference",
                raw: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RolePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

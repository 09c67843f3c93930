// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// The kind of AI-adjacent work a job performs, and a node may be capable of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Model inference, typically GPU-bound.
    #[serde(rename = "INFERENCE")]
    Inference,
    /// Embedding generation.
    #[serde(rename = "EMBEDDINGS")]
    Embeddings,
    /// Document or vector indexing.
    #[serde(rename = "INDEX")]
    Index,
    /// Text tokenization.
    #[serde(rename = "TOKENIZE")]
    Tokenize,
    /// Input preprocessing.
    #[serde(rename = "PREPROCESS")]
    Preprocess,
}

impl TaskType {
    /// All task types, in a stable order. Used as the default `task_types` /
    /// `task_allowlist` set when none is specified.
    pub const ALL: [TaskType; 5] = [
        TaskType::Inference,
        TaskType::Embeddings,
        TaskType::Index,
        TaskType::Tokenize,
        TaskType::Preprocess,
    ];

    /// The canonical uppercase wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Inference => "INFERENCE",
            TaskType::Embeddings => "EMBEDDINGS",
            TaskType::Index => "INDEX",
            TaskType::Tokenize => "TOKENIZE",
            TaskType::Preprocess => "PREPROCESS",
        }
    }

    /// Parses a lenient alias such as `"infer"`, `"embed"`, or
    /// `"preprocessing"`, case-insensitively. Used for both HTTP query/body
    /// parsing and for deriving task types from free-form capability labels.
    pub fn parse_alias(raw: &str) -> Option<TaskType> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "INFER" | "INFERENCE" => Some(TaskType::Inference),
            "EMBED" | "EMBEDDING" | "EMBEDDINGS" => Some(TaskType::Embeddings),
            "INDEX" => Some(TaskType::Index),
            "TOKENIZE" => Some(TaskType::Tokenize),
            "PREPROCESS" | "PREPROCESSING" => Some(TaskType::Preprocess),
            _ => None,
        }
    }
}

impl FromStr for TaskType {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        TaskType::parse_alias(raw).ok_or_else(|| ValidationError::UnknownEnumValue {
            kind: "task_type",
            raw: raw.to_string(),
        })
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

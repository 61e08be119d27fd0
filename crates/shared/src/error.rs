use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the blog API returns alongside a non-success status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Server-provided reason, if it sent a non-blank one.
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown blog status '{0}', expected 'draft' or 'published'")]
    UnknownStatus(String),
    #[error("category filter must not be empty")]
    EmptyCategory,
}

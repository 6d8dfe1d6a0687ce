use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload the category service attaches to non-2xx responses.
///
/// Only `message` is read; anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Extracts a non-blank `message` from a raw response body, if the body is JSON and has one.
    pub fn parse_message(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order '{0}', expected 'asc' or 'desc'")]
pub struct ParseSortOrderError(pub String);

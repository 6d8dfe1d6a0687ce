//! UI/backend events and error modeling for the admin GUI controller.

use client_core::{error::StatusCode, ClientError, ClientResult};
use shared::domain::{CategoryId, CategoryPage};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    CategoriesFetched {
        generation: u64,
        result: ClientResult<CategoryPage>,
    },
    CategoryDeleted,
    DeleteFailed(ClientError),
    /// The post-delete delay for `category_id` elapsed; its confirmation can close.
    DeleteSettled {
        category_id: CategoryId,
    },
    CategoryCreated {
        name: String,
    },
    CreateFailed(ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchCategories,
    DeleteCategory,
    CreateCategory,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("invalid token")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("404") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("required")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Banner-worthy request failures: unreachable service, rejected credentials, missing
    /// records and unreadable responses. Other API errors are left to toasts.
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Option<Self> {
        let category = match err {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Decode { .. } => UiErrorCategory::Validation,
            ClientError::Api { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UiErrorCategory::Auth,
                StatusCode::NOT_FOUND => UiErrorCategory::NotFound,
                _ => return None,
            },
            ClientError::InvalidBaseUrl { .. }
            | ClientError::UnsupportedBaseUrl(_)
            | ClientError::HttpClientInit(_) => return None,
        };
        Some(Self {
            category,
            context,
            message: err.to_string(),
        })
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Backend worker failed to start",
            UiErrorContext::FetchCategories => "Loading categories failed",
            UiErrorContext::DeleteCategory => "Deleting the category failed",
            UiErrorContext::CreateCategory => "Creating the category failed",
            UiErrorContext::General => "Something went wrong",
        };
        let hint = match self.category {
            UiErrorCategory::Auth => " Check the configured token or session cookie.",
            UiErrorCategory::Transport => " Check the API base URL and network.",
            UiErrorCategory::Validation | UiErrorCategory::NotFound | UiErrorCategory::Unknown => {
                ""
            }
        };
        format!("{what}: {}.{hint}", self.message.trim_end_matches('.'))
    }
}

//! Application-level errors.
//!
//! Each layer keeps its own `thiserror` enum; `AppError` aggregates them for
//! callers that only need a toast message.

use mople_paging::FetchError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::Network(_)) => {
                "Please check your network connection and try again."
            }
            AppError::Fetch(FetchError::Server { .. }) => {
                "Something went wrong. Please try again later."
            }
            AppError::Fetch(FetchError::Application(_)) => "This item is no longer available.",
            AppError::Storage(_) => "Could not save your settings.",
            AppError::Config(_) => "The app is misconfigured.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Fetch(err) if err.is_retryable())
    }
}

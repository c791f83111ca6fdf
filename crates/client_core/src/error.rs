use std::fmt;

use shared::{domain::LaptopId, error::ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Which read produced a [`ClientError::FetchFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Collection,
    Item,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => f.write_str("laptops"),
            Self::Item => f.write_str("laptop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FetchFailed,
    NotFound,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
    ValidationFailed,
}

/// Every failure a laptops operation can report. The `Display` text is the
/// user-facing message pages show verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Failed to fetch {target}: {detail}")]
    FetchFailed { target: FetchTarget, detail: String },
    #[error("Failed to fetch laptop: {detail}")]
    NotFound { id: LaptopId, detail: String },
    #[error("Failed to create laptop: {detail}")]
    CreateFailed { detail: String },
    #[error("Failed to update laptop: {detail}")]
    UpdateFailed { detail: String },
    #[error("Failed to delete laptop: {detail}")]
    DeleteFailed { detail: String },
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CreateFailed { .. } => ErrorKind::CreateFailed,
            Self::UpdateFailed { .. } => ErrorKind::UpdateFailed,
            Self::DeleteFailed { .. } => ErrorKind::DeleteFailed,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
        }
    }

    /// `NotFound` is a specialisation of a failed fetch.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::FetchFailed | ErrorKind::NotFound)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Problems building a [`crate::LaptopClient`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

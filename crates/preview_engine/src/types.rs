use std::fmt;

use preview_core::PreviewViewModel;

use crate::{DecodeError, ExtractError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why a single link ended up with the error sentinel.
///
/// Cache write failures are deliberately absent: they are logged and the
/// freshly extracted preview is kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("cache read failed: {0}")]
    StoreRead(String),
    #[error("fetch failed: {0}")]
    Network(#[from] FetchError),
    #[error("could not parse document: {0}")]
    Parse(#[from] DecodeError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// A fresh cache entry was served; no request was made.
    CacheHit,
    /// The page was fetched and extracted. `persisted` is false when the
    /// cache write failed.
    Fetched { persisted: bool },
    Failed(PreviewError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The floating preview element was attached to the document.
    Mounted,
    /// The host never signalled that it finished bootstrapping.
    BootstrapFailed { reason: String },
    /// A fresh session was bound and its links dispatched.
    PageActivated {
        epoch: u64,
        location: String,
        links: usize,
    },
    /// One link's preview settled.
    PreviewResolved {
        epoch: u64,
        url: String,
        outcome: PreviewOutcome,
    },
    /// The floating preview changed.
    Rendered(PreviewViewModel),
}

use std::fmt;

use crate::api::{ClipEntry, StatusResponse, SubmitError, SubmitResponse};
use crate::thumbnail::FitOutcome;

pub type PollId = u64;
pub type TickId = u64;
pub type FitId = u64;

/// Results delivered back to the application loop, tagged with the ids of
/// the command that produced them.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Submitted {
        poll: PollId,
        result: Result<SubmitResponse, SubmitError>,
    },
    PollTick {
        poll: PollId,
    },
    Status {
        poll: PollId,
        tick: TickId,
        result: Result<StatusResponse, FetchError>,
    },
    Clips {
        poll: PollId,
        result: Result<Vec<ClipEntry>, FetchError>,
    },
    Fitted {
        fit: FitId,
        outcome: FitOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: bytes::Bytes,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    /// URL actually requested, after origin/proxy routing.
    pub requested_url: String,
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
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
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
    Decode,
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
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

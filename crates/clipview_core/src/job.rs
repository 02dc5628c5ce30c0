use std::fmt;

use bytes::Bytes;

/// Generation number of one submission. Engine results carry it back so
/// responses for a superseded submission can be dropped.
pub type PollId = u64;

/// Sequence number of one status query within a submission.
pub type TickId = u64;

/// Sequence number of one crop-engine invocation.
pub type FitId = u64;

/// Handle for one resize-listener registration.
pub type ListenerId = u64;

/// Status reported by the job processor.
///
/// Anything other than the three well-known values is an intermediate
/// processing sub-state and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing(String),
    Finished,
    Error,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => JobStatus::Queued,
            "finished" => JobStatus::Finished,
            "error" => JobStatus::Error,
            other => JobStatus::Processing(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing(raw) => raw,
            JobStatus::Finished => "finished",
            JobStatus::Error => "error",
        }
    }

    /// `finished` and `error` end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status poll result.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub thumbnail: Option<String>,
    pub clips_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub url: String,
    /// Offset into the source video, in seconds.
    pub start: Option<f64>,
}

/// Image shown on the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewImage {
    /// Referenced by URL, not fetched or not analyzed.
    Remote(String),
    /// Bytes produced or fetched by the crop engine.
    Encoded { bytes: Bytes, content_type: String },
}

/// Display-ready image plus its aspect ratio (width / height).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailView {
    pub image: PreviewImage,
    pub aspect_ratio: Option<f64>,
}

impl ThumbnailView {
    /// A view for an image URL whose dimensions are not known yet.
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            image: PreviewImage::Remote(url.into()),
            aspect_ratio: None,
        }
    }
}

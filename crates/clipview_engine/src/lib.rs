//! Clipview engine: job API client, crop engine, poll timer and effect execution.
mod api;
mod engine;
mod fetch;
pub mod letterbox;
mod thumbnail;
mod types;

pub use api::{
    error_detail, ClipEntry, ClipMeta, HttpJobApi, JobApi, StatusResponse, SubmitError,
    SubmitResponse,
};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{route_image_url, FetchSettings, ImageFetcher, ReqwestFetcher, PROXY_PATH};
pub use letterbox::Borders;
pub use thumbnail::{analyze, FitOutcome, FittedThumbnail, ThumbnailFitter, ThumbnailImage};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FitId, PollId, TickId,
};

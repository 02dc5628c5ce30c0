use std::time::Duration;

use clipview_core::{Clip, Effect, JobSnapshot, JobStatus, Msg, PreviewImage, ThumbnailView};
use clipview_engine::{
    ClipEntry, EngineEvent, EngineHandle, FitOutcome, StatusResponse, SubmitError, ThumbnailImage,
};
use clipview_logging::{clip_debug, clip_info, clip_warn};

use crate::resize::ResizeListeners;

/// Runs core effects against the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    listeners: ResizeListeners,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            listeners: ResizeListeners::default(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { poll, url, platform } => {
                    clip_info!("SubmitJob poll={} platform={} url={}", poll, platform, url);
                    self.engine.submit(poll, url, platform);
                }
                Effect::StartPolling { poll, interval } => {
                    self.engine.start_polling(poll, interval);
                }
                Effect::CancelPolling { poll } => {
                    self.engine.cancel_polling(poll);
                }
                Effect::QueryStatus {
                    poll,
                    tick,
                    video_id,
                } => {
                    clip_debug!("QueryStatus poll={} tick={} job={}", poll, tick, video_id);
                    self.engine.query_status(poll, tick, video_id);
                }
                Effect::FetchClips { poll, video_id } => {
                    clip_info!("FetchClips poll={} job={}", poll, video_id);
                    self.engine.fetch_clips(poll, video_id);
                }
                Effect::FitThumbnail { fit, url } => {
                    clip_info!("FitThumbnail fit={} url={}", fit, url);
                    self.engine.fit_thumbnail(fit, url);
                }
                Effect::RegisterResize { listener } => self.listeners.register(listener),
                Effect::DeregisterResize { listener } => self.listeners.deregister(listener),
            }
        }
    }

    /// Next engine result as a message, waiting at most `timeout`.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn listeners(&self) -> &ResizeListeners {
        &self.listeners
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { poll, result } => match result {
            Ok(response) => Msg::SubmissionAccepted {
                poll,
                video_id: response.video_id,
                status: JobStatus::parse(&response.status),
            },
            Err(SubmitError::Rejected { status, detail }) => {
                clip_warn!("Submission rejected poll={} status={}", poll, status);
                Msg::SubmissionRejected { poll, detail }
            }
            Err(SubmitError::Transport(err)) => {
                clip_warn!("Submission failed poll={} error={}", poll, err);
                Msg::SubmissionFailed {
                    poll,
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::PollTick { poll } => Msg::PollTick { poll },
        EngineEvent::Status { poll, tick, result } => match result {
            Ok(response) => Msg::StatusReceived {
                poll,
                tick,
                snapshot: map_status(response),
            },
            Err(err) => {
                clip_warn!("Status query failed poll={} tick={}: {}", poll, tick, err);
                Msg::StatusFailed { poll, tick }
            }
        },
        EngineEvent::Clips { poll, result } => match result {
            Ok(entries) => Msg::ClipsReceived {
                poll,
                clips: entries.into_iter().map(map_clip).collect(),
            },
            Err(err) => {
                clip_warn!("Clip list query failed poll={}: {}", poll, err);
                Msg::ClipsFailed { poll }
            }
        },
        EngineEvent::Fitted { fit, outcome } => {
            match &outcome {
                FitOutcome::Cropped { borders, .. } => clip_info!(
                    "Thumbnail fit={} cropped to rows {}..={}",
                    fit,
                    borders.top,
                    borders.bottom
                ),
                FitOutcome::Unanalyzed { reason, .. } => {
                    clip_warn!("Thumbnail fit={} not analyzed: {}", fit, reason)
                }
                FitOutcome::Original { error, .. } => {
                    clip_warn!("Thumbnail fit={} fell back to original: {}", fit, error)
                }
                FitOutcome::Uncropped { .. } => clip_debug!("Thumbnail fit={} uncropped", fit),
            }
            let fitted = outcome.into_view();
            Msg::ThumbnailFitted {
                fit,
                view: ThumbnailView {
                    image: map_image(fitted.image),
                    aspect_ratio: fitted.aspect_ratio,
                },
            }
        }
    }
}

fn map_status(response: StatusResponse) -> JobSnapshot {
    JobSnapshot {
        status: JobStatus::parse(&response.status),
        thumbnail: response.thumbnail,
        clips_count: response.clips_count,
    }
}

fn map_clip(entry: ClipEntry) -> Clip {
    Clip {
        url: entry.url,
        start: entry.meta.and_then(|meta| meta.start),
    }
}

fn map_image(image: ThumbnailImage) -> PreviewImage {
    match image {
        ThumbnailImage::Url(url) => PreviewImage::Remote(url),
        ThumbnailImage::Bytes { data, content_type } => PreviewImage::Encoded {
            bytes: data,
            content_type,
        },
    }
}

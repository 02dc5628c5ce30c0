use crate::{Clip, FitId, JobSnapshot, JobStatus, PollId, ThumbnailView, TickId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a video URL.
    Submitted { url: String, platform: String },
    /// The processor accepted the job.
    SubmissionAccepted {
        poll: PollId,
        video_id: String,
        status: JobStatus,
    },
    /// The processor answered with a non-success response.
    SubmissionRejected { poll: PollId, detail: String },
    /// The submission request never got an answer.
    SubmissionFailed { poll: PollId, message: String },
    /// Poll timer fired.
    PollTick { poll: PollId },
    StatusReceived {
        poll: PollId,
        tick: TickId,
        snapshot: JobSnapshot,
    },
    /// A status query failed; the next tick retries.
    StatusFailed { poll: PollId, tick: TickId },
    ClipsReceived { poll: PollId, clips: Vec<Clip> },
    ClipsFailed { poll: PollId },
    /// Crop engine finished one fit.
    ThumbnailFitted { fit: FitId, view: ThumbnailView },
    /// Viewport width changed.
    SurfaceResized { width: f64 },
}

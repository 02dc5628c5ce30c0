use std::time::Duration;

use crate::{FitId, ListenerId, PollId, TickId};

/// Work the shell performs on behalf of `update`. Results come back as
/// [`crate::Msg`] values tagged with the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob {
        poll: PollId,
        url: String,
        platform: String,
    },
    /// Start the recurring status timer. Any other live timer has already
    /// been cancelled by a preceding `CancelPolling`.
    StartPolling { poll: PollId, interval: Duration },
    CancelPolling { poll: PollId },
    QueryStatus {
        poll: PollId,
        tick: TickId,
        video_id: String,
    },
    FetchClips { poll: PollId, video_id: String },
    FitThumbnail { fit: FitId, url: String },
    RegisterResize { listener: ListenerId },
    DeregisterResize { listener: ListenerId },
}

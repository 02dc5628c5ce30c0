//! Clipview core: pure job-tracking state machine and view-model helpers.
mod effect;
mod fit;
mod job;
mod msg;
mod provider;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use fit::PreviewSurface;
pub use job::{
    Clip, FitId, JobSnapshot, JobStatus, ListenerId, PollId, PreviewImage, ThumbnailView, TickId,
};
pub use msg::Msg;
pub use provider::resolve_placeholder;
pub use state::{AppState, SessionPhase, DEFAULT_SURFACE_WIDTH, POLL_INTERVAL};
pub use update::update;
pub use view_model::{AppViewModel, ClipListView, ClipRowView, PreviewView};

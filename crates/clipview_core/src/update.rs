use crate::{AppState, Effect, Msg, POLL_INTERVAL};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submitted { url, platform } => {
            let url = url.trim().to_string();
            // Blank input is not a submission; the active job keeps polling.
            if url.is_empty() {
                return (state, Vec::new());
            }
            state.begin_submission(url, platform)
        }
        Msg::SubmissionAccepted {
            poll,
            video_id,
            status,
        } => state.accept_submission(poll, video_id, status, POLL_INTERVAL),
        Msg::SubmissionRejected { poll, detail } => {
            state.reject_submission(poll, format!("Error: {detail}"));
            Vec::new()
        }
        Msg::SubmissionFailed { poll, message } => {
            state.reject_submission(poll, format!("Request failed: {message}"));
            Vec::new()
        }
        Msg::PollTick { poll } => state.next_status_query(poll).into_iter().collect(),
        Msg::StatusReceived {
            poll,
            tick,
            snapshot,
        } => state.apply_status(poll, tick, snapshot),
        Msg::ClipsReceived { poll, clips } => {
            state.apply_clips(poll, Some(clips));
            Vec::new()
        }
        Msg::ClipsFailed { poll } => {
            state.apply_clips(poll, None);
            Vec::new()
        }
        Msg::ThumbnailFitted { fit, view } => state.apply_fit(fit, view),
        Msg::SurfaceResized { width } => {
            state.resize_surface(width);
            Vec::new()
        }
        // Swallowed: the next tick queries again.
        Msg::StatusFailed { .. } => Vec::new(),
    };

    (state, effects)
}

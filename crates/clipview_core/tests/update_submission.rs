use std::collections::HashSet;
use std::sync::Once;

use clipview_core::{
    update, AppState, Effect, JobSnapshot, JobStatus, Msg, PreviewImage, SessionPhase,
    ThumbnailView,
};
use pretty_assertions::assert_eq;

const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=ttgAy7Z630Q";
const PLACEHOLDER: &str = "https://img.youtube.com/vi/ttgAy7Z630Q/hqdefault.jpg";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(clipview_logging::initialize_for_tests);
}

fn submit(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Submitted {
            url: url.to_string(),
            platform: "auto".to_string(),
        },
    )
}

fn accept(state: AppState, poll: u64, video_id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SubmissionAccepted {
            poll,
            video_id: video_id.to_string(),
            status: JobStatus::Queued,
        },
    )
}

/// Net number of live poll timers implied by a stream of effects.
fn live_timers(effects: &[Effect]) -> i64 {
    effects.iter().fold(0, |live, effect| match effect {
        Effect::StartPolling { .. } => live + 1,
        Effect::CancelPolling { .. } => live - 1,
        _ => live,
    })
}

#[test]
fn placeholder_is_shown_before_the_request_is_sent() {
    init_logging();
    let (state, effects) = submit(AppState::new(), YOUTUBE_URL);

    assert_eq!(
        effects,
        vec![
            Effect::FitThumbnail {
                fit: 1,
                url: PLACEHOLDER.to_string(),
            },
            Effect::SubmitJob {
                poll: 1,
                url: YOUTUBE_URL.to_string(),
                platform: "auto".to_string(),
            },
        ]
    );
    assert_eq!(
        state.view().preview.background,
        Some(PreviewImage::Remote(PLACEHOLDER.to_string()))
    );

    // Acceptance keeps the placeholder on screen.
    let (state, effects) = accept(state, 1, "job-1");
    assert_eq!(live_timers(&effects), 1);
    assert_eq!(
        state.view().preview.background,
        Some(PreviewImage::Remote(PLACEHOLDER.to_string()))
    );
}

#[test]
fn fitted_placeholder_replaces_raw_placeholder() {
    init_logging();
    let (state, _) = submit(AppState::new(), YOUTUBE_URL);
    let cropped = ThumbnailView {
        image: PreviewImage::Encoded {
            bytes: bytes::Bytes::from_static(b"jpeg"),
            content_type: "image/jpeg".to_string(),
        },
        aspect_ratio: Some(16.0 / 9.0),
    };

    let (state, effects) = update(
        state,
        Msg::ThumbnailFitted {
            fit: 1,
            view: cropped.clone(),
        },
    );
    assert_eq!(effects, vec![Effect::RegisterResize { listener: 1 }]);
    assert_eq!(state.view().preview.background, Some(cropped.image));
}

#[test]
fn rejected_submission_shows_detail_and_never_polls() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com/v.mp4");
    let (state, effects) = update(
        state,
        Msg::SubmissionRejected {
            poll: 1,
            detail: "unsupported platform".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status_text, "Error: unsupported platform");
    assert_eq!(state.phase(), SessionPhase::Rejected);
    assert!(state.is_settled());

    let (state, effects) = update(state, Msg::PollTick { poll: 1 });
    assert!(effects.is_empty());
    assert!(!state.is_polling());
}

#[test]
fn transport_failure_is_reported() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com/v.mp4");
    let (state, _) = update(
        state,
        Msg::SubmissionFailed {
            poll: 1,
            message: "connection refused".to_string(),
        },
    );
    assert_eq!(state.view().status_text, "Request failed: connection refused");
}

#[test]
fn second_submission_supersedes_first_timer() {
    init_logging();
    let mut effects = Vec::new();

    let (state, step) = submit(AppState::new(), "https://example.com/first.mp4");
    effects.extend(step);
    let (state, step) = accept(state, 1, "job-1");
    effects.extend(step);
    assert_eq!(live_timers(&effects), 1);

    let (state, step) = submit(state, "https://example.com/second.mp4");
    assert_eq!(step.first(), Some(&Effect::CancelPolling { poll: 1 }));
    effects.extend(step);
    let (state, step) = accept(state, 2, "job-2");
    effects.extend(step);
    assert_eq!(live_timers(&effects), 1);

    // Nothing addressed to the first job is processed anymore.
    let (state, step) = update(state, Msg::PollTick { poll: 1 });
    assert!(step.is_empty());
    let (state, step) = update(
        state,
        Msg::StatusReceived {
            poll: 1,
            tick: 1,
            snapshot: JobSnapshot {
                status: JobStatus::Finished,
                thumbnail: Some("/t/old.jpg".to_string()),
                clips_count: Some(4),
            },
        },
    );
    assert!(step.is_empty());
    assert_eq!(state.view().status_text, "Queued job: job-2 - status: queued");
    assert_eq!(state.view().job_id.as_deref(), Some("job-2"));

    let (_state, step) = update(state, Msg::PollTick { poll: 2 });
    assert_eq!(
        step,
        vec![Effect::QueryStatus {
            poll: 2,
            tick: 1,
            video_id: "job-2".to_string(),
        }]
    );
}

#[test]
fn blank_submission_leaves_live_job_untouched() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com/first.mp4");
    let (mut state, _) = accept(state, 1, "job-1");
    state.consume_dirty();
    let before = state.view();

    let (mut state, effects) = submit(state, "   ");
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view(), before);
    assert!(state.is_polling());
    assert_eq!(state.phase(), SessionPhase::Polling);

    let (_state, effects) = update(state, Msg::PollTick { poll: 1 });
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            poll: 1,
            tick: 1,
            video_id: "job-1".to_string(),
        }]
    );
}

#[test]
fn late_acceptance_of_superseded_submission_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com/first.mp4");
    let (state, _) = submit(state, "https://example.com/second.mp4");

    let (state, effects) = accept(state, 1, "job-1");
    assert!(effects.is_empty());
    assert_eq!(state.phase(), SessionPhase::Submitting);
    assert!(!state.is_polling());
}

#[test]
fn new_job_without_placeholder_clears_previous_thumbnail() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com/first.mp4");
    let (state, _) = accept(state, 1, "job-1");
    let (state, _) = update(state, Msg::PollTick { poll: 1 });
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            poll: 1,
            tick: 1,
            snapshot: JobSnapshot {
                status: JobStatus::parse("processing"),
                thumbnail: Some("/t/first.jpg".to_string()),
                clips_count: None,
            },
        },
    );

    let (state, _) = submit(state, "https://example.com/second.mp4");
    // The first job's fit completes after the new submission began.
    let (state, effects) = update(
        state,
        Msg::ThumbnailFitted {
            fit: 1,
            view: ThumbnailView::remote("/t/first.jpg"),
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = accept(state, 2, "job-2");
    assert_eq!(live_timers(&effects), 1);
    assert_eq!(state.view().preview.background, None);
    assert_eq!(state.view().preview.height, None);
}

#[test]
fn resize_listeners_never_accumulate() {
    init_logging();
    let mut registry = HashSet::new();
    let mut apply = |effects: &[Effect]| {
        for effect in effects {
            match effect {
                Effect::RegisterResize { listener } => {
                    assert!(registry.insert(*listener));
                }
                Effect::DeregisterResize { listener } => {
                    assert!(registry.remove(listener));
                }
                _ => {}
            }
        }
        registry.len()
    };

    let (mut state, effects) = submit(AppState::new(), YOUTUBE_URL);
    assert_eq!(apply(&effects), 0);
    let mut fit = 1;
    for (round, ratio) in [Some(16.0 / 9.0), Some(4.0 / 3.0), None, Some(2.0)]
        .into_iter()
        .enumerate()
    {
        let (next, effects) = update(
            state,
            Msg::ThumbnailFitted {
                fit,
                view: ThumbnailView {
                    image: PreviewImage::Remote(format!("/t/{round}.jpg")),
                    aspect_ratio: ratio,
                },
            },
        );
        assert!(apply(&effects) <= 1);
        assert_eq!(apply(&[]), usize::from(ratio.is_some()));

        let (next, _) = update(
            next,
            Msg::SubmissionAccepted {
                poll: 1,
                video_id: "job-1".to_string(),
                status: JobStatus::Queued,
            },
        );
        let (next, _) = update(next, Msg::PollTick { poll: 1 });
        let (next, effects) = update(
            next,
            Msg::StatusReceived {
                poll: 1,
                tick: round as u64 + 1,
                snapshot: JobSnapshot {
                    status: JobStatus::parse("processing"),
                    thumbnail: Some(format!("/t/next-{round}.jpg")),
                    clips_count: None,
                },
            },
        );
        fit = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::FitThumbnail { fit, .. } => Some(*fit),
                _ => None,
            })
            .expect("fit requested for new thumbnail");
        state = next;
    }

    let (state, effects) = submit(state, "https://example.com/other.mp4");
    apply(&effects);
    let (_state, effects) = accept(state, 2, "job-2");
    assert_eq!(apply(&effects), 0);
}

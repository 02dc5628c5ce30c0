mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use clipview_engine::{
    ClipEntry, EngineEvent, EngineHandle, FetchError, FetchMetadata, FetchOutput, ImageFetcher,
    JobApi, StatusResponse, SubmitError, SubmitResponse,
};

use support::{init_logging, letterboxed, png_bytes};

#[derive(Default)]
struct FakeApi {
    statuses: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl JobApi for FakeApi {
    async fn submit(
        &self,
        video_url: &str,
        _platform: &str,
    ) -> Result<SubmitResponse, SubmitError> {
        Ok(SubmitResponse {
            video_id: format!("job-for-{}", video_url.len()),
            status: "queued".to_string(),
        })
    }

    async fn status(&self, video_id: &str) -> Result<StatusResponse, FetchError> {
        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(video_id)
            .cloned()
            .unwrap_or_else(|| "queued".to_string());
        Ok(StatusResponse {
            status,
            thumbnail: None,
            clips_count: None,
        })
    }

    async fn clips(&self, video_id: &str) -> Result<Vec<ClipEntry>, FetchError> {
        Ok(vec![ClipEntry {
            url: format!("/clips/{video_id}/0.mp4"),
            meta: None,
        }])
    }
}

struct PngFetcher;

#[async_trait]
impl ImageFetcher for PngFetcher {
    async fn fetch_image(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let bytes = Bytes::from(png_bytes(&letterboxed(100, 80, 10, 10)));
        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                requested_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("image/png".to_string()),
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

fn engine() -> EngineHandle {
    init_logging();
    EngineHandle::with_services(Arc::new(FakeApi::default()), Arc::new(PngFetcher))
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

fn drain(engine: &EngineHandle) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Some(event) = engine.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn submit_result_is_tagged_with_poll() {
    let engine = engine();
    engine.submit(4, "https://youtu.be/abc", "youtube");

    match engine.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::Submitted { poll, result }) => {
            assert_eq!(poll, 4);
            assert_eq!(result.unwrap().status, "queued");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn status_and_clips_echo_their_ids() {
    let engine = engine();
    engine.query_status(2, 7, "job-x");
    engine.fetch_clips(2, "job-x");

    let mut saw_status = false;
    let mut saw_clips = false;
    for _ in 0..2 {
        match engine.recv_timeout(Duration::from_secs(5)) {
            Some(EngineEvent::Status { poll, tick, result }) => {
                assert_eq!((poll, tick), (2, 7));
                assert_eq!(result.unwrap().status, "queued");
                saw_status = true;
            }
            Some(EngineEvent::Clips { poll, result }) => {
                assert_eq!(poll, 2);
                assert_eq!(result.unwrap()[0].url, "/clips/job-x/0.mp4");
                saw_clips = true;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(saw_status && saw_clips);
}

#[test]
fn poll_timer_ticks_until_cancelled() {
    let engine = engine();
    engine.start_polling(1, Duration::from_millis(10));

    let first = engine.recv_timeout(Duration::from_secs(5));
    assert!(matches!(first, Some(EngineEvent::PollTick { poll: 1 })));
    assert_eq!(engine.live_timers(), 1);

    engine.cancel_polling(1);
    assert!(wait_until(|| engine.live_timers() == 0));

    drain(&engine);
    std::thread::sleep(Duration::from_millis(50));
    assert!(drain(&engine).is_empty());
}

#[test]
fn restarting_polling_keeps_a_single_timer() {
    let engine = engine();
    engine.start_polling(1, Duration::from_millis(10));
    engine.start_polling(2, Duration::from_millis(10));
    engine.start_polling(3, Duration::from_millis(10));

    assert!(wait_until(|| matches!(
        engine.try_recv(),
        Some(EngineEvent::PollTick { poll: 3 })
    )));
    assert!(wait_until(|| engine.live_timers() == 1));
    drain(&engine);
    std::thread::sleep(Duration::from_millis(60));
    let ticks = drain(&engine);
    assert!(!ticks.is_empty());
    assert!(ticks
        .iter()
        .all(|event| matches!(event, EngineEvent::PollTick { poll: 3 })));

    engine.cancel_polling(3);
    assert!(wait_until(|| engine.live_timers() == 0));
}

#[test]
fn cancelling_a_superseded_poll_leaves_live_timer_alone() {
    let engine = engine();
    engine.start_polling(1, Duration::from_millis(10));
    engine.start_polling(2, Duration::from_millis(10));
    engine.cancel_polling(1);
    engine.cancel_polling(1);

    assert!(wait_until(|| engine.live_timers() == 1));
    assert!(wait_until(|| matches!(
        engine.try_recv(),
        Some(EngineEvent::PollTick { poll: 2 })
    )));
}

#[test]
fn fit_result_is_tagged_with_fit_id() {
    let engine = engine();
    engine.fit_thumbnail(11, "/thumbs/job.png");

    match engine.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::Fitted { fit, outcome }) => {
            assert_eq!(fit, 11);
            assert_eq!(outcome.label(), "cropped");
            assert_eq!(outcome.view().aspect_ratio, Some(100.0 / 60.0));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

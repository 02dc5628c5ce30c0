use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clipview_logging::{clip_debug, clip_info};
use tokio::runtime::Runtime;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::{HttpJobApi, JobApi};
use crate::fetch::{FetchSettings, ImageFetcher, ReqwestFetcher};
use crate::thumbnail::ThumbnailFitter;
use crate::{EngineEvent, FetchError, FitId, PollId, TickId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Origin serving the job API and the thumbnail proxy.
    pub origin: Url,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            fetch: FetchSettings::default(),
        }
    }
}

enum EngineCommand {
    Submit {
        poll: PollId,
        url: String,
        platform: String,
    },
    StartPolling {
        poll: PollId,
        interval: Duration,
    },
    CancelPolling {
        poll: PollId,
    },
    QueryStatus {
        poll: PollId,
        tick: TickId,
        video_id: String,
    },
    FetchClips {
        poll: PollId,
        video_id: String,
    },
    Fit {
        fit: FitId,
        url: String,
    },
}

/// The single live poll timer.
struct PollTimer {
    poll: PollId,
    token: CancellationToken,
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    live_timers: Arc<AtomicUsize>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, FetchError> {
        let api = Arc::new(HttpJobApi::new(config.origin.clone(), &config.fetch)?);
        let fetcher = Arc::new(ReqwestFetcher::new(config.origin, config.fetch));
        Ok(Self::with_services(api, fetcher))
    }

    /// Build an engine over explicit job-API and image-fetch capabilities.
    pub fn with_services(api: Arc<dyn JobApi>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let live_timers = Arc::new(AtomicUsize::new(0));
        let live = live_timers.clone();

        thread::spawn(move || {
            let runtime = Runtime::new().expect("tokio runtime");
            let fitter = ThumbnailFitter::new(fetcher);
            let mut timer: Option<PollTimer> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { poll, interval } => {
                        // Never two timers: the old one goes before the new one starts.
                        if let Some(previous) = timer.take() {
                            previous.token.cancel();
                        }
                        timer = Some(spawn_timer(
                            &runtime,
                            poll,
                            interval,
                            event_tx.clone(),
                            live.clone(),
                        ));
                    }
                    EngineCommand::CancelPolling { poll } => {
                        if timer.as_ref().is_some_and(|t| t.poll == poll) {
                            if let Some(current) = timer.take() {
                                current.token.cancel();
                                clip_debug!("Poll timer cancelled poll={}", poll);
                            }
                        }
                    }
                    command => {
                        let api = api.clone();
                        let fitter = fitter.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), &fitter, command, event_tx).await;
                        });
                    }
                }
            }

            if let Some(current) = timer.take() {
                current.token.cancel();
            }
        });

        Self {
            cmd_tx,
            event_rx,
            live_timers,
        }
    }

    pub fn submit(&self, poll: PollId, url: impl Into<String>, platform: impl Into<String>) {
        self.send(EngineCommand::Submit {
            poll,
            url: url.into(),
            platform: platform.into(),
        });
    }

    pub fn start_polling(&self, poll: PollId, interval: Duration) {
        self.send(EngineCommand::StartPolling { poll, interval });
    }

    /// Idempotent; cancelling a poll that is not live does nothing.
    pub fn cancel_polling(&self, poll: PollId) {
        self.send(EngineCommand::CancelPolling { poll });
    }

    pub fn query_status(&self, poll: PollId, tick: TickId, video_id: impl Into<String>) {
        self.send(EngineCommand::QueryStatus {
            poll,
            tick,
            video_id: video_id.into(),
        });
    }

    pub fn fetch_clips(&self, poll: PollId, video_id: impl Into<String>) {
        self.send(EngineCommand::FetchClips {
            poll,
            video_id: video_id.into(),
        });
    }

    pub fn fit_thumbnail(&self, fit: FitId, url: impl Into<String>) {
        self.send(EngineCommand::Fit {
            fit,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Number of poll timer tasks still running.
    pub fn live_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn spawn_timer(
    runtime: &Runtime,
    poll: PollId,
    interval: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
    live: Arc<AtomicUsize>,
) -> PollTimer {
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let period = interval.max(Duration::from_millis(1));
    live.fetch_add(1, Ordering::SeqCst);
    clip_info!("Poll timer started poll={} interval_ms={}", poll, period.as_millis());

    runtime.spawn(async move {
        // First tick one period after start, like a browser interval.
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => {
                    if event_tx.send(EngineEvent::PollTick { poll }).is_err() {
                        break;
                    }
                }
            }
        }
        live.fetch_sub(1, Ordering::SeqCst);
    });

    PollTimer { poll, token }
}

async fn handle_command(
    api: &dyn JobApi,
    fitter: &ThumbnailFitter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit {
            poll,
            url,
            platform,
        } => EngineEvent::Submitted {
            poll,
            result: api.submit(&url, &platform).await,
        },
        EngineCommand::QueryStatus {
            poll,
            tick,
            video_id,
        } => EngineEvent::Status {
            poll,
            tick,
            result: api.status(&video_id).await,
        },
        EngineCommand::FetchClips { poll, video_id } => EngineEvent::Clips {
            poll,
            result: api.clips(&video_id).await,
        },
        EngineCommand::Fit { fit, url } => EngineEvent::Fitted {
            fit,
            outcome: fitter.fit(&url).await,
        },
        EngineCommand::StartPolling { .. } | EngineCommand::CancelPolling { .. } => return,
    };
    let _ = event_tx.send(event);
}

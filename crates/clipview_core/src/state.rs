use std::time::Duration;

use crate::view_model::{AppViewModel, ClipListView, ClipRowView, PreviewView};
use crate::{
    resolve_placeholder, Clip, Effect, FitId, JobSnapshot, JobStatus, PollId, PreviewSurface,
    ThumbnailView, TickId,
};

/// Fixed cadence of status queries.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub const DEFAULT_SURFACE_WIDTH: f64 = 640.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Finished,
    Failed,
    /// Submission was refused or never reached the processor.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ClipList {
    #[default]
    Empty,
    NoneProduced,
    Entries(Vec<Clip>),
}

/// The one job this session tracks.
#[derive(Debug, Clone, PartialEq)]
struct ActiveJob {
    poll: PollId,
    video_id: Option<String>,
    phase: SessionPhase,
    timer_live: bool,
    had_placeholder: bool,
    clips_resolved: bool,
    next_tick: TickId,
    last_applied_tick: Option<TickId>,
    last_thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    job: Option<ActiveJob>,
    next_poll: PollId,
    status_text: String,
    clips: ClipList,
    preview: PreviewSurface,
    next_fit: FitId,
    latest_fit: Option<FitId>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_surface_width(DEFAULT_SURFACE_WIDTH)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface_width(width: f64) -> Self {
        Self {
            job: None,
            next_poll: 1,
            status_text: String::new(),
            clips: ClipList::Empty,
            preview: PreviewSurface::new(width),
            next_fit: 1,
            latest_fit: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let clips = match &self.clips {
            ClipList::Empty => ClipListView::Empty,
            ClipList::NoneProduced => ClipListView::NoClips,
            ClipList::Entries(clips) => ClipListView::Entries(
                clips
                    .iter()
                    .map(|clip| ClipRowView {
                        url: clip.url.clone(),
                        label: clip
                            .start
                            .map(|start| format!("start: {start}s"))
                            .unwrap_or_default(),
                    })
                    .collect(),
            ),
        };

        AppViewModel {
            phase: self.phase(),
            job_id: self.job.as_ref().and_then(|job| job.video_id.clone()),
            status_text: self.status_text.clone(),
            polling: self.is_polling(),
            clips,
            preview: PreviewView {
                background: self.preview.background().cloned(),
                width: self.preview.width(),
                height: self.preview.height(),
                aspect_ratio: self.preview.aspect_ratio(),
            },
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.job.as_ref().map(|job| job.phase).unwrap_or_default()
    }

    /// True while the status timer of the active job is running.
    pub fn is_polling(&self) -> bool {
        self.job.as_ref().is_some_and(|job| job.timer_live)
    }

    /// True once nothing further is expected for the active job, including
    /// the crop of the last thumbnail it requested.
    pub fn is_settled(&self) -> bool {
        if self.is_fit_pending() {
            return false;
        }
        match self.phase() {
            SessionPhase::Failed | SessionPhase::Rejected => true,
            SessionPhase::Finished => self.job.as_ref().is_some_and(|job| job.clips_resolved),
            SessionPhase::Idle | SessionPhase::Submitting | SessionPhase::Polling => false,
        }
    }

    /// A requested fit whose result has not been applied yet.
    pub fn is_fit_pending(&self) -> bool {
        self.latest_fit.is_some()
    }

    pub fn preview(&self) -> &PreviewSurface {
        &self.preview
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Enter `Submitting` for a new URL, superseding any active job.
    pub(crate) fn begin_submission(&mut self, url: String, platform: String) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(previous) = self.job.take() {
            if previous.timer_live {
                effects.push(Effect::CancelPolling {
                    poll: previous.poll,
                });
            }
        }

        let poll = self.next_poll;
        self.next_poll += 1;
        self.status_text = "Queuing...".to_string();
        // Nothing started for an earlier job may land on the surface now.
        self.latest_fit = None;

        let placeholder = resolve_placeholder(&url);
        if let Some(thumbnail) = placeholder.as_deref() {
            effects.extend(self.preview.apply(Some(ThumbnailView::remote(thumbnail))));
            effects.push(self.request_fit(thumbnail.to_string()));
        }

        self.job = Some(ActiveJob {
            poll,
            video_id: None,
            phase: SessionPhase::Submitting,
            timer_live: false,
            had_placeholder: placeholder.is_some(),
            clips_resolved: false,
            next_tick: 1,
            last_applied_tick: None,
            last_thumbnail: placeholder,
        });
        self.mark_dirty();

        effects.push(Effect::SubmitJob {
            poll,
            url,
            platform,
        });
        effects
    }

    pub(crate) fn accept_submission(
        &mut self,
        poll: PollId,
        video_id: String,
        status: JobStatus,
        interval: Duration,
    ) -> Vec<Effect> {
        let Some(job) = self.submitting_job_mut(poll) else {
            return Vec::new();
        };
        job.video_id = Some(video_id.clone());
        job.phase = SessionPhase::Polling;
        job.timer_live = true;
        let had_placeholder = job.had_placeholder;

        self.status_text = format!("Queued job: {video_id} - status: {status}");
        self.clips = ClipList::Empty;

        let mut effects = Vec::new();
        if !had_placeholder {
            self.latest_fit = None;
            effects.extend(self.preview.apply(None));
        }
        effects.push(Effect::StartPolling { poll, interval });
        self.mark_dirty();
        effects
    }

    pub(crate) fn reject_submission(&mut self, poll: PollId, text: String) {
        let Some(job) = self.submitting_job_mut(poll) else {
            return;
        };
        job.phase = SessionPhase::Rejected;
        self.status_text = text;
        self.mark_dirty();
    }

    /// Allocate the next status query for a live timer.
    pub(crate) fn next_status_query(&mut self, poll: PollId) -> Option<Effect> {
        let job = self.live_job_mut(poll)?;
        let video_id = job.video_id.clone()?;
        let tick = job.next_tick;
        job.next_tick += 1;
        Some(Effect::QueryStatus {
            poll,
            tick,
            video_id,
        })
    }

    pub(crate) fn apply_status(
        &mut self,
        poll: PollId,
        tick: TickId,
        snapshot: JobSnapshot,
    ) -> Vec<Effect> {
        let Some(job) = self
            .job
            .as_mut()
            .filter(|job| job.poll == poll && job.timer_live)
        else {
            return Vec::new();
        };
        // A slower response for an earlier tick must not overwrite a newer one.
        if job.last_applied_tick.is_some_and(|applied| tick < applied) {
            return Vec::new();
        }
        job.last_applied_tick = Some(tick);
        let video_id = job.video_id.clone().unwrap_or_default();

        let fresh_thumbnail = snapshot.thumbnail.filter(|thumb| {
            !thumb.is_empty() && job.last_thumbnail.as_deref() != Some(thumb.as_str())
        });
        if let Some(thumb) = &fresh_thumbnail {
            job.last_thumbnail = Some(thumb.clone());
        }

        let mut effects = Vec::new();
        if snapshot.status.is_terminal() {
            job.timer_live = false;
            effects.push(Effect::CancelPolling { poll });
        }

        self.status_text = match &snapshot.status {
            JobStatus::Finished => {
                job.phase = SessionPhase::Finished;
                effects.push(Effect::FetchClips {
                    poll,
                    video_id: video_id.clone(),
                });
                format!(
                    "Job {video_id} - finished ({} clips)",
                    snapshot.clips_count.unwrap_or(0)
                )
            }
            JobStatus::Error => {
                job.phase = SessionPhase::Failed;
                format!("Job {video_id} - error")
            }
            status => format!("Job {video_id} - {status}"),
        };

        if let Some(thumb) = fresh_thumbnail {
            effects.push(self.request_fit(thumb));
        }
        self.mark_dirty();
        effects
    }

    pub(crate) fn apply_clips(&mut self, poll: PollId, clips: Option<Vec<Clip>>) {
        let finished = self
            .job
            .as_ref()
            .is_some_and(|job| job.poll == poll && job.phase == SessionPhase::Finished);
        if !finished {
            return;
        }
        self.clips = match clips {
            Some(clips) if clips.is_empty() => ClipList::NoneProduced,
            Some(clips) => ClipList::Entries(clips),
            None => ClipList::Empty,
        };
        if let Some(job) = self.job.as_mut() {
            job.clips_resolved = true;
        }
        self.mark_dirty();
    }

    /// Show a fitted thumbnail if it is the most recently requested one.
    pub(crate) fn apply_fit(&mut self, fit: FitId, view: ThumbnailView) -> Vec<Effect> {
        if self.latest_fit != Some(fit) {
            return Vec::new();
        }
        self.latest_fit = None;
        self.mark_dirty();
        self.preview.apply(Some(view))
    }

    pub(crate) fn resize_surface(&mut self, width: f64) {
        self.preview.resize(width);
        self.mark_dirty();
    }

    fn request_fit(&mut self, url: String) -> Effect {
        let fit = self.next_fit;
        self.next_fit += 1;
        self.latest_fit = Some(fit);
        Effect::FitThumbnail { fit, url }
    }

    fn submitting_job_mut(&mut self, poll: PollId) -> Option<&mut ActiveJob> {
        self.job
            .as_mut()
            .filter(|job| job.poll == poll && job.phase == SessionPhase::Submitting)
    }

    fn live_job_mut(&mut self, poll: PollId) -> Option<&mut ActiveJob> {
        self.job
            .as_mut()
            .filter(|job| job.poll == poll && job.timer_live)
    }
}

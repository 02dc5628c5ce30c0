use crate::{PreviewImage, SessionPhase};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: SessionPhase,
    pub job_id: Option<String>,
    pub status_text: String,
    pub polling: bool,
    pub clips: ClipListView,
    pub preview: PreviewView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipListView {
    /// Nothing to show yet, or the clip query failed.
    #[default]
    Empty,
    /// The job finished without producing clips.
    NoClips,
    Entries(Vec<ClipRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRowView {
    pub url: String,
    /// `start: {N}s`, or empty when the clip has no start offset.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewView {
    pub background: Option<PreviewImage>,
    pub width: f64,
    pub height: Option<f64>,
    pub aspect_ratio: Option<f64>,
}

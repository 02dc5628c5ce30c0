use std::sync::LazyLock;

use regex::Regex;

/// Long-form (`youtube.com/watch?v=`, `/embed/`, `/v/`, `/e/`, `/shorts/`,
/// `/<user>/<anything>/`) and short-form (`youtu.be/`) links. The capture
/// group is the 11-character video id.
const VIDEO_LINK_PATTERN: &str = r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?|shorts)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#;

/// `None` if the pattern failed to compile; callers then see "no match".
static VIDEO_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(VIDEO_LINK_PATTERN).ok());

/// Derive a provider-hosted placeholder thumbnail from a raw video URL.
///
/// Best effort only: a result says nothing about whether the video exists.
pub fn resolve_placeholder(url: &str) -> Option<String> {
    let pattern = VIDEO_LINK.as_ref()?;
    let captures = pattern.captures(url.trim())?;
    let id = captures.get(1)?.as_str();
    Some(format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
}

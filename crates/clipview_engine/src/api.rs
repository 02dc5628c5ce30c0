use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::fetch::map_reqwest_error;
use crate::{FailureKind, FetchError, FetchSettings};

#[derive(Debug, Clone, Serialize)]
struct SubmitRequest<'a> {
    video_url: &'a str,
    platform: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub video_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub clips_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipEntry {
    pub url: String,
    #[serde(default)]
    pub meta: Option<ClipMeta>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipMeta {
    #[serde(default)]
    pub start: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClipsResponse {
    #[serde(default)]
    clips: Vec<ClipEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The processor answered with a non-success status.
    #[error("submission rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error(transparent)]
    Transport(#[from] FetchError),
}

/// External job-processor capability.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn submit(&self, video_url: &str, platform: &str)
        -> Result<SubmitResponse, SubmitError>;
    async fn status(&self, video_id: &str) -> Result<StatusResponse, FetchError>;
    async fn clips(&self, video_id: &str) -> Result<Vec<ClipEntry>, FetchError>;
}

/// [`JobApi`] over HTTP against the processor's origin.
#[derive(Debug, Clone)]
pub struct HttpJobApi {
    base: Url,
    client: reqwest::Client,
}

impl HttpJobApi {
    pub fn new(base: Url, settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobApi for HttpJobApi {
    async fn submit(
        &self,
        video_url: &str,
        platform: &str,
    ) -> Result<SubmitResponse, SubmitError> {
        let url = self.endpoint(&["process-by-url"])?;
        let body = serde_json::to_vec(&SubmitRequest {
            video_url,
            platform,
        })
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let payload = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                detail: error_detail(&payload),
            });
        }
        serde_json::from_slice(&payload).map_err(|err| {
            SubmitError::Transport(FetchError::new(FailureKind::Decode, err.to_string()))
        })
    }

    async fn status(&self, video_id: &str) -> Result<StatusResponse, FetchError> {
        let url = self.endpoint(&["status", video_id])?;
        self.get_json(url).await
    }

    async fn clips(&self, video_id: &str) -> Result<Vec<ClipEntry>, FetchError> {
        let url = self.endpoint(&["clips", video_id])?;
        let response: ClipsResponse = self.get_json(url).await?;
        Ok(response.clips)
    }
}

/// Message for a rejected submission: the payload's `detail` when it has a
/// usable one, the payload itself otherwise.
pub fn error_detail(payload: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(payload) else {
        return String::from_utf8_lossy(payload).trim().to_string();
    };
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail) if !matches!(detail, Value::Null | Value::Bool(false) | Value::String(_)) => {
            detail.to_string()
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::error_detail;

    #[test]
    fn string_detail_is_used_verbatim() {
        assert_eq!(error_detail(br#"{"detail":"video_url missing"}"#), "video_url missing");
    }

    #[test]
    fn structured_detail_is_serialized() {
        assert_eq!(
            error_detail(br#"{"detail":[{"loc":["body"],"msg":"field required"}]}"#),
            r#"[{"loc":["body"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn payload_without_detail_is_shown_whole() {
        assert_eq!(error_detail(br#"{"error":"boom"}"#), r#"{"error":"boom"}"#);
        assert_eq!(error_detail(br#"{"detail":""}"#), r#"{"detail":""}"#);
    }

    #[test]
    fn non_json_payload_is_shown_as_text() {
        assert_eq!(error_detail(b"Internal Server Error\n"), "Internal Server Error");
    }
}

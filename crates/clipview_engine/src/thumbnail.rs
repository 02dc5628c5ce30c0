use std::sync::Arc;

use bytes::Bytes;
use clipview_logging::{clip_debug, clip_warn};

use crate::letterbox::{self, Borders, JPEG_QUALITY};
use crate::{FetchError, FetchOutput, ImageFetcher};

/// Image reference handed to the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailImage {
    /// The caller's URL, untouched.
    Url(String),
    Bytes { data: Bytes, content_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedThumbnail {
    pub image: ThumbnailImage,
    /// Width / height, `None` if unknown.
    pub aspect_ratio: Option<f64>,
}

/// What the crop engine managed to do with one image.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    /// Borders found and removed; re-encoded JPEG.
    Cropped {
        view: FittedThumbnail,
        borders: Borders,
    },
    /// Analyzed, nothing to crop; the fetched bytes with ratio `w/h`.
    Uncropped {
        view: FittedThumbnail,
        borders: Borders,
    },
    /// Fetched but the pixels could not be analyzed.
    Unanalyzed {
        view: FittedThumbnail,
        reason: String,
    },
    /// The fetch itself failed; the original URL with no ratio.
    Original {
        view: FittedThumbnail,
        error: FetchError,
    },
}

impl FitOutcome {
    pub fn view(&self) -> &FittedThumbnail {
        match self {
            FitOutcome::Cropped { view, .. }
            | FitOutcome::Uncropped { view, .. }
            | FitOutcome::Unanalyzed { view, .. }
            | FitOutcome::Original { view, .. } => view,
        }
    }

    pub fn into_view(self) -> FittedThumbnail {
        match self {
            FitOutcome::Cropped { view, .. }
            | FitOutcome::Uncropped { view, .. }
            | FitOutcome::Unanalyzed { view, .. }
            | FitOutcome::Original { view, .. } => view,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitOutcome::Cropped { .. } => "cropped",
            FitOutcome::Uncropped { .. } => "uncropped",
            FitOutcome::Unanalyzed { .. } => "unanalyzed",
            FitOutcome::Original { .. } => "original",
        }
    }
}

/// Decode, measure and crop already-fetched image bytes.
///
/// Deterministic in `bytes`: the same input always yields the same borders
/// and the same crop decision.
pub fn analyze(bytes: Bytes, content_type: Option<&str>) -> FitOutcome {
    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let fetched = |reason: String, data: Bytes, content_type: String| FitOutcome::Unanalyzed {
        view: FittedThumbnail {
            image: ThumbnailImage::Bytes { data, content_type },
            aspect_ratio: None,
        },
        reason,
    };

    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded.into_rgba8(),
        Err(err) => return fetched(format!("decode failed: {err}"), bytes, content_type),
    };
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return fetched("image has no area".to_string(), bytes, content_type);
    }

    let borders = letterbox::detect_borders(&decoded);
    if !letterbox::should_crop(borders, height) {
        return FitOutcome::Uncropped {
            view: FittedThumbnail {
                image: ThumbnailImage::Bytes {
                    data: bytes,
                    content_type,
                },
                aspect_ratio: Some(f64::from(width) / f64::from(height)),
            },
            borders,
        };
    }

    let cropped = letterbox::crop_rows(&decoded, borders);
    drop(decoded);
    match letterbox::encode_jpeg(&cropped, JPEG_QUALITY) {
        Ok(jpeg) => FitOutcome::Cropped {
            view: FittedThumbnail {
                image: ThumbnailImage::Bytes {
                    data: Bytes::from(jpeg),
                    content_type: "image/jpeg".to_string(),
                },
                aspect_ratio: Some(f64::from(width) / f64::from(borders.band_height())),
            },
            borders,
        },
        Err(err) => fetched(format!("encode failed: {err}"), bytes, content_type),
    }
}

/// Letterbox crop engine: fetch, analyze, crop.
#[derive(Clone)]
pub struct ThumbnailFitter {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ThumbnailFitter {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Never fails: every problem degrades to a less analyzed outcome.
    pub async fn fit(&self, url: &str) -> FitOutcome {
        let FetchOutput { bytes, metadata } = match self.fetcher.fetch_image(url).await {
            Ok(output) => output,
            Err(error) => {
                clip_warn!("Thumbnail fetch failed url={} error={}", url, error);
                return FitOutcome::Original {
                    view: FittedThumbnail {
                        image: ThumbnailImage::Url(url.to_string()),
                        aspect_ratio: None,
                    },
                    error,
                };
            }
        };

        let content_type = metadata.content_type.clone();
        let outcome = match tokio::task::spawn_blocking(move || {
            analyze(bytes, content_type.as_deref())
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(err) => FitOutcome::Original {
                view: FittedThumbnail {
                    image: ThumbnailImage::Url(url.to_string()),
                    aspect_ratio: None,
                },
                error: FetchError::new(crate::FailureKind::Decode, err.to_string()),
            },
        };
        clip_debug!(
            "Thumbnail fit url={} via={} bytes={} outcome={}",
            url,
            metadata.requested_url,
            metadata.byte_len,
            outcome.label()
        );
        outcome
    }
}

use crate::{Effect, ListenerId, PreviewImage, ThumbnailView};

/// The rendering surface that shows the job thumbnail.
///
/// Owns the one resize-listener registration that keeps `height` in step
/// with `width / aspect_ratio`. Registration changes are returned as
/// effects so the shell can mirror them; a deregistration is always emitted
/// before the registration that replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSurface {
    width: f64,
    background: Option<PreviewImage>,
    aspect_ratio: Option<f64>,
    height: Option<f64>,
    listener: Option<ListenerId>,
    next_listener: ListenerId,
}

impl PreviewSurface {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            background: None,
            aspect_ratio: None,
            height: None,
            listener: None,
            next_listener: 1,
        }
    }

    /// Show `view`, or clear the surface with `None`.
    pub fn apply(&mut self, view: Option<ThumbnailView>) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(listener) = self.listener.take() {
            effects.push(Effect::DeregisterResize { listener });
        }

        let Some(view) = view else {
            self.background = None;
            self.aspect_ratio = None;
            self.height = None;
            return effects;
        };

        self.background = Some(view.image);
        self.aspect_ratio = view.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0);
        match self.aspect_ratio {
            Some(ratio) => {
                let listener = self.next_listener;
                self.next_listener += 1;
                self.listener = Some(listener);
                self.height = Some(self.width / ratio);
                effects.push(Effect::RegisterResize { listener });
            }
            None => self.height = None,
        }
        effects
    }

    /// Viewport resize. Height follows only while a listener is installed.
    pub fn resize(&mut self, width: f64) {
        self.width = width;
        if self.listener.is_some() {
            if let Some(ratio) = self.aspect_ratio {
                self.height = Some(width / ratio);
            }
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Forced height, `None` when the surface keeps its natural height.
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn background(&self) -> Option<&PreviewImage> {
        self.background.as_ref()
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }
}

use alloc::string::String;

use lazyview::{ConfigError, LazyViewOptions, VisibilitySubscription, observe_visibility};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageLoadState {
    /// Not seen yet: the host must not request the image bytes.
    Deferred,
    /// Seen; the host has been handed the source and is fetching it.
    Loading,
    Loaded,
}

/// An image whose download is deferred until its host element first becomes visible.
///
/// The source is withheld from the host until the visibility subscription fires, and a
/// placeholder is shown until the host reports the image as loaded.
#[derive(Clone, Debug)]
pub struct DeferredImage<H> {
    src: String,
    alt: String,
    visibility: VisibilitySubscription<H>,
    state: ImageLoadState,
}

impl<H> DeferredImage<H> {
    pub fn new(target: H, src: impl Into<String>, threshold: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            src: src.into(),
            alt: String::new(),
            visibility: observe_visibility(target, threshold)?,
            state: ImageLoadState::Deferred,
        })
    }

    pub fn from_options(
        target: H,
        src: impl Into<String>,
        options: &LazyViewOptions,
    ) -> Result<Self, ConfigError> {
        Self::new(target, src, options.visibility_threshold)
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn target(&self) -> &H {
        self.visibility.target()
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn state(&self) -> ImageLoadState {
        self.state
    }

    /// The source to load, available only once the target has been visible.
    pub fn src_to_load(&self) -> Option<&str> {
        match self.state {
            ImageLoadState::Deferred => None,
            ImageLoadState::Loading | ImageLoadState::Loaded => Some(&self.src),
        }
    }

    pub fn shows_placeholder(&self) -> bool {
        self.state != ImageLoadState::Loaded
    }

    /// Feeds a measured intersection ratio. Returns `true` exactly once: when the host should
    /// start loading [`src_to_load`](Self::src_to_load).
    pub fn on_intersection(&mut self, ratio: f32) -> bool {
        if self.visibility.report(ratio) != Some(true) {
            return false;
        }
        ltrace!(src = self.src.as_str(), ratio, "DeferredImage: visible, loading");
        self.state = ImageLoadState::Loading;
        true
    }

    /// Records that the host finished loading the image. Ignored before it became visible.
    pub fn mark_loaded(&mut self) -> bool {
        if self.state != ImageLoadState::Loading {
            return false;
        }
        self.state = ImageLoadState::Loaded;
        true
    }

    /// Stops observing. An image that was never visible stays deferred for good.
    pub fn dispose(&mut self) {
        self.visibility.dispose();
    }
}

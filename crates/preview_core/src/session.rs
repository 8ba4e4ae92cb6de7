use std::collections::HashMap;

/// Shown while a link's preview is still being resolved.
pub const PREVIEW_LOADING: &str =
    "<h3>Loading...</h3><p>The preview for this link is still loading.</p>";
/// Shown when a link's preview could not be produced.
pub const PREVIEW_ERROR: &str =
    "<h3>Error</h3><p>There was an error loading the preview for this link.</p>";

/// Read access to the markup currently associated with a link.
pub trait PreviewLookup {
    fn preview_markup(&self, url: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSlot {
    Loading,
    Ready(String),
    Failed,
}

impl PreviewSlot {
    pub fn markup(&self) -> &str {
        match self {
            PreviewSlot::Loading => PREVIEW_LOADING,
            PreviewSlot::Ready(markup) => markup,
            PreviewSlot::Failed => PREVIEW_ERROR,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, PreviewSlot::Loading)
    }
}

/// The live preview map of one page activation.
///
/// A new session is created for every scan and replaces the previous one
/// wholesale; entries are never carried over between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    epoch: u64,
    location: String,
    previews: HashMap<String, PreviewSlot>,
}

impl Session {
    pub fn new(epoch: u64, location: impl Into<String>) -> Self {
        Self {
            epoch,
            location: location.into(),
            previews: HashMap::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Marks `url` as interactive with the loading sentinel. Returns `false`
    /// if the link was already registered in this session.
    pub fn register(&mut self, url: &str) -> bool {
        if self.previews.contains_key(url) {
            return false;
        }
        self.previews.insert(url.to_string(), PreviewSlot::Loading);
        true
    }

    pub fn resolve(&mut self, url: &str, markup: impl Into<String>) {
        self.previews
            .insert(url.to_string(), PreviewSlot::Ready(markup.into()));
    }

    pub fn fail(&mut self, url: &str) {
        self.previews.insert(url.to_string(), PreviewSlot::Failed);
    }

    pub fn slot(&self, url: &str) -> Option<&PreviewSlot> {
        self.previews.get(url)
    }

    pub fn is_registered(&self, url: &str) -> bool {
        self.previews.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Number of links whose preview is no longer loading.
    pub fn settled_count(&self) -> usize {
        self.previews.values().filter(|slot| slot.is_settled()).count()
    }
}

impl PreviewLookup for Session {
    fn preview_markup(&self, url: &str) -> Option<&str> {
        self.slot(url).map(PreviewSlot::markup)
    }
}

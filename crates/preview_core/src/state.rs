use crate::view_model::{PreviewStyle, PreviewViewModel};

/// Pointer coordinates relative to the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Viewport edge the floating preview is pinned to horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Right,
}

/// Viewport edge the floating preview is pinned to vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Placement {
    /// Puts the preview in the half of the viewport opposite the pointer so
    /// it never covers the link being hovered.
    pub fn for_pointer(pointer: PointerPosition, viewport: Viewport) -> Self {
        let horizontal = if pointer.x * 2.0 < viewport.width {
            HorizontalAnchor::Right
        } else {
            HorizontalAnchor::Left
        };
        let vertical = if pointer.y * 2.0 < viewport.height {
            VerticalAnchor::Bottom
        } else {
            VerticalAnchor::Top
        };
        Self {
            horizontal,
            vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Hidden,
    Shown {
        url: String,
        markup: String,
        placement: Placement,
    },
}

/// Everything the display controller and the navigation watcher remember
/// between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    site_root: String,
    bootstrapped: bool,
    observed_location: Option<String>,
    epoch: u64,
    display: DisplayState,
    dirty: bool,
}

impl AppState {
    pub fn new(site_root: impl Into<String>) -> Self {
        Self {
            site_root: site_root.into(),
            bootstrapped: false,
            observed_location: None,
            epoch: 0,
            display: DisplayState::Hidden,
            dirty: false,
        }
    }

    pub fn view(&self) -> PreviewViewModel {
        match &self.display {
            DisplayState::Hidden => PreviewViewModel {
                visible: false,
                markup: None,
                style: PreviewStyle::hidden(),
            },
            DisplayState::Shown {
                markup, placement, ..
            } => PreviewViewModel {
                visible: true,
                markup: Some(markup.clone()),
                style: PreviewStyle::shown(*placement),
            },
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn observed_location(&self) -> Option<&str> {
        self.observed_location.as_deref()
    }

    /// Epoch of the most recently requested page activation; 0 before any.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn site_root(&self) -> &str {
        &self.site_root
    }

    /// Returns whether the display changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_bootstrapped(&mut self, location: String) {
        self.bootstrapped = true;
        self.observed_location = Some(location);
    }

    pub(crate) fn observe_location(&mut self, location: String) {
        self.observed_location = Some(location);
    }

    pub(crate) fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    pub(crate) fn set_display(&mut self, display: DisplayState) {
        if self.display != display {
            self.display = display;
            self.dirty = true;
        }
    }
}

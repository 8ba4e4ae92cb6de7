use crate::{HorizontalAnchor, Placement, VerticalAnchor};

/// DOM id of the floating preview element.
pub const PREVIEW_ELEMENT_ID: &str = "apv_preview";

const EDGE_OFFSET: &str = "1em";
const AUTO: &str = "auto";

/// Inline style of the floating preview element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStyle {
    pub display: &'static str,
    pub left: &'static str,
    pub right: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
}

impl PreviewStyle {
    pub fn hidden() -> Self {
        Self {
            display: "none",
            left: AUTO,
            right: AUTO,
            top: AUTO,
            bottom: AUTO,
        }
    }

    pub fn shown(placement: Placement) -> Self {
        let (left, right) = match placement.horizontal {
            HorizontalAnchor::Left => (EDGE_OFFSET, AUTO),
            HorizontalAnchor::Right => (AUTO, EDGE_OFFSET),
        };
        let (top, bottom) = match placement.vertical {
            VerticalAnchor::Top => (EDGE_OFFSET, AUTO),
            VerticalAnchor::Bottom => (AUTO, EDGE_OFFSET),
        };
        Self {
            display: "inline-block",
            left,
            right,
            top,
            bottom,
        }
    }

    /// Renders the style as an inline `style` attribute value.
    pub fn to_css(&self) -> String {
        format!(
            "display: {}; left: {}; right: {}; top: {}; bottom: {};",
            self.display, self.left, self.right, self.top, self.bottom
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewViewModel {
    pub visible: bool,
    pub markup: Option<String>,
    pub style: PreviewStyle,
}

use crate::{PointerPosition, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The host page's marker script finished loading at `location`.
    Bootstrapped { location: String },
    /// Periodic poll of the document location.
    LocationPolled { location: String },
    /// Pointer moved onto a link.
    PointerEntered {
        url: String,
        pointer: PointerPosition,
        viewport: Viewport,
    },
    /// Pointer moved off a link.
    PointerLeft { url: String },
    /// A link was clicked.
    LinkActivated { url: String },
}

//! Preview core: link classification, per-page preview state and the pure
//! display/navigation state machine.
mod classify;
mod content_type;
mod effect;
mod msg;
mod session;
mod state;
mod update;
mod view_model;

pub use classify::{ClassifierError, LinkDescriptor, UrlClassifier};
pub use content_type::{ContentType, TtlPolicy};
pub use effect::Effect;
pub use msg::Msg;
pub use session::{PreviewLookup, PreviewSlot, Session, PREVIEW_ERROR, PREVIEW_LOADING};
pub use state::{
    AppState, DisplayState, HorizontalAnchor, Placement, PointerPosition, VerticalAnchor, Viewport,
};
pub use update::update;
pub use view_model::{PreviewStyle, PreviewViewModel, PREVIEW_ELEMENT_ID};

use crate::Placement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Attach the floating preview element to the document.
    MountPreview,
    /// Wait for the document to be ready, then scan it into a fresh session.
    ActivatePage { epoch: u64, location: String },
    ShowPreview { markup: String, placement: Placement },
    HidePreview,
}

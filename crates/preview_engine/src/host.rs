use std::sync::{Mutex, MutexGuard, PoisonError};

use preview_core::PreviewViewModel;
use tokio::sync::Notify;

/// Loading progress of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("no script matching {0}")]
    MarkerMissing(String),
    #[error("script {src} failed to load: {reason}")]
    ScriptFailed { src: String, reason: String },
}

/// The page the previews live in.
#[async_trait::async_trait]
pub trait PageHost: Send + Sync {
    /// Current document location.
    fn location(&self) -> String;
    fn ready_state(&self) -> ReadyState;
    /// Resolves once the document is no longer loading.
    async fn loaded(&self);
    /// Serialized markup of the current document.
    fn document_html(&self) -> String;
    /// `src` of every script element, in document order.
    fn script_sources(&self) -> Vec<String>;
    /// Resolves once the script with this `src` has loaded and executed.
    async fn script_loaded(&self, src: &str) -> Result<(), HostError>;
}

/// The floating preview element.
pub trait PreviewSurface: Send + Sync {
    fn mount(&self, element_id: &str);
    fn render(&self, view: &PreviewViewModel);
}

pub(crate) async fn wait_until_ready(host: &dyn PageHost) {
    if host.ready_state() == ReadyState::Loading {
        host.loaded().await;
    }
}

#[derive(Debug)]
struct StaticPage {
    location: String,
    html: String,
    ready: ReadyState,
    scripts: Vec<String>,
    mounted: Option<String>,
    renders: Vec<PreviewViewModel>,
}

/// A host backed by an in-memory document. Scripts count as loaded as soon as
/// they are listed. Also records what the preview element was asked to show.
#[derive(Debug)]
pub struct StaticPageHost {
    page: Mutex<StaticPage>,
    load: Notify,
}

impl StaticPageHost {
    pub fn new(location: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            page: Mutex::new(StaticPage {
                location: location.into(),
                html: html.into(),
                ready: ReadyState::Complete,
                scripts: Vec::new(),
                mounted: None,
                renders: Vec::new(),
            }),
            load: Notify::new(),
        }
    }

    pub fn with_script(self, src: impl Into<String>) -> Self {
        self.lock().scripts.push(src.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, StaticPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Client-side navigation: swaps location and document in place.
    pub fn navigate(&self, location: impl Into<String>, html: impl Into<String>) {
        let mut page = self.lock();
        page.location = location.into();
        page.html = html.into();
    }

    pub fn set_ready_state(&self, ready: ReadyState) {
        self.lock().ready = ready;
        if ready != ReadyState::Loading {
            self.load.notify_waiters();
        }
    }

    pub fn mounted_element(&self) -> Option<String> {
        self.lock().mounted.clone()
    }

    pub fn renders(&self) -> Vec<PreviewViewModel> {
        self.lock().renders.clone()
    }
}

#[async_trait::async_trait]
impl PageHost for StaticPageHost {
    fn location(&self) -> String {
        self.lock().location.clone()
    }

    fn ready_state(&self) -> ReadyState {
        self.lock().ready
    }

    async fn loaded(&self) {
        loop {
            let notified = self.load.notified();
            if self.ready_state() != ReadyState::Loading {
                return;
            }
            notified.await;
        }
    }

    fn document_html(&self) -> String {
        self.lock().html.clone()
    }

    fn script_sources(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    async fn script_loaded(&self, src: &str) -> Result<(), HostError> {
        if self.lock().scripts.iter().any(|s| s == src) {
            Ok(())
        } else {
            Err(HostError::ScriptFailed {
                src: src.to_string(),
                reason: "not part of this document".to_string(),
            })
        }
    }
}

impl PreviewSurface for StaticPageHost {
    fn mount(&self, element_id: &str) {
        self.lock().mounted = Some(element_id.to_string());
    }

    fn render(&self, view: &PreviewViewModel) {
        self.lock().renders.push(view.clone());
    }
}

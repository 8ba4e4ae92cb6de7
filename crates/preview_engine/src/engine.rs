use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use preview_core::{
    update, AppState, ClassifierError, Effect, LinkDescriptor, Msg, Session, PREVIEW_ELEMENT_ID,
};
use preview_logging::{preview_debug, preview_error, preview_info};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::host::wait_until_ready;
use crate::{
    poll_location, CacheStore, Clock, EngineEvent, ExtractError, ExtractorRegistry, Fetcher,
    HostError, PageHost, PageScanner, PreviewFetcher, PreviewSettings, PreviewSurface,
    SessionBinding, SharedSession,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid site settings: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("invalid extractor settings: {0}")]
    Extract(#[from] ExtractError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Collaborators the engine runs against.
#[derive(Clone)]
pub struct EngineContext {
    pub settings: PreviewSettings,
    pub host: Arc<dyn PageHost>,
    pub surface: Arc<dyn PreviewSurface>,
    pub store: Arc<dyn CacheStore>,
    pub fetcher: Arc<dyn Fetcher>,
    pub clock: Arc<dyn Clock>,
}

/// Links dispatched by one activation and the tasks resolving them.
pub struct PageActivation {
    pub session: SharedSession,
    pub links: Vec<LinkDescriptor>,
    tasks: Vec<JoinHandle<()>>,
}

impl PageActivation {
    /// Waits until every link of this activation has settled.
    pub async fn settle(self) -> SharedSession {
        for task in self.tasks {
            let _ = task.await;
        }
        self.session
    }
}

/// Scans the current document into a fresh session and dispatches every
/// classified link to the preview fetcher.
#[derive(Clone)]
pub struct PageActivator {
    host: Arc<dyn PageHost>,
    scanner: PageScanner,
    previews: PreviewFetcher,
    binding: SessionBinding,
    events: Option<mpsc::Sender<EngineEvent>>,
}

impl PageActivator {
    pub fn new(ctx: &EngineContext, binding: SessionBinding) -> Result<Self, EngineError> {
        let settings = &ctx.settings;
        let scanner = PageScanner::new(Arc::new(settings.classifier()?))?;
        let extractors = Arc::new(ExtractorRegistry::standard(settings.limits)?);
        let previews = PreviewFetcher::new(
            ctx.store.clone(),
            ctx.fetcher.clone(),
            extractors,
            ctx.clock.clone(),
            settings.ttl,
        )
        .with_decode_policy(settings.decode);
        Ok(Self {
            host: ctx.host.clone(),
            scanner,
            previews,
            binding,
            events: None,
        })
    }

    pub fn with_events(mut self, events: mpsc::Sender<EngineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn binding(&self) -> &SessionBinding {
        &self.binding
    }

    pub fn site_root(&self) -> &str {
        self.scanner.classifier().site_root()
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    pub async fn activate(&self, epoch: u64, location: String) -> PageActivation {
        wait_until_ready(self.host.as_ref()).await;

        let session = SharedSession::new(Session::new(epoch, location.clone()));
        if !self.binding.bind(session.clone()) {
            preview_debug!("activation {} superseded before scanning", epoch);
            return PageActivation {
                session,
                links: Vec::new(),
                tasks: Vec::new(),
            };
        }

        let links = self.scanner.scan(&location, &self.host.document_html());
        preview_info!("page {} ({}) has {} previewable links", epoch, location, links.len());
        // Every link is interactive before any IO starts.
        for link in &links {
            session.register(&link.url);
        }

        let tasks = links
            .iter()
            .cloned()
            .map(|link| {
                let previews = self.previews.clone();
                let session = session.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = previews.run(&link, &session).await;
                    if let Some(tx) = events {
                        let _ = tx.send(EngineEvent::PreviewResolved {
                            epoch,
                            url: link.url,
                            outcome,
                        });
                    }
                })
            })
            .collect();

        self.emit(EngineEvent::PageActivated {
            epoch,
            location,
            links: links.len(),
        });
        PageActivation {
            session,
            links,
            tasks,
        }
    }
}

/// Runs the preview engine on its own single-threaded runtime.
pub struct EngineHandle {
    msg_tx: UnboundedSender<Msg>,
    event_rx: mpsc::Receiver<EngineEvent>,
    binding: SessionBinding,
    cancel: CancellationToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn start(ctx: EngineContext) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (msg_tx, msg_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let binding = SessionBinding::default();
        let activator = PageActivator::new(&ctx, binding.clone())?.with_events(event_tx.clone());
        let cancel = CancellationToken::new();

        let driver = EngineDriver {
            ctx,
            activator,
            events: event_tx,
            msg_tx: msg_tx.clone(),
            cancel: cancel.clone(),
        };
        let thread = thread::spawn(move || runtime.block_on(driver.run(msg_rx)));

        Ok(Self {
            msg_tx,
            event_rx,
            binding,
            cancel,
            thread: Some(thread),
        })
    }

    /// Forwards a pointer event from the host page.
    pub fn dispatch(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Copy of the live preview map currently bound to the display.
    pub fn current_session(&self) -> Session {
        self.binding.current().snapshot()
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

struct EngineDriver {
    ctx: EngineContext,
    activator: PageActivator,
    events: mpsc::Sender<EngineEvent>,
    msg_tx: UnboundedSender<Msg>,
    cancel: CancellationToken,
}

impl EngineDriver {
    async fn run(self, mut msg_rx: UnboundedReceiver<Msg>) {
        let Some(location) = self.bootstrap().await else {
            return;
        };

        let mut state = AppState::new(self.activator.site_root());
        state = self.dispatch(state, Msg::Bootstrapped { location });

        tokio::spawn(poll_location(
            self.ctx.host.clone(),
            self.ctx.settings.poll_interval,
            self.cancel.clone(),
            self.msg_tx.clone(),
        ));

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                msg = msg_rx.recv() => match msg {
                    Some(msg) => state = self.dispatch(state, msg),
                    None => break,
                },
            }
        }
        preview_debug!("engine stopped");
    }

    /// Waits for the document and the host's marker script. Returns the
    /// location at that point, or `None` if bootstrapping cannot finish.
    async fn bootstrap(&self) -> Option<String> {
        let host = self.ctx.host.as_ref();
        tokio::select! {
            _ = self.cancel.cancelled() => return None,
            _ = wait_until_ready(host) => {}
        }

        let prefix = &self.ctx.settings.marker_script;
        let Some(marker) = host
            .script_sources()
            .into_iter()
            .find(|src| src.starts_with(prefix.as_str()))
        else {
            return self.bootstrap_failed(HostError::MarkerMissing(prefix.clone()).to_string());
        };

        let loaded = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            loaded = host.script_loaded(&marker) => loaded,
        };
        if let Err(err) = loaded {
            return self.bootstrap_failed(err.to_string());
        }
        preview_info!("host script {} finished loading", marker);
        Some(host.location())
    }

    fn bootstrap_failed(&self, reason: String) -> Option<String> {
        preview_error!("preview engine not started: {}", reason);
        let _ = self.events.send(EngineEvent::BootstrapFailed { reason });
        None
    }

    fn dispatch(&self, state: AppState, msg: Msg) -> AppState {
        let session = self.activator.binding().current();
        let (mut state, effects) = session.with(|previews| update(state, msg, previews));

        for effect in effects {
            match effect {
                Effect::MountPreview => {
                    self.ctx.surface.mount(PREVIEW_ELEMENT_ID);
                    let _ = self.events.send(EngineEvent::Mounted);
                }
                Effect::ActivatePage { epoch, location } => {
                    preview_debug!("activating page {} at {}", epoch, location);
                    let activator = self.activator.clone();
                    tokio::spawn(async move {
                        activator.activate(epoch, location).await;
                    });
                }
                Effect::ShowPreview { .. } | Effect::HidePreview => {
                    let view = state.view();
                    self.ctx.surface.render(&view);
                    let _ = self.events.send(EngineEvent::Rendered(view));
                }
            }
        }
        state.consume_dirty();
        state
    }
}

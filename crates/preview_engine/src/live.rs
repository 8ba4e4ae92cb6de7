use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use preview_core::{PreviewSlot, Session};

/// A session shared between the tasks fetching its links and the display.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.lock())
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch()
    }

    pub fn register(&self, url: &str) -> bool {
        self.lock().register(url)
    }

    pub fn resolve(&self, url: &str, markup: impl Into<String>) {
        self.lock().resolve(url, markup);
    }

    pub fn fail(&self, url: &str) {
        self.lock().fail(url);
    }

    pub fn slot(&self, url: &str) -> Option<PreviewSlot> {
        self.lock().slot(url).cloned()
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn same_as(&self, other: &SharedSession) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// The currently active session. Replaced wholesale on every activation, so
/// fetches still running for a previous page write into a map nobody reads.
#[derive(Debug, Clone)]
pub struct SessionBinding {
    current: Arc<RwLock<SharedSession>>,
}

impl SessionBinding {
    pub fn new(initial: Session) -> Self {
        Self {
            current: Arc::new(RwLock::new(SharedSession::new(initial))),
        }
    }

    pub fn current(&self) -> SharedSession {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Binds `session` unless a newer activation got there first. Returns
    /// whether the binding changed.
    pub fn bind(&self, session: SharedSession) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if session.epoch() < current.epoch() {
            return false;
        }
        *current = session;
        true
    }
}

impl Default for SessionBinding {
    fn default() -> Self {
        Self::new(Session::new(0, String::new()))
    }
}

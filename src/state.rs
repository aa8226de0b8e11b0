use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Who is using the client. Passed explicitly to every call that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_email: String,
}

impl SessionContext {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
        }
    }
}

/// Proof of which view generation issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Derived state of one open screen plus the guard that keeps late
/// responses out of it.
///
/// Every fetch takes a [`RequestTicket`] before it starts. [`reload`] and
/// [`close`] advance the generation, after which tickets issued earlier no
/// longer apply.
///
/// [`reload`]: ViewSession::reload
/// [`close`]: ViewSession::close
pub struct ViewSession<S> {
    generation: AtomicU64,
    closed: AtomicBool,
    state: Mutex<S>,
}

impl<S: Default + Clone> ViewSession<S> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            state: Mutex::new(S::default()),
        })
    }

    pub fn ticket(&self) -> RequestTicket {
        RequestTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        !self.closed.load(Ordering::SeqCst)
            && ticket.generation == self.generation.load(Ordering::SeqCst)
    }

    /// Starts a new generation for a fresh round of fetches.
    ///
    /// Waits for an update that is already running, so no older response
    /// lands after this returns.
    pub fn reload(&self) -> RequestTicket {
        let _state = self.state.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket { generation }
    }

    /// The screen went away; nothing may be applied from now on. Like
    /// [`reload`](ViewSession::reload), waits for a running update first.
    pub fn close(&self) {
        let _state = self.state.lock();
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Applies `update` if `ticket` is still current. Returns whether it ran.
    pub fn apply<F>(&self, ticket: RequestTicket, update: F) -> bool
    where
        F: FnOnce(&mut S),
    {
        let mut state = self.state.lock();
        // reload and close take this lock too, so the check holds for the whole update
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale response (generation {})",
                ticket.generation
            );
            return false;
        }
        update(&mut state);
        true
    }

    pub fn snapshot(&self) -> S {
        self.state.lock().clone()
    }
}

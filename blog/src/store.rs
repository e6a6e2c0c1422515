//! Process-wide session store with publish/subscribe.
//!
//! ARCHITECTURE
//! ============
//! One `watch` channel holds the current [`SessionState`]. Pages and guards
//! read it through [`SessionStore::snapshot`] or a subscription; only the
//! session service writes to it.
//!
//! Each refresh takes a [`Ticket`]. A result is published only if no newer
//! refresh or logout has started since the ticket was issued, so an older
//! request finishing late cannot overwrite a newer answer. The generation
//! check runs inside the channel's write lock.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::status::{SessionState, SessionStatus};

/// Handle identifying one refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Shared session state.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// New store in the `SignedOut` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::SignedOut);
        Self { tx, generation: AtomicU64::new(0) }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.tx.borrow().status()
    }

    /// Receiver notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Start a new refresh, superseding any in flight.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Publish `Loading` for `ticket` if the session is currently signed out.
    ///
    /// A signed-in session stays visible while it is revalidated, and an
    /// already-loading session is left alone.
    pub fn mark_loading(&self, ticket: Ticket) -> bool {
        self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) || !matches!(state, SessionState::SignedOut) {
                return false;
            }
            *state = SessionState::Loading;
            true
        })
    }

    /// Publish the outcome of `ticket`. Returns `false` if it was superseded.
    pub fn resolve(&self, ticket: Ticket, next: SessionState) -> bool {
        let mut accepted = false;
        self.tx.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            accepted = true;
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
        accepted
    }

    /// Drop any in-flight refresh and publish `SignedOut`.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_if_modified(|state| {
            if matches!(state, SessionState::SignedOut) {
                return false;
            }
            *state = SessionState::SignedOut;
            true
        });
    }
}

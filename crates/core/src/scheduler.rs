use crate::machine::Action;
use crate::session::{SessionId, TimerToken};
use std::collections::HashMap;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

/// Arms delayed `Action::TimerFired` deliveries and cancels them per session.
///
/// Aborting a timer is best effort: one that already fired may have its
/// action queued. The machine discards such late tokens on its own, because
/// every token carries the session that armed it.
pub struct Scheduler {
    pending: HashMap<TimerToken, JoinHandle<()>>,
    actions: mpsc::WeakSender<Action>,
}

impl Scheduler {
    pub fn new(actions: mpsc::WeakSender<Action>) -> Self {
        Self {
            pending: HashMap::new(),
            actions,
        }
    }

    pub fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.prune();
        let actions = self.actions.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match actions.upgrade() {
                Some(tx) => {
                    if tx.send(Action::TimerFired(token)).await.is_err() {
                        debug!(?token, "Runtime gone, dropping timer");
                    }
                }
                None => debug!(?token, "Runtime gone, dropping timer"),
            }
        });
        if let Some(previous) = self.pending.insert(token, handle) {
            previous.abort();
        }
    }

    /// Aborts every pending timer of `session`. Returns how many were aborted.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|token, handle| {
            if token.session == session {
                handle.abort();
                false
            } else {
                true
            }
        });
        let cancelled = before - self.pending.len();
        debug!(%session, cancelled, "Cancelled session timers");
        cancelled
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&mut self) -> usize {
        self.prune();
        self.pending.len()
    }

    fn prune(&mut self) {
        self.pending.retain(|_, handle| !handle.is_finished());
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

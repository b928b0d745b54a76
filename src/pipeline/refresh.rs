use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::debug;

use super::error::RefreshError;

/// What every request waiting on a refresh cycle receives: the fresh access
/// token, or the error that ended the cycle.
pub type RefreshOutcome = Result<String, RefreshError>;

/// The single in-flight refresh cycle and its subscribers.
///
/// `join` flips the in-flight flag and registers the caller under one
/// synchronous lock with no await point, so every 401 that lands while a
/// refresh is pending subscribes to it instead of starting another one. The
/// gate is owned by its client rather than global, so isolated pipelines can
/// coexist in one process.
pub struct RefreshGate {
    subscribers: Mutex<Option<Vec<oneshot::Sender<RefreshOutcome>>>>,
}

impl RefreshGate {
    pub fn new() -> Self {
        RefreshGate {
            subscribers: Mutex::new(None),
        }
    }

    /// Subscribes to the current cycle, starting one if none is active.
    /// Returns whether the caller became the cycle leader (and must run the
    /// refresh call) along with its outcome receiver.
    pub fn join(&self) -> (bool, oneshot::Receiver<RefreshOutcome>) {
        let (tx, rx) = oneshot::channel();
        let mut slot = self.subscribers.lock().expect("refresh gate lock poisoned");
        match slot.as_mut() {
            Some(pending) => {
                pending.push(tx);
                (false, rx)
            }
            None => {
                *slot = Some(vec![tx]);
                (true, rx)
            }
        }
    }

    /// Ends the cycle: fans the outcome out to every subscriber and clears
    /// the flag. Runs in every completion branch, tampering included, so a
    /// later 401 can always start a fresh cycle.
    pub fn complete(&self, outcome: RefreshOutcome) {
        let pending = self
            .subscribers
            .lock()
            .expect("refresh gate lock poisoned")
            .take()
            .unwrap_or_default();

        debug!(
            subscribers = pending.len(),
            ok = outcome.is_ok(),
            "refresh cycle complete"
        );
        for tx in pending {
            // A subscriber that gave up waiting is fine to skip.
            let _ = tx.send(outcome.clone());
        }
    }

    pub fn in_flight(&self) -> bool {
        self.subscribers
            .lock()
            .expect("refresh gate lock poisoned")
            .is_some()
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

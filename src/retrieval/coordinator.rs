use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::errors::RosterError;

const RUNNING: u8 = 0;
const STOPPING: u8 = 1;
const STOPPED: u8 = 2;

/// Lifecycle of one retrieval: `Running -> Stopping -> Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Workers may take tickets and read.
    Running,
    /// A stop was requested; workers exit at their next poll.
    Stopping,
    /// Every worker has exited. Terminal.
    Stopped,
}

/// Why a retrieval stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A worker observed the end of the record source.
    EndOfStream,
    /// The global match counter reached `total_items`.
    QuotaReached,
    /// A worker observed a failure (malformed row, I/O error, panic).
    Failed,
    /// Every worker exited on its own quota or a closed ticket stream.
    Drained,
}

/// Shared stop signal observed by every worker of one retrieval.
///
/// The first stop request wins the `Running -> Stopping` transition; the first
/// recorded failure is kept and handed back by `finish`, even when a
/// non-failure stop happened earlier.
#[derive(Debug)]
pub struct TerminationCoordinator {
    state: AtomicU8,
    reason: OnceLock<StopReason>,
    failure: Mutex<Option<RosterError>>,
}

impl Default for TerminationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminationCoordinator {
    /// Create a coordinator in the `Running` state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
            reason: OnceLock::new(),
            failure: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => CoordinatorState::Running,
            STOPPING => CoordinatorState::Stopping,
            _ => CoordinatorState::Stopped,
        }
    }

    /// Cheap poll used by workers and the ticket issuer.
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    /// Request `Running -> Stopping`; returns `true` for the call that made the transition.
    pub fn request_stop(&self, reason: StopReason) -> bool {
        let transitioned = self
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if transitioned {
            let _ = self.reason.set(reason);
        }
        transitioned
    }

    /// Record `error` (first one wins) and request a stop.
    pub fn fail(&self, error: RosterError) {
        {
            let mut slot = self.failure.lock().expect("coordinator failure poisoned");
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        self.request_stop(StopReason::Failed);
    }

    /// Move to `Stopped` once every worker has exited.
    ///
    /// Returns the first recorded failure, or the reason the retrieval stopped.
    pub fn finish(&self) -> Result<StopReason, RosterError> {
        self.state.store(STOPPED, Ordering::Release);
        if let Some(error) = self
            .failure
            .lock()
            .expect("coordinator failure poisoned")
            .take()
        {
            return Err(error);
        }
        Ok(self.reason.get().copied().unwrap_or(StopReason::Drained))
    }
}

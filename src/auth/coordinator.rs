//! Single-flight session refresh coordination
//!
//! The `RefreshCoordinator` owns the "refresh in flight" flag. Whoever wins
//! the compare-exchange becomes the only refresher; everyone else can either
//! give up or wait for the outcome to be published.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Outcome of a settled refresh, as seen by waiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The backend issued a fresh session
    Succeeded,
    /// The refresh was rejected or never reached the backend
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Settled {
    generation: u64,
    outcome: Option<RefreshOutcome>,
}

/// Owner of the refresh-in-flight flag
#[derive(Debug)]
pub struct RefreshCoordinator {
    in_flight: AtomicBool,
    settled: watch::Sender<Settled>,
}

impl RefreshCoordinator {
    /// Create a coordinator with no refresh in flight
    pub fn new() -> Self {
        let (settled, _) = watch::channel(Settled {
            generation: 0,
            outcome: None,
        });
        Self {
            in_flight: AtomicBool::new(false),
            settled,
        }
    }

    /// Whether a refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Number of refreshes that have settled so far
    pub fn settled_count(&self) -> u64 {
        let settled = *self.settled.borrow();
        settled.generation
    }

    /// Outcome of the most recently settled refresh
    pub fn last_outcome(&self) -> Option<RefreshOutcome> {
        let settled = *self.settled.borrow();
        settled.outcome
    }

    /// Atomically flip the flag from idle to in flight
    ///
    /// Returns `true` when the caller became the refresher and must call
    /// [`end_refresh`](Self::end_refresh) once the refresh settles.
    pub fn try_begin_refresh(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Reset the flag and publish the outcome to waiters
    pub fn end_refresh(&self, outcome: RefreshOutcome) {
        self.in_flight.store(false, Ordering::SeqCst);
        self.settled.send_modify(|settled| {
            settled.generation += 1;
            settled.outcome = Some(outcome);
        });
        debug!(?outcome, "Session refresh settled");
    }

    /// Like [`try_begin_refresh`](Self::try_begin_refresh), but the returned
    /// guard ends the refresh as failed if dropped without settling.
    pub fn begin(&self) -> Option<RefreshGuard<'_>> {
        self.try_begin_refresh().then_some(RefreshGuard {
            coordinator: self,
            settled: false,
        })
    }

    /// Register interest in the next settled refresh
    ///
    /// Subscribe before checking the flag so a refresh that settles in
    /// between is not missed.
    pub fn subscribe(&self) -> RefreshWaiter {
        RefreshWaiter {
            rx: self.settled.subscribe(),
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by the single refresher while its refresh call is pending
#[derive(Debug)]
pub struct RefreshGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshGuard<'_> {
    /// End the refresh with the given outcome
    pub fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.coordinator.end_refresh(outcome);
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.end_refresh(RefreshOutcome::Failed);
        }
    }
}

/// Waits for the next refresh to settle
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: watch::Receiver<Settled>,
}

impl RefreshWaiter {
    /// Resolve with the outcome of the first refresh settled after subscribing
    pub async fn settled(mut self) -> RefreshOutcome {
        if self.rx.changed().await.is_err() {
            return RefreshOutcome::Failed;
        }
        let outcome = self.rx.borrow().outcome;
        outcome.unwrap_or(RefreshOutcome::Failed)
    }
}

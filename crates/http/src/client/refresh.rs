//! Single-flight coordination of access token refreshes
//!
//! At most one refresh is in flight. Callers that see a 401 while it runs
//! queue behind it and all observe its outcome; the queue is released in the
//! order the 401s were observed.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

use super::error::RefreshError;

/// New access token, or the error every contending caller fails with
pub(crate) type RefreshOutcome = Result<String, RefreshError>;

#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
    last: Option<Settled>,
}

/// Outcome of the most recent completed refresh and the token it replaced
#[derive(Debug)]
struct Settled {
    replaced: String,
    outcome: RefreshOutcome,
}

/// What a caller holding a rejected token has to do next
pub(crate) enum Claim<'a> {
    /// Perform the refresh and settle the ticket
    Lead(RefreshTicket<'a>),
    /// Wait for the refresh another caller is performing
    Wait(oneshot::Receiver<RefreshOutcome>),
    /// The rejected token was already replaced; reuse that outcome
    Settled(RefreshOutcome),
}

impl RefreshCoordinator {
    /// Decide how to react to a 401 received for `rejected_token`
    pub(crate) fn claim(&self, rejected_token: &str) -> Claim<'_> {
        let mut state = self.lock();

        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            trace!(queued = state.waiters.len(), "Refresh in flight, queueing request");
            return Claim::Wait(rx);
        }

        if let Some(settled) = state.last.as_ref().filter(|s| s.replaced == rejected_token) {
            return Claim::Settled(settled.outcome.clone());
        }

        state.in_flight = true;
        Claim::Lead(RefreshTicket {
            coordinator: self,
            rejected_token: rejected_token.to_string(),
            settled: false,
        })
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    fn finish(&self, rejected_token: String, outcome: RefreshOutcome, remember: bool) {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            if remember {
                state.last = Some(Settled {
                    replaced: rejected_token,
                    outcome: outcome.clone(),
                });
            }
            std::mem::take(&mut state.waiters)
        };

        debug!(released = waiters.len(), ok = outcome.is_ok(), "Refresh settled");
        for waiter in waiters {
            // A waiter whose caller went away has nothing left to replay
            let _ = waiter.send(outcome.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the caller performing a refresh
///
/// Dropping it unsettled (the refreshing future was cancelled) releases the
/// queue with [`RefreshError::Abandoned`] so no caller waits forever.
pub(crate) struct RefreshTicket<'a> {
    coordinator: &'a RefreshCoordinator,
    rejected_token: String,
    settled: bool,
}

impl RefreshTicket<'_> {
    pub(crate) fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        let token = std::mem::take(&mut self.rejected_token);
        self.coordinator.finish(token, outcome, true);
    }
}

impl Drop for RefreshTicket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Token refresh cancelled before completion");
            let token = std::mem::take(&mut self.rejected_token);
            self.coordinator.finish(token, Err(RefreshError::Abandoned), false);
        }
    }
}

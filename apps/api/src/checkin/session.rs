//! The single shared check-in session.
//!
//! At most one guidance request is in flight. Every request carries a ticket;
//! "start over" bumps the sequence so that a request finishing under an old
//! ticket is discarded instead of overwriting newer state.

use thiserror::Error;
use tokio::sync::Mutex;

use crate::checkin::symptoms::SymptomSelection;
use crate::checkin::wizard::CheckInWizard;
use crate::guidance::models::GuidancePlan;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A check-in is already being prepared")]
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInTicket {
    sequence: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    sequence: u64,
    in_flight: bool,
    wizard: CheckInWizard,
    last_selection: Option<SymptomSelection>,
    latest: Option<GuidancePlan>,
}

#[derive(Debug, Default)]
pub struct CheckInSession {
    state: Mutex<SessionState>,
}

impl CheckInSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the in-flight slot for `selection`.
    pub async fn begin(&self, selection: &SymptomSelection) -> Result<CheckInTicket, SessionError> {
        let mut state = self.state.lock().await;
        if state.in_flight {
            return Err(SessionError::InFlight);
        }
        state.sequence += 1;
        state.in_flight = true;
        state.last_selection = Some(selection.clone());
        Ok(CheckInTicket {
            sequence: state.sequence,
        })
    }

    /// Stores `plan` if `ticket` is still current. Returns false when the
    /// result was superseded and has been dropped.
    pub async fn finish(&self, ticket: CheckInTicket, plan: GuidancePlan) -> bool {
        let mut state = self.state.lock().await;
        if ticket.sequence != state.sequence {
            return false;
        }
        state.in_flight = false;
        state.latest = Some(plan);
        true
    }

    /// Releases the slot without a plan, when the request could not start.
    pub async fn abandon(&self, ticket: CheckInTicket) {
        let mut state = self.state.lock().await;
        if ticket.sequence == state.sequence {
            state.in_flight = false;
        }
    }

    /// Start over: clears the draft and plan, and orphans any in-flight request.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.sequence += 1;
        state.in_flight = false;
        state.wizard = CheckInWizard::new();
        state.last_selection = None;
        state.latest = None;
    }

    pub async fn is_in_flight(&self) -> bool {
        self.state.lock().await.in_flight
    }

    pub async fn latest(&self) -> Option<GuidancePlan> {
        self.state.lock().await.latest.clone()
    }

    pub async fn last_selection(&self) -> Option<SymptomSelection> {
        self.state.lock().await.last_selection.clone()
    }

    /// Runs `f` against the wizard draft under the session lock.
    pub async fn with_wizard<R>(&self, f: impl FnOnce(&mut CheckInWizard) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state.wizard)
    }
}

//! # Quiz Progression
//!
//! The state machine driving a session through the catalog.
//!
//! A session is `NOT_STARTED` (no stored state), `IN_PROGRESS`
//! (`position < TOTAL_SCENARIOS`) or `COMPLETE` (`position ==
//! TOTAL_SCENARIOS`). Decisions accumulate one per answered scenario and
//! `position` only ever moves forward; a reset throws the whole state
//! away.
//!
//! All functions here take the session state by reference and perform no
//! I/O except the best-effort vote forward, which is injected as a
//! [`VoteSink`] so the quiz stays fully usable when the store is absent
//! or failing.
use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::{
    error::AppError,
    scenarios::{self, Scenario, TOTAL_SCENARIOS},
    session::SessionState,
    votes::{self, VoteRecord, VoteSink, VoteStoreError, VoteTally},
};

#[derive(Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Complete,
}

pub fn phase(state: &SessionState) -> Phase {
    if state.position >= TOTAL_SCENARIOS {
        Phase::Complete
    } else {
        Phase::InProgress
    }
}

/// Fraction of the catalog already answered, `0.0` at the start. Only
/// meaningful while in progress; completion is a distinct state, so the
/// fraction never reaches `1.0` on a rendered scenario.
pub fn progress(position: usize) -> f64 {
    position as f64 / TOTAL_SCENARIOS as f64
}

pub fn parse_decision(token: &str) -> Result<bool, AppError> {
    match token {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(AppError::InvalidDecision),
    }
}

/// Read-only view of a session for rendering.
pub enum View<'a> {
    /// The scenario awaiting an answer.
    Current {
        scenario: &'static Scenario,
        index: usize,
    },
    /// Quiz finished: every recorded decision, keyed by scenario id.
    Summary { decisions: &'a HashMap<String, bool> },
}

pub fn view(state: &SessionState) -> View<'_> {
    match scenarios::get(state.position) {
        Ok(scenario) => View::Current {
            scenario,
            index: state.position,
        },
        Err(_) => View::Summary {
            decisions: &state.decisions,
        },
    }
}

/// Result of advancing the cursor: the next scenario, or completion.
/// Never both.
#[derive(Debug)]
pub enum Step {
    Next {
        scenario: &'static Scenario,
        index: usize,
    },
    Complete,
}

/// Result of submitting a decision. `Tally` means the vote reached the
/// store and the cursor did NOT move; the caller advances explicitly
/// later. `Advanced` means the store was out of the picture and the
/// cursor already moved on.
#[derive(Debug)]
pub enum Submission {
    Tally {
        scenario_id: u32,
        decision: bool,
        tally: VoteTally,
    },
    Advanced(Step),
}

/// Records the answer for the current scenario and forwards it to the
/// vote store best-effort.
///
/// Rejects anything but `"yes"`/`"no"` with [`AppError::InvalidDecision`]
/// and leaves the state untouched. Resubmitting before an advance
/// overwrites the prior answer. On an already-complete session this is a
/// no-op that reports completion.
pub async fn submit_decision<S: VoteSink + ?Sized>(
    state: &mut SessionState,
    sink: &S,
    token: &str,
) -> Result<Submission, AppError> {
    let decision = parse_decision(token)?;

    let scenario = match scenarios::get(state.position) {
        Ok(scenario) => scenario,
        Err(_) => return Ok(Submission::Advanced(Step::Complete)),
    };

    state
        .decisions
        .insert(scenario.id.to_string(), decision);

    match forward_vote(sink, scenario.id, decision, state.session_uuid).await {
        Some(tally) => Ok(Submission::Tally {
            scenario_id: scenario.id,
            decision,
            tally,
        }),
        None => Ok(Submission::Advanced(advance(state)?)),
    }
}

/// Moves the cursor one scenario forward, reporting either the next
/// scenario or completion. A cursor already at or past the end is
/// treated as completion.
pub fn advance(state: &mut SessionState) -> Result<Step, AppError> {
    if state.position >= TOTAL_SCENARIOS {
        return Ok(Step::Complete);
    }

    state.position += 1;

    if state.position >= TOTAL_SCENARIOS {
        return Ok(Step::Complete);
    }

    Ok(Step::Next {
        scenario: scenarios::get(state.position)?,
        index: state.position,
    })
}

/// Inserts the vote and, only if the insert landed, fetches the tally.
/// Any store trouble collapses to `None`: the decision is already
/// recorded locally and the caller advances immediately.
async fn forward_vote<S: VoteSink + ?Sized>(
    sink: &S,
    scenario_id: u32,
    decision: bool,
    session_uuid: Uuid,
) -> Option<VoteTally> {
    let record = VoteRecord {
        scenario_id,
        decision,
        session_uuid,
    };

    match sink.insert_vote(&record).await {
        Ok(()) => Some(votes::tally(sink, scenario_id).await),
        Err(VoteStoreError::Disabled) => None,
        Err(e) => {
            warn!("Vote forward failed for scenario {scenario_id}: {e}");
            None
        }
    }
}

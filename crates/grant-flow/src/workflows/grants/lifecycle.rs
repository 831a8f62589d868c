//! Lifecycle state table for grant applications.
//!
//! Every legality rule lives in [`transition`]: one match over `(state, operation)` so the
//! whole graph can be audited in a single place. The function is pure; logging and
//! timestamps are handled by the entity applying it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mutually exclusive lifecycle states. `Withdrawn`, `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Submitted,
    UnderReview,
    Evaluated,
    Withdrawn,
    Approved,
    Rejected,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Submitted,
        LifecycleState::UnderReview,
        LifecycleState::Evaluated,
        LifecycleState::Withdrawn,
        LifecycleState::Approved,
        LifecycleState::Rejected,
    ];

    /// Symbolic name used in status reports.
    pub const fn name(self) -> &'static str {
        match self {
            LifecycleState::Submitted => "Submitted",
            LifecycleState::UnderReview => "UnderReview",
            LifecycleState::Evaluated => "Evaluated",
            LifecycleState::Withdrawn => "Withdrawn",
            LifecycleState::Approved => "Approved",
            LifecycleState::Rejected => "Rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LifecycleState::Submitted => "submitted",
            LifecycleState::UnderReview => "under_review",
            LifecycleState::Evaluated => "evaluated",
            LifecycleState::Withdrawn => "withdrawn",
            LifecycleState::Approved => "approved",
            LifecycleState::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            LifecycleState::Withdrawn | LifecycleState::Approved | LifecycleState::Rejected
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations the state table answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleOperation {
    Submit,
    Review,
    Evaluate,
    Withdraw,
    Decide { approved: bool },
}

impl LifecycleOperation {
    pub const fn name(self) -> &'static str {
        match self {
            LifecycleOperation::Submit => "submit",
            LifecycleOperation::Review => "review",
            LifecycleOperation::Evaluate => "evaluate",
            LifecycleOperation::Withdraw => "withdraw",
            LifecycleOperation::Decide { .. } => "decide",
        }
    }
}

/// What the table did with a requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Transitioned {
        from: LifecycleState,
        to: LifecycleState,
    },
    /// The requested target already holds; nothing changed.
    Redundant { reason: &'static str },
    /// The operation is prohibited from the current state; nothing changed.
    Illegal { reason: &'static str },
}

impl TransitionOutcome {
    pub const fn changed_state(&self) -> bool {
        matches!(self, TransitionOutcome::Transitioned { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            TransitionOutcome::Transitioned { from, to } => format!("{from} -> {to}"),
            TransitionOutcome::Redundant { reason } => format!("no change: {reason}"),
            TransitionOutcome::Illegal { reason } => format!("rejected: {reason}"),
        }
    }
}

/// Resulting state plus the outcome that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: LifecycleState,
    pub outcome: TransitionOutcome,
}

impl Transition {
    fn moved(from: LifecycleState, to: LifecycleState) -> Self {
        Self {
            state: to,
            outcome: TransitionOutcome::Transitioned { from, to },
        }
    }

    fn redundant(state: LifecycleState, reason: &'static str) -> Self {
        Self {
            state,
            outcome: TransitionOutcome::Redundant { reason },
        }
    }

    fn illegal(state: LifecycleState, reason: &'static str) -> Self {
        Self {
            state,
            outcome: TransitionOutcome::Illegal { reason },
        }
    }
}

pub fn transition(state: LifecycleState, operation: LifecycleOperation) -> Transition {
    use LifecycleOperation as Op;
    use LifecycleState as S;

    match (state, operation) {
        (S::Submitted, Op::Submit) => Transition::redundant(state, "already submitted"),
        (S::Submitted, Op::Review) => Transition::moved(state, S::UnderReview),
        (S::Submitted, Op::Evaluate) => {
            Transition::illegal(state, "cannot evaluate, not under review")
        }
        (S::Submitted, Op::Withdraw) => Transition::moved(state, S::Withdrawn),
        (S::Submitted, Op::Decide { .. }) => {
            Transition::illegal(state, "cannot decide, not evaluated")
        }

        (S::UnderReview, Op::Submit) => Transition::redundant(state, "already submitted"),
        (S::UnderReview, Op::Review) => Transition::redundant(state, "already under review"),
        (S::UnderReview, Op::Evaluate) => Transition::moved(state, S::Evaluated),
        (S::UnderReview, Op::Withdraw) => Transition::moved(state, S::Withdrawn),
        (S::UnderReview, Op::Decide { .. }) => {
            Transition::illegal(state, "cannot decide, not evaluated")
        }

        (S::Evaluated, Op::Submit) => Transition::redundant(state, "already submitted"),
        (S::Evaluated, Op::Review) => Transition::redundant(state, "already reviewed"),
        (S::Evaluated, Op::Evaluate) => Transition::redundant(state, "already evaluated"),
        (S::Evaluated, Op::Withdraw) => {
            Transition::illegal(state, "cannot withdraw, already evaluated")
        }
        (S::Evaluated, Op::Decide { approved: true }) => Transition::moved(state, S::Approved),
        (S::Evaluated, Op::Decide { approved: false }) => Transition::moved(state, S::Rejected),

        (S::Withdrawn, Op::Submit) => Transition::illegal(state, "cannot submit, withdrawn"),
        (S::Withdrawn, Op::Review) => Transition::illegal(state, "cannot review, withdrawn"),
        (S::Withdrawn, Op::Evaluate) => Transition::illegal(state, "cannot evaluate, withdrawn"),
        (S::Withdrawn, Op::Withdraw) => Transition::redundant(state, "already withdrawn"),
        (S::Withdrawn, Op::Decide { .. }) => Transition::illegal(state, "cannot decide, withdrawn"),

        (S::Approved | S::Rejected, _) => Transition::redundant(state, "decision is final"),
    }
}

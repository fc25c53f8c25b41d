//! Results of voted entry points.

use std::fmt;

use neofs_primitives::PublicKey;
use serde::{Deserialize, Serialize};

/// What happened to an accepted call.
///
/// [`Outcome::Notified`] and a [`Rejection::StaleEpoch`] rejection cast no
/// vote. After [`Outcome::Executed`] or a subsumed rejection the ballot is
/// gone; see [`Outcome::holds_vote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Vote recorded, quorum not reached yet.
    Pending { votes: usize, threshold: usize },
    /// Quorum reached, the operation was applied.
    Executed,
    /// The operation was refused by name.
    Rejected { reason: Rejection },
    /// The request was forwarded to authorities as a notification.
    Notified,
}

impl Outcome {
    pub fn rejected(reason: Rejection) -> Self {
        Outcome::Rejected { reason }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Outcome::Executed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending { .. })
    }

    /// Whether the caller's vote is still held in a ballot after the call.
    pub fn holds_vote(&self) -> bool {
        matches!(
            self,
            Outcome::Pending { .. }
                | Outcome::Rejected {
                    reason: Rejection::VoteFailed { .. }
                }
        )
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending { votes, threshold } => write!(f, "pending {votes}/{threshold}"),
            Outcome::Executed => f.write_str("executed"),
            Outcome::Rejected { reason } => write!(f, "rejected: {reason}"),
            Outcome::Notified => f.write_str("notified"),
        }
    }
}

/// Named reasons for refusing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Epoch advance to a number not above the stored one. No vote is cast.
    StaleEpoch { requested: u64, current: u64 },
    /// A node with the same identity is already in the working view.
    DuplicateNode { key: PublicKey },
    /// Removal of a node that is not in the working view.
    UnknownNode { key: PublicKey },
    /// The validator vote failed; the ballot stays open for a retry.
    VoteFailed { candidate: PublicKey },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::StaleEpoch { requested, current } => {
                write!(f, "epoch {requested} is not above current epoch {current}")
            }
            Rejection::DuplicateNode { key } => write!(f, "node {key} is already in the netmap"),
            Rejection::UnknownNode { key } => write!(f, "node {key} is not in the netmap"),
            Rejection::VoteFailed { candidate } => write!(f, "vote for {candidate} failed"),
        }
    }
}

/// Result of a quorum-gated effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The effect was applied; the ballot is discarded.
    Applied,
    /// The operation was subsumed by earlier state; the ballot is discarded.
    Subsumed(Rejection),
    /// The effect failed; the ballot is kept so a later vote retries it.
    Failed(Rejection),
}

//! Threshold gate shared by every voted entry point.
//!
//! Each voted operation follows the same sequence: cast the caller's vote,
//! compare the voter count with the threshold, run the effect once when it
//! is reached and discard the ballot. All of it happens inside one
//! invocation, so the read-modify-write of the ballot sequence and the effect
//! commit together.

use neofs_primitives::PublicKey;
use tracing::{debug, info, warn};

use crate::ballot::BallotLedger;
use crate::context::ExecutionContext;
use crate::decision::DecisionId;
use crate::error::{ContractError, ContractResult};
use crate::outcome::{Outcome, Resolution};

/// One authority's vote on a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Entry point name, used in logs.
    pub method: &'static str,
    pub id: DecisionId,
    pub voter: PublicKey,
    /// Height or epoch the vote is cast at.
    pub freshness: u64,
    /// Votes needed to execute.
    pub threshold: usize,
}

/// Quorum gate over a ballot ledger.
#[derive(Debug, Clone, Copy)]
pub struct Quorum {
    ledger: BallotLedger,
}

impl Quorum {
    pub const fn new(ledger: BallotLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &BallotLedger {
        &self.ledger
    }

    /// Records the vote and runs `effect` once the threshold is reached.
    ///
    /// `proposal.voter` is trusted as is. Entry points resolve it first,
    /// through [`crate::inner_ring::authorize`] or the netmap contract's
    /// authority check, and fail with [`ContractError::NotAuthority`] there.
    ///
    /// The ballot is discarded after [`Resolution::Applied`] and
    /// [`Resolution::Subsumed`]; after [`Resolution::Failed`] it stays so the
    /// next vote retries the effect.
    pub fn process<F>(
        &self,
        ctx: &mut ExecutionContext<'_>,
        proposal: Proposal,
        effect: F,
    ) -> ContractResult<Outcome>
    where
        F: FnOnce(&mut ExecutionContext<'_>) -> ContractResult<Resolution>,
    {
        let Proposal {
            method,
            id,
            voter,
            freshness,
            threshold,
        } = proposal;

        if threshold == 0 {
            return Err(ContractError::invalid_argument(method, "zero threshold"));
        }

        let votes = self.ledger.cast(ctx, id, voter, freshness)?.votes();
        if votes < threshold {
            debug!(method, %id, %voter, votes, threshold, "vote recorded");
            ctx.push_log(format!("{method}: processed invoke from inner ring"));
            return Ok(Outcome::Pending { votes, threshold });
        }

        match effect(ctx)? {
            Resolution::Applied => {
                self.ledger.discard(ctx, &id)?;
                info!(method, %id, votes, "quorum reached, decision applied");
                Ok(Outcome::Executed)
            }
            Resolution::Subsumed(reason) => {
                self.ledger.discard(ctx, &id)?;
                warn!(method, %id, %reason, "quorum reached, decision subsumed");
                ctx.push_log(format!("{method}: {reason}"));
                Ok(Outcome::rejected(reason))
            }
            Resolution::Failed(reason) => {
                warn!(method, %id, %reason, "quorum reached, decision failed");
                ctx.push_log(format!("{method}: {reason}"));
                Ok(Outcome::rejected(reason))
            }
        }
    }
}

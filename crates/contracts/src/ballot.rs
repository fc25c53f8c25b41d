//! Ballot ledger.
//!
//! A ballot accumulates the distinct authorities that endorsed one decision.
//! [`Ballots`] holds the pure ledger operations over the ordered ballot
//! sequence; [`BallotLedger`] loads that sequence from a contract column,
//! applies one operation and writes it back whole.
//!
//! Expired ballots are dropped opportunistically: whenever a vote rewrites
//! the sequence, every other ballot outside the retention policy is left
//! out. The ballot being voted on is kept even when it was itself stale
//! before the vote. [`Ballots::prune`] drops expired ballots without voting.

use neofs_config::DEFAULT_BLOCK_DIFF;
use neofs_primitives::PublicKey;
use neofs_store::ColumnId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::decision::DecisionId;
use crate::error::ContractResult;

/// Storage key of the ballot sequence inside a contract column.
pub const BALLOTS_KEY: &[u8] = b"ballots";

/// Byzantine quorum size for `authorities` voters.
///
/// Any two quorums of this size share at least one honest voter as long as
/// no more than `(authorities - 1) / 3` voters are faulty.
///
/// ```
/// use neofs_contracts::threshold;
///
/// assert_eq!(threshold(4), 3);
/// assert_eq!(threshold(7), 5);
/// ```
pub const fn threshold(authorities: usize) -> usize {
    authorities / 3 * 2 + 1
}

/// How long a ballot survives without new votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Freshness is a block height; a ballot expires `span` blocks after its
    /// last vote.
    Window { span: u64 },
    /// Freshness is an epoch; only ballots of the current epoch survive.
    SameEpoch,
}

impl RetentionPolicy {
    pub const fn window(span: u64) -> Self {
        RetentionPolicy::Window { span }
    }

    /// Returns true when a ballot last touched at `freshness` is still live
    /// at `now`.
    pub fn is_fresh(self, freshness: u64, now: u64) -> bool {
        match self {
            RetentionPolicy::Window { span } => now.saturating_sub(freshness) <= span,
            RetentionPolicy::SameEpoch => freshness == now,
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::window(DEFAULT_BLOCK_DIFF)
    }
}

/// Endorsements accumulated for one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub id: DecisionId,
    pub voters: Vec<PublicKey>,
    pub freshness: u64,
}

impl Ballot {
    pub fn new(id: DecisionId, voter: PublicKey, freshness: u64) -> Self {
        Self {
            id,
            voters: vec![voter],
            freshness,
        }
    }

    pub fn votes(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, voter: &PublicKey) -> bool {
        self.voters.contains(voter)
    }
}

/// Result of casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// The vote was new; carries the resulting voter count.
    Counted(usize),
    /// The voter had already endorsed the ballot; nothing changed.
    Repeated(usize),
}

impl Cast {
    pub fn votes(self) -> usize {
        match self {
            Cast::Counted(votes) | Cast::Repeated(votes) => votes,
        }
    }

    pub fn is_counted(self) -> bool {
        matches!(self, Cast::Counted(_))
    }
}

/// The ordered sequence of live ballots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ballots(Vec<Ballot>);

impl Ballots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ballot> {
        self.0.iter()
    }

    pub fn get(&self, id: &DecisionId) -> Option<&Ballot> {
        self.0.iter().find(|ballot| &ballot.id == id)
    }

    /// Records `voter`'s endorsement of `id` at `now`.
    ///
    /// A repeated vote returns the current count and leaves the sequence
    /// untouched. Otherwise the voter is appended (or a ballot is opened)
    /// and other ballots that are stale at `now` are dropped.
    pub fn cast(
        &mut self,
        id: DecisionId,
        voter: PublicKey,
        now: u64,
        policy: RetentionPolicy,
    ) -> Cast {
        if let Some(ballot) = self.get(&id) {
            if ballot.has_voted(&voter) {
                return Cast::Repeated(ballot.votes());
            }
        }

        let mut votes = None;
        self.0.retain_mut(|ballot| {
            if ballot.id == id {
                ballot.voters.push(voter);
                ballot.freshness = ballot.freshness.max(now);
                votes = Some(ballot.votes());
                true
            } else {
                policy.is_fresh(ballot.freshness, now)
            }
        });

        match votes {
            Some(votes) => Cast::Counted(votes),
            None => {
                self.0.push(Ballot::new(id, voter, now));
                Cast::Counted(1)
            }
        }
    }

    /// Removes the ballot for `id`. Returns false when there was none.
    pub fn discard(&mut self, id: &DecisionId) -> bool {
        let before = self.0.len();
        self.0.retain(|ballot| &ballot.id != id);
        self.0.len() != before
    }

    /// Drops every ballot that is stale at `now` and returns how many went.
    pub fn prune(&mut self, now: u64, policy: RetentionPolicy) -> usize {
        let before = self.0.len();
        self.0.retain(|ballot| policy.is_fresh(ballot.freshness, now));
        before - self.0.len()
    }

    /// Voters recorded for `id`, or 0 when no ballot is held.
    ///
    /// A stale ballot still counts until a rewrite drops it, the same count
    /// the next `cast` for `id` builds on.
    pub fn votes(&self, id: &DecisionId) -> usize {
        self.get(id).map_or(0, Ballot::votes)
    }
}

impl From<Vec<Ballot>> for Ballots {
    fn from(ballots: Vec<Ballot>) -> Self {
        Self(ballots)
    }
}

/// Ballot sequence persisted in a contract column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallotLedger {
    column: ColumnId,
    policy: RetentionPolicy,
}

impl BallotLedger {
    pub const fn new(column: ColumnId, policy: RetentionPolicy) -> Self {
        Self { column, policy }
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn load(&self, ctx: &ExecutionContext<'_>) -> ContractResult<Ballots> {
        ctx.load_or_default(self.column, BALLOTS_KEY)
    }

    pub fn save(&self, ctx: &mut ExecutionContext<'_>, ballots: &Ballots) -> ContractResult<()> {
        ctx.save(self.column, BALLOTS_KEY, ballots)
    }

    /// Casts a vote and persists the rewritten sequence when it changed.
    pub fn cast(
        &self,
        ctx: &mut ExecutionContext<'_>,
        id: DecisionId,
        voter: PublicKey,
        freshness: u64,
    ) -> ContractResult<Cast> {
        let mut ballots = self.load(ctx)?;
        let before = ballots.len();
        let cast = ballots.cast(id, voter, freshness, self.policy);
        if cast.is_counted() {
            self.save(ctx, &ballots)?;
            trace!(
                column = %self.column,
                %id,
                votes = cast.votes(),
                dropped = (before + 1).saturating_sub(ballots.len()),
                "ballot rewritten"
            );
        }
        Ok(cast)
    }

    /// Discards the ballot for `id`, writing only if it existed.
    pub fn discard(
        &self,
        ctx: &mut ExecutionContext<'_>,
        id: &DecisionId,
    ) -> ContractResult<bool> {
        let mut ballots = self.load(ctx)?;
        let removed = ballots.discard(id);
        if removed {
            self.save(ctx, &ballots)?;
        }
        Ok(removed)
    }

    /// Drops ballots stale at `now`, writing only if any were dropped.
    pub fn prune(&self, ctx: &mut ExecutionContext<'_>, now: u64) -> ContractResult<usize> {
        let mut ballots = self.load(ctx)?;
        let removed = ballots.prune(now, self.policy);
        if removed > 0 {
            self.save(ctx, &ballots)?;
            debug!(column = %self.column, removed, now, "pruned stale ballots");
        }
        Ok(removed)
    }

    pub fn votes(&self, ctx: &ExecutionContext<'_>, id: &DecisionId) -> ContractResult<usize> {
        Ok(self.load(ctx)?.votes(id))
    }
}

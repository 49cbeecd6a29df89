//! Vote ledger orchestrator
//!
//! Coordinates the vote store, the ledger store and the hash chain
//! primitives to implement cast-vote, tally and chain verification under
//! concurrency control.
//!
//! Block append is strictly serialized per election: a per-election mutex
//! is held across the read-last-block / seal / append window, so two
//! concurrent casts can never observe the same predecessor and fork the
//! chain. The stores carry the uniqueness constraints as backstop.

use crate::auth::AuthContext;
use crate::chain;
use crate::config::LedgerConfig;
use crate::store::{ElectionStore, LedgerStore, VoteStore};
use crate::types::{Block, Choice, Deadline, Vote};
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// Outcome of a chain verification walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainStatus {
    /// Every block correctly references its predecessor
    Valid { length: u64 },

    /// Linkage or content is broken, starting at the given block index
    Broken { index: u64 },
}

/// Snapshot of ledger-wide counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_votes: u64,
    pub quarantined_elections: usize,
}

/// The vote ledger
///
/// Storage handles are injected at construction; the ledger holds no other
/// mutable state beyond its per-election serialization locks and the
/// quarantine set for elections whose chains failed verification.
pub struct VoteLedger {
    votes: Arc<dyn VoteStore>,
    blocks: Arc<dyn LedgerStore>,
    elections: Arc<dyn ElectionStore>,
    config: LedgerConfig,
    append_locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
    quarantined: RwLock<HashMap<Uuid, u64>>,
}

impl VoteLedger {
    /// Create a ledger over the given stores
    pub fn new(
        votes: Arc<dyn VoteStore>,
        blocks: Arc<dyn LedgerStore>,
        elections: Arc<dyn ElectionStore>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            votes,
            blocks,
            elections,
            config,
            append_locks: RwLock::new(HashMap::new()),
            quarantined: RwLock::new(HashMap::new()),
        }
    }

    /// Create a ledger backed by in-memory stores, returning the election
    /// store handle for administrative operations
    pub fn in_memory(
        config: LedgerConfig,
    ) -> (Self, Arc<crate::store::MemoryElectionStore>) {
        let elections = Arc::new(crate::store::MemoryElectionStore::new(config.clone()));
        let ledger = Self::new(
            Arc::new(crate::store::MemoryVoteStore::new()),
            Arc::new(crate::store::MemoryLedgerStore::new()),
            elections.clone(),
            config,
        );
        (ledger, elections)
    }

    /// A deadline derived from the configured default
    pub fn default_deadline(&self) -> Deadline {
        Deadline::after_seconds(self.config.default_deadline_seconds)
    }

    /// Cast a vote and seal it into the election's chain
    ///
    /// Succeeds exactly once per `(voter, election)` pair; every subsequent
    /// call fails with [`Error::AlreadyVoted`]. Exactly one vote record and
    /// one block are created per successful call, in the same atomic scope:
    /// if the block append fails, the vote insert is rolled back before the
    /// per-election serialization is released, so no partial state is ever
    /// observable.
    pub fn cast_vote(
        &self,
        auth: &AuthContext,
        election_id: &Uuid,
        choice: &str,
        deadline: &Deadline,
    ) -> Result<Block> {
        deadline.check()?;
        self.check_quarantine(election_id)?;

        let election = self
            .elections
            .get_election(election_id)?
            .ok_or(Error::ElectionNotFound)?;
        if !election.is_accepting_votes() {
            return Err(Error::ElectionInactive);
        }

        self.validate_choice(election_id, choice)?;

        // Serialize the read-last-block / append window per election.
        let election_lock = self.append_lock(election_id)?;
        let _guard = election_lock
            .lock()
            .map_err(|_| Error::storage("election append lock poisoned"))?;

        // Last check before any write; past this point the operation runs
        // to completion or rolls back.
        deadline.check()?;

        let voter_id = auth.voter_id();
        let fingerprint =
            chain::hash_to_hex(&chain::vote_fingerprint(voter_id, election_id, choice));

        let vote = Vote {
            id: Uuid::new_v4(),
            voter_id: voter_id.to_string(),
            election_id: *election_id,
            choice: choice.to_string(),
            fingerprint: fingerprint.clone(),
            created_at: Utc::now(),
        };

        // Atomic insert-if-absent: the duplicate failure mode is the
        // AlreadyVoted signal, even if a racing check was stale.
        self.votes.insert_if_absent(vote)?;

        let last = self.blocks.last_block(election_id)?;
        let (index, prev_hash) = match &last {
            Some(block) => (block.index + 1, block.hash.clone()),
            None => (0, String::new()),
        };

        let timestamp = Utc::now();
        let hash = chain::hash_to_hex(&chain::block_fingerprint(
            &timestamp,
            &fingerprint,
            &prev_hash,
            election_id,
        ));

        let block = Block {
            index,
            timestamp,
            vote_fingerprint: fingerprint,
            prev_hash,
            hash,
            election_id: *election_id,
        };

        if let Err(err) = self.blocks.append(block.clone()) {
            // Keep the atomic scope honest: a vote without its block must
            // not survive the failed append.
            self.votes.rollback_insert(voter_id, election_id)?;
            return Err(err);
        }

        tracing::info!(
            election_id = %election_id,
            block_index = block.index,
            "🧱 Vote sealed into chain"
        );

        Ok(block)
    }

    /// Tally an election by replaying its chain
    ///
    /// Resolves each block's vote fingerprint back to its vote and counts
    /// per choice. The total across all choices equals the chain length.
    /// Choices with zero votes are absent; cross-joining against the
    /// registered choice set is the caller's presentation decision.
    pub fn tally(
        &self,
        election_id: &Uuid,
        deadline: &Deadline,
    ) -> Result<BTreeMap<String, u64>> {
        deadline.check()?;
        self.check_quarantine(election_id)?;

        self.elections
            .get_election(election_id)?
            .ok_or(Error::ElectionNotFound)?;

        let blocks = self.blocks.blocks(election_id)?;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();

        for block in &blocks {
            let vote = self
                .votes
                .get_by_fingerprint(&block.vote_fingerprint)?
                .ok_or_else(|| self.quarantine(election_id, block.index))?;
            *counts.entry(vote.choice).or_insert(0) += 1;
        }

        deadline.check()?;
        Ok(counts)
    }

    /// Verify an election's chain integrity
    ///
    /// Walks the ordered block sequence and checks, for each block, the
    /// genesis rule (`prev_hash == ""` at index 0), predecessor linkage,
    /// sequence contiguity and the block's own recomputed fingerprint.
    /// Returns the first offending index, or confirms validity. A broken
    /// chain quarantines the election: further casts and tallies are
    /// refused until an operator intervenes.
    pub fn verify_chain(&self, election_id: &Uuid) -> Result<ChainStatus> {
        self.elections
            .get_election(election_id)?
            .ok_or(Error::ElectionNotFound)?;

        let blocks = self.blocks.blocks(election_id)?;

        let mut prev_hash = String::new();
        for (position, block) in blocks.iter().enumerate() {
            let expected_hash = chain::hash_to_hex(&chain::block_fingerprint(
                &block.timestamp,
                &block.vote_fingerprint,
                &block.prev_hash,
                election_id,
            ));

            let intact = block.index == position as u64
                && block.prev_hash == prev_hash
                && block.hash == expected_hash;

            if !intact {
                let index = position as u64;
                self.quarantine(election_id, index);
                return Ok(ChainStatus::Broken { index });
            }

            prev_hash = block.hash.clone();
        }

        Ok(ChainStatus::Valid {
            length: blocks.len() as u64,
        })
    }

    /// Read an election's chain, oldest block first
    pub fn chain(&self, election_id: &Uuid, deadline: &Deadline) -> Result<Vec<Block>> {
        deadline.check()?;
        self.check_quarantine(election_id)?;

        self.elections
            .get_election(election_id)?
            .ok_or(Error::ElectionNotFound)?;

        self.blocks.blocks(election_id)
    }

    /// Registered choices of an election
    pub fn choices(&self, election_id: &Uuid) -> Result<Vec<Choice>> {
        self.elections
            .get_election(election_id)?
            .ok_or(Error::ElectionNotFound)?;
        self.elections.choices(election_id)
    }

    /// Whether an election's chain is quarantined
    pub fn is_quarantined(&self, election_id: &Uuid) -> bool {
        self.quarantined
            .read()
            .map(|q| q.contains_key(election_id))
            .unwrap_or(true)
    }

    /// Snapshot of ledger-wide counters
    pub fn stats(&self) -> Result<LedgerStats> {
        let quarantined = self
            .quarantined
            .read()
            .map_err(|_| Error::storage("quarantine lock poisoned"))?
            .len();
        Ok(LedgerStats {
            total_votes: self.votes.count()?,
            quarantined_elections: quarantined,
        })
    }

    /// Reject choices that are empty, oversized, or not registered for the
    /// election. An election with no registered choices accepts no votes.
    fn validate_choice(&self, election_id: &Uuid, choice: &str) -> Result<()> {
        if choice.trim().is_empty() || choice.len() > self.config.max_choice_length {
            return Err(Error::validation("choice"));
        }

        let registered = self.elections.choices(election_id)?;
        if !registered.iter().any(|c| c.text == choice) {
            return Err(Error::validation("choice"));
        }
        Ok(())
    }

    fn append_lock(&self, election_id: &Uuid) -> Result<Arc<Mutex<()>>> {
        {
            let locks = self
                .append_locks
                .read()
                .map_err(|_| Error::storage("append lock map poisoned"))?;
            if let Some(lock) = locks.get(election_id) {
                return Ok(lock.clone());
            }
        }

        let mut locks = self
            .append_locks
            .write()
            .map_err(|_| Error::storage("append lock map poisoned"))?;
        Ok(locks.entry(*election_id).or_default().clone())
    }

    /// Record a chain integrity violation and raise the operator alarm.
    /// Returns the error so callers can propagate it in one expression.
    fn quarantine(&self, election_id: &Uuid, index: u64) -> Error {
        if let Ok(mut quarantined) = self.quarantined.write() {
            quarantined.entry(*election_id).or_insert(index);
        }

        tracing::error!(
            election_id = %election_id,
            block_index = index,
            "🚨 Chain integrity violation: election quarantined, operator action required"
        );

        Error::ChainIntegrityViolation {
            election_id: *election_id,
            index,
        }
    }

    fn check_quarantine(&self, election_id: &Uuid) -> Result<()> {
        let quarantined = self
            .quarantined
            .read()
            .map_err(|_| Error::storage("quarantine lock poisoned"))?;
        match quarantined.get(election_id) {
            Some(&index) => Err(Error::ChainIntegrityViolation {
                election_id: *election_id,
                index,
            }),
            None => Ok(()),
        }
    }
}

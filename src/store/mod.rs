//! Storage contracts for the vote ledger
//!
//! The ledger coordinates three narrow storage interfaces and never talks
//! to a storage engine directly. Handles are injected at construction time;
//! the process entry point owns their lifecycle.

pub mod memory;

use crate::Result;
use crate::types::{Block, Choice, Election, Vote};
use uuid::Uuid;

pub use memory::{MemoryElectionStore, MemoryLedgerStore, MemoryVoteStore};

/// Durable storage of individual vote records
///
/// The store is the authoritative enforcement of the one-vote-per-voter
/// invariant: [`VoteStore::insert_if_absent`] must be atomic, so that the
/// duplicate failure mode IS the duplicate signal even when an
/// application-level check races.
pub trait VoteStore: Send + Sync {
    /// Insert a vote unless one already exists for its
    /// `(voter_id, election_id)` pair.
    ///
    /// Fails with [`crate::Error::AlreadyVoted`] on a duplicate. The check
    /// and the insert are a single atomic operation.
    fn insert_if_absent(&self, vote: Vote) -> Result<()>;

    /// Whether a vote exists for the given voter and election
    fn has_voted(&self, voter_id: &str, election_id: &Uuid) -> Result<bool>;

    /// Look up a vote by its content fingerprint
    fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Vote>>;

    /// Undo an insert whose enclosing cast operation failed.
    ///
    /// Only valid within the same atomic cast scope, while the per-election
    /// serialization is still held; committed votes are never deleted.
    fn rollback_insert(&self, voter_id: &str, election_id: &Uuid) -> Result<()>;

    /// Total number of stored votes
    fn count(&self) -> Result<u64>;
}

/// Durable append-only storage of chain blocks, keyed by election
pub trait LedgerStore: Send + Sync {
    /// Append a block to its election's chain.
    ///
    /// The store enforces uniqueness and contiguity of
    /// `(election_id, index)`; an out-of-sequence append fails with a
    /// retryable storage error. This is the backstop against chain forks
    /// should the caller's serialization ever be bypassed.
    fn append(&self, block: Block) -> Result<()>;

    /// The most recent block of an election's chain, if any
    fn last_block(&self, election_id: &Uuid) -> Result<Option<Block>>;

    /// All blocks of an election's chain, oldest first
    fn blocks(&self, election_id: &Uuid) -> Result<Vec<Block>>;

    /// Number of blocks in an election's chain
    fn chain_length(&self, election_id: &Uuid) -> Result<u64>;
}

/// Read access to election metadata and registered choices
///
/// Election administration (creation, choice registration, lifecycle) is a
/// collaborator concern; the ledger only reads.
pub trait ElectionStore: Send + Sync {
    /// Look up an election by identifier
    fn get_election(&self, id: &Uuid) -> Result<Option<Election>>;

    /// The registered choices of an election
    fn choices(&self, election_id: &Uuid) -> Result<Vec<Choice>>;
}

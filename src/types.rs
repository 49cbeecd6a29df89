//! # Core Types for the Hash-Chained Vote Ledger
//!
//! This module defines the fundamental data structures used throughout the
//! ledger. All types are designed with integrity verification, serialization,
//! and replayability in mind.
//!
//! ## Design Principles
//!
//! - **Append-only history**: [`Vote`] and [`Block`] records are created once
//!   and never mutated or deleted
//! - **Content addressing**: votes are located by their fingerprint, not by
//!   foreign key, which makes the vote↔block mapping itself verifiable
//! - **Hex-encoded digests**: fingerprints are stored as lowercase hex so the
//!   genesis block's missing predecessor is simply the empty string
//!
//! ## Type Categories
//!
//! ### Cryptographic Primitives
//! - [`type@Hash`]: 32-byte Blake3 digests (see [`crate::chain`])
//!
//! ### Core Entities
//! - [`Election`]: election metadata owned by the election store
//! - [`Choice`]: one selectable option within an election
//! - [`Vote`]: a voter's recorded selection, fingerprinted
//! - [`Block`]: an append-only chain entry binding a vote fingerprint
//!
//! ## Usage Example
//!
//! ```rust
//! use vote_ledger::types::Election;
//! use chrono::Utc;
//! use uuid::Uuid;
//!
//! let election = Election {
//!     id: Uuid::new_v4(),
//!     title: "Board Election 2026".to_string(),
//!     description: Some("Annual board member election".to_string()),
//!     created_by: "admin".to_string(),
//!     active: true,
//!     created_at: Utc::now(),
//! };
//!
//! assert!(election.is_accepting_votes());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A cryptographic hash using Blake3 (32 bytes)
///
/// Blake3 provides collision and preimage resistance with a standardized
/// 256-bit output, suitable for content addressing and chain linkage.
/// Deterministic: the same input always produces the identical digest,
/// which is what makes vote lookup-by-fingerprint possible.
pub type Hash = [u8; 32];

/// Voter identity as resolved by the authentication layer
///
/// The ledger trusts this identity without re-validating it; resolving a
/// bearer credential to a voter id is the collaborator's job.
pub type VoterId = String;

/// Election metadata, owned by the election store
///
/// An election is immutable once any block references it. The ledger only
/// reads elections; creation and lifecycle changes happen through the
/// election store's administrative interface.
///
/// # Invariant
///
/// Votes may be cast only while `active` is `true`. The ledger enforces
/// this on every [`crate::ledger::VoteLedger::cast_vote`] call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Election {
    /// Unique election identifier
    pub id: Uuid,

    /// Human-readable election title
    pub title: String,

    /// Optional detailed election description
    pub description: Option<String>,

    /// Identity of the administrator who created the election
    pub created_by: String,

    /// Whether the election is accepting votes
    ///
    /// Administrative flag; deactivating an election stops new votes but
    /// leaves the existing chain readable and verifiable.
    pub active: bool,

    /// Election creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Check if the election is currently accepting votes
    pub fn is_accepting_votes(&self) -> bool {
        self.active
    }
}

/// One selectable option within an election
///
/// Choices are registered per election. Votes whose choice text is not in
/// the registered set are rejected, so a tally can never contain free-text
/// values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Unique choice identifier
    pub id: Uuid,

    /// ID of the election this choice belongs to
    pub election_id: Uuid,

    /// Display text, also the key under which tallies are reported
    pub text: String,
}

/// A voter's recorded selection for one election
///
/// Exactly one `Vote` may exist per `(voter_id, election_id)` pair; the
/// vote store's insert-if-absent primitive is the authoritative enforcement
/// of that uniqueness. Votes are created once and never mutated or deleted.
///
/// The `fingerprint` is the hex-encoded Blake3 digest of the vote content
/// (see [`crate::chain::vote_fingerprint`]) and is how the block chain
/// refers back to this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    /// Unique vote identifier
    pub id: Uuid,

    /// Identity of the voter, as supplied by the authentication layer
    pub voter_id: VoterId,

    /// ID of the election this vote was cast in
    pub election_id: Uuid,

    /// The chosen option's text
    pub choice: String,

    /// Hex-encoded Blake3 fingerprint of (voter, election, choice)
    pub fingerprint: String,

    /// When the vote record was created
    pub created_at: DateTime<Utc>,
}

/// An append-only ledger entry binding a vote fingerprint into the chain
///
/// Blocks are created exactly once per accepted vote, in the same atomic
/// scope as the vote insert, and are never mutated or deleted.
///
/// # Chain invariant
///
/// For every non-genesis block, `prev_hash` equals the immediately
/// preceding block's `hash` within the same election. The genesis block
/// carries an empty `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Position in the election's chain, starting at 0 for genesis
    pub index: u64,

    /// When the block was sealed
    ///
    /// Part of the block fingerprint input, so two blocks over the same
    /// vote fingerprint still hash differently.
    pub timestamp: DateTime<Utc>,

    /// Hex fingerprint of the vote this block commits to
    pub vote_fingerprint: String,

    /// Hex fingerprint of the previous block, empty for genesis
    pub prev_hash: String,

    /// This block's own hex fingerprint
    pub hash: String,

    /// ID of the election this block belongs to
    pub election_id: Uuid,
}

impl Block {
    /// Whether this is the first block of its election's chain
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// A caller-supplied deadline for ledger operations
///
/// Every ledger operation checks its deadline before touching storage and
/// again before any write, so an expired deadline fails cleanly with no
/// partial state.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// Deadline expiring after the given duration from now
    pub fn after(duration: Duration) -> Self {
        Self {
            expires_at: Instant::now() + duration,
        }
    }

    /// Deadline expiring after the given number of seconds from now
    pub fn after_seconds(seconds: u64) -> Self {
        Self::after(Duration::from_secs(seconds))
    }

    /// Check if the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Fail with [`crate::Error::DeadlineExceeded`] if the deadline passed
    pub fn check(&self) -> crate::Result<()> {
        if self.is_expired() {
            Err(crate::Error::DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}

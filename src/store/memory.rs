//! In-memory reference stores
//!
//! Reference implementations of the storage contracts backed by
//! `RwLock`-guarded maps. They enforce the same constraints a relational
//! backend would carry as unique indexes: one vote per
//! `(voter_id, election_id)` and one block per `(election_id, index)`.

use crate::auth::AuthContext;
use crate::config::LedgerConfig;
use crate::store::{ElectionStore, LedgerStore, VoteStore};
use crate::types::{Block, Choice, Election, Vote};
use crate::{Error, Result, storage_error};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Vote records indexed both by voter pair and by fingerprint
#[derive(Default)]
struct VoteIndex {
    by_voter: HashMap<(String, Uuid), Vote>,
    by_fingerprint: HashMap<String, Vote>,
}

/// In-memory [`VoteStore`]
#[derive(Default)]
pub struct MemoryVoteStore {
    index: RwLock<VoteIndex>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteStore for MemoryVoteStore {
    fn insert_if_absent(&self, vote: Vote) -> Result<()> {
        let mut index = self
            .index
            .write()
            .map_err(|_| storage_error!("vote store lock poisoned"))?;

        let key = (vote.voter_id.clone(), vote.election_id);
        if index.by_voter.contains_key(&key) {
            return Err(Error::AlreadyVoted);
        }

        index
            .by_fingerprint
            .insert(vote.fingerprint.clone(), vote.clone());
        index.by_voter.insert(key, vote);
        Ok(())
    }

    fn has_voted(&self, voter_id: &str, election_id: &Uuid) -> Result<bool> {
        let index = self
            .index
            .read()
            .map_err(|_| storage_error!("vote store lock poisoned"))?;
        Ok(index
            .by_voter
            .contains_key(&(voter_id.to_string(), *election_id)))
    }

    fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Vote>> {
        let index = self
            .index
            .read()
            .map_err(|_| storage_error!("vote store lock poisoned"))?;
        Ok(index.by_fingerprint.get(fingerprint).cloned())
    }

    fn rollback_insert(&self, voter_id: &str, election_id: &Uuid) -> Result<()> {
        let mut index = self
            .index
            .write()
            .map_err(|_| storage_error!("vote store lock poisoned"))?;

        if let Some(vote) = index
            .by_voter
            .remove(&(voter_id.to_string(), *election_id))
        {
            index.by_fingerprint.remove(&vote.fingerprint);
        }
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let index = self
            .index
            .read()
            .map_err(|_| storage_error!("vote store lock poisoned"))?;
        Ok(index.by_voter.len() as u64)
    }
}

/// In-memory [`LedgerStore`]
#[derive(Default)]
pub struct MemoryLedgerStore {
    chains: RwLock<HashMap<Uuid, Vec<Block>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of blocks across all chains
    pub fn total_blocks(&self) -> Result<u64> {
        let chains = self
            .chains
            .read()
            .map_err(|_| storage_error!("ledger store lock poisoned"))?;
        Ok(chains.values().map(|c| c.len() as u64).sum())
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn append(&self, block: Block) -> Result<()> {
        let mut chains = self
            .chains
            .write()
            .map_err(|_| storage_error!("ledger store lock poisoned"))?;

        let chain = chains.entry(block.election_id).or_default();

        // Uniqueness constraint on (election_id, index): a stale append
        // conflicts instead of forking the chain.
        if block.index != chain.len() as u64 {
            return Err(storage_error!(
                "block sequence conflict: expected index {}, got {}",
                chain.len(),
                block.index
            ));
        }

        chain.push(block);
        Ok(())
    }

    fn last_block(&self, election_id: &Uuid) -> Result<Option<Block>> {
        let chains = self
            .chains
            .read()
            .map_err(|_| storage_error!("ledger store lock poisoned"))?;
        Ok(chains.get(election_id).and_then(|c| c.last().cloned()))
    }

    fn blocks(&self, election_id: &Uuid) -> Result<Vec<Block>> {
        let chains = self
            .chains
            .read()
            .map_err(|_| storage_error!("ledger store lock poisoned"))?;
        Ok(chains.get(election_id).cloned().unwrap_or_default())
    }

    fn chain_length(&self, election_id: &Uuid) -> Result<u64> {
        let chains = self
            .chains
            .read()
            .map_err(|_| storage_error!("ledger store lock poisoned"))?;
        Ok(chains.get(election_id).map(|c| c.len() as u64).unwrap_or(0))
    }
}

/// In-memory [`ElectionStore`] with administrative operations
///
/// Creation, choice registration and lifecycle changes require the admin
/// role on the supplied [`AuthContext`], mirroring the admin-gated routes
/// of the surrounding application.
pub struct MemoryElectionStore {
    elections: RwLock<HashMap<Uuid, Election>>,
    choices: RwLock<HashMap<Uuid, Vec<Choice>>>,
    config: LedgerConfig,
}

impl MemoryElectionStore {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            elections: RwLock::new(HashMap::new()),
            choices: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create for testing with testing configuration
    pub fn for_testing() -> Self {
        Self::new(LedgerConfig::for_testing())
    }

    /// Create a new election (admin only)
    pub fn create_election(
        &self,
        auth: &AuthContext,
        title: &str,
        description: Option<String>,
    ) -> Result<Election> {
        auth.require_admin("create_election")?;

        if title.trim().is_empty() {
            return Err(Error::validation("title"));
        }
        if title.len() > self.config.max_title_length {
            return Err(Error::validation("title"));
        }

        let election = Election {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description,
            created_by: auth.voter_id().to_string(),
            active: true,
            created_at: Utc::now(),
        };

        let mut elections = self
            .elections
            .write()
            .map_err(|_| storage_error!("election store lock poisoned"))?;
        elections.insert(election.id, election.clone());

        tracing::info!(
            election_id = %election.id,
            created_by = %election.created_by,
            "📋 Election created: {}",
            election.title
        );

        Ok(election)
    }

    /// Register choices for an election (admin only)
    pub fn add_choices(
        &self,
        auth: &AuthContext,
        election_id: &Uuid,
        texts: &[&str],
    ) -> Result<Vec<Choice>> {
        auth.require_admin("add_choices")?;

        {
            let elections = self
                .elections
                .read()
                .map_err(|_| storage_error!("election store lock poisoned"))?;
            if !elections.contains_key(election_id) {
                return Err(Error::ElectionNotFound);
            }
        }

        for text in texts {
            if text.trim().is_empty() || text.len() > self.config.max_choice_length {
                return Err(Error::validation("choice"));
            }
        }

        let mut choices = self
            .choices
            .write()
            .map_err(|_| storage_error!("election store lock poisoned"))?;
        let registered = choices.entry(*election_id).or_default();

        let mut created = Vec::with_capacity(texts.len());
        for text in texts {
            if registered.iter().any(|c| c.text == *text) {
                return Err(Error::validation("choice"));
            }
            let choice = Choice {
                id: Uuid::new_v4(),
                election_id: *election_id,
                text: text.to_string(),
            };
            registered.push(choice.clone());
            created.push(choice);
        }

        Ok(created)
    }

    /// Activate or deactivate an election (admin only)
    pub fn set_active(&self, auth: &AuthContext, election_id: &Uuid, active: bool) -> Result<Election> {
        auth.require_admin("set_active")?;

        let mut elections = self
            .elections
            .write()
            .map_err(|_| storage_error!("election store lock poisoned"))?;

        let election = elections
            .get_mut(election_id)
            .ok_or(Error::ElectionNotFound)?;
        election.active = active;

        tracing::info!(
            election_id = %election.id,
            active,
            "📋 Election state changed"
        );

        Ok(election.clone())
    }

    /// List all elections
    pub fn list(&self) -> Result<Vec<Election>> {
        let elections = self
            .elections
            .read()
            .map_err(|_| storage_error!("election store lock poisoned"))?;
        let mut all: Vec<Election> = elections.values().cloned().collect();
        all.sort_by_key(|e| e.created_at);
        Ok(all)
    }
}

impl ElectionStore for MemoryElectionStore {
    fn get_election(&self, id: &Uuid) -> Result<Option<Election>> {
        let elections = self
            .elections
            .read()
            .map_err(|_| storage_error!("election store lock poisoned"))?;
        Ok(elections.get(id).cloned())
    }

    fn choices(&self, election_id: &Uuid) -> Result<Vec<Choice>> {
        let choices = self
            .choices
            .read()
            .map_err(|_| storage_error!("election store lock poisoned"))?;
        Ok(choices.get(election_id).cloned().unwrap_or_default())
    }
}

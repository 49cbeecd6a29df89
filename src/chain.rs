//! Hash chain primitives
//!
//! Pure, deterministic fingerprint functions — the single source of truth
//! for every digest in the ledger. Each input field is length-prefixed
//! (u64 little-endian) before hashing, so no delimiter can be forged by
//! embedding it in a field such as the choice text.

use crate::types::Hash;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Domain separation prefixes so a vote digest can never collide with a
/// block digest over coincidentally identical bytes.
const VOTE_DOMAIN: &[u8] = b"vote-ledger:vote:v1";
const BLOCK_DOMAIN: &[u8] = b"vote-ledger:block:v1";

/// Feed one field into the hasher with an unambiguous length prefix
fn update_field(hasher: &mut blake3::Hasher, field: &[u8]) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field);
}

/// Compute the fingerprint of a vote's content
///
/// Deterministic over `(voter_id, election_id, choice)`: two calls with
/// identical inputs produce the identical digest, which is what allows the
/// tally to resolve a block back to its vote by fingerprint alone.
pub fn vote_fingerprint(voter_id: &str, election_id: &Uuid, choice: &str) -> Hash {
    let mut hasher = blake3::Hasher::new();
    update_field(&mut hasher, VOTE_DOMAIN);
    update_field(&mut hasher, voter_id.as_bytes());
    update_field(&mut hasher, election_id.as_bytes());
    update_field(&mut hasher, choice.as_bytes());
    hasher.finalize().into()
}

/// Compute the fingerprint of a block
///
/// The timestamp is part of the input, so two blocks committing the same
/// vote fingerprint at different moments hash differently. The block
/// fingerprint is therefore not a pure function of vote content alone.
pub fn block_fingerprint(
    timestamp: &DateTime<Utc>,
    vote_fingerprint_hex: &str,
    prev_hash_hex: &str,
    election_id: &Uuid,
) -> Hash {
    let mut hasher = blake3::Hasher::new();
    update_field(&mut hasher, BLOCK_DOMAIN);
    update_field(&mut hasher, &timestamp.timestamp_micros().to_le_bytes());
    update_field(&mut hasher, vote_fingerprint_hex.as_bytes());
    update_field(&mut hasher, prev_hash_hex.as_bytes());
    update_field(&mut hasher, election_id.as_bytes());
    hasher.finalize().into()
}

/// Convert a hash to its lowercase hex representation
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Convert a hex string back to a hash
pub fn hex_to_hash(hex_str: &str) -> Result<Hash> {
    if hex_str.len() != 64 {
        return Err(Error::validation(format!(
            "invalid hex length for hash: expected 64, got {}",
            hex_str.len()
        )));
    }

    let mut hash = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut hash)
        .map_err(|_| Error::validation("invalid hex string"))?;
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_fingerprint_deterministic() {
        let election_id = Uuid::new_v4();

        let a = vote_fingerprint("voter-1", &election_id, "yes");
        let b = vote_fingerprint("voter-1", &election_id, "yes");
        assert_eq!(a, b);

        let other_choice = vote_fingerprint("voter-1", &election_id, "no");
        assert_ne!(a, other_choice);

        let other_voter = vote_fingerprint("voter-2", &election_id, "yes");
        assert_ne!(a, other_voter);

        let other_election = vote_fingerprint("voter-1", &Uuid::new_v4(), "yes");
        assert_ne!(a, other_election);
    }

    #[test]
    fn test_delimiter_injection_does_not_collide() {
        // Under the legacy bare-"|" concatenation these two would hash
        // identically; length prefixing must keep them distinct.
        let election_id = Uuid::new_v4();
        let a = vote_fingerprint("voter|1", &election_id, "yes");
        let b = vote_fingerprint("voter", &election_id, "1|yes");
        assert_ne!(a, b);

        let c = vote_fingerprint("voter", &election_id, "a|b");
        let d = vote_fingerprint("voter|a", &election_id, "b");
        assert_ne!(c, d);
    }

    #[test]
    fn test_block_fingerprint_includes_timestamp() {
        let election_id = Uuid::new_v4();
        let vote_hex = hash_to_hex(&vote_fingerprint("voter-1", &election_id, "yes"));

        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::microseconds(1);

        let h1 = block_fingerprint(&t1, &vote_hex, "", &election_id);
        let h2 = block_fingerprint(&t2, &vote_hex, "", &election_id);
        assert_ne!(h1, h2);

        // Same inputs reproduce the same digest
        let h1_again = block_fingerprint(&t1, &vote_hex, "", &election_id);
        assert_eq!(h1, h1_again);
    }

    #[test]
    fn test_block_fingerprint_links_predecessor() {
        let election_id = Uuid::new_v4();
        let now = Utc::now();
        let vote_hex = hash_to_hex(&vote_fingerprint("voter-1", &election_id, "yes"));

        let genesis = block_fingerprint(&now, &vote_hex, "", &election_id);
        let chained = block_fingerprint(&now, &vote_hex, &hash_to_hex(&genesis), &election_id);
        assert_ne!(genesis, chained);
    }

    #[test]
    fn test_hex_conversions() {
        let hash = vote_fingerprint("voter-1", &Uuid::new_v4(), "yes");
        let hex_str = hash_to_hex(&hash);
        assert_eq!(hex_str.len(), 64);

        let back = hex_to_hash(&hex_str).unwrap();
        assert_eq!(hash, back);

        assert!(hex_to_hash("too-short").is_err());
        assert!(hex_to_hash(&"zz".repeat(32)).is_err());
    }
}

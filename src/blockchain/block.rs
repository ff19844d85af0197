use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed batch of transactions linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    pub timestamp: f64, // seconds since epoch (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// The genesis block. Fully fixed so that every node starts from the same one.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: 0.0,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: now_secs(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// True only for the agreed genesis block, field for field.
    pub fn is_genesis(&self) -> bool {
        *self == Self::genesis()
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::Block;

    #[test]
    fn genesis_is_fixed() {
        let a = Block::genesis();
        let b = Block::genesis();
        assert_eq!(a, b);
        assert_eq!(a.index, 1);
        assert_eq!(a.previous_hash, "1");
        assert_eq!(a.proof, 100);
        assert!(a.transactions.is_empty());
        assert!(a.is_genesis());
    }

    #[test]
    fn new_block_is_stamped_now() {
        let b = Block::new(2, Vec::new(), 7, "prev".into());
        assert!(b.timestamp > 1_600_000_000.0);
        assert!(!b.is_genesis());
    }

    #[test]
    fn altered_genesis_is_not_genesis() {
        let mut other_proof = Block::genesis();
        other_proof.proof = 7;
        assert!(!other_proof.is_genesis());

        let mut minted = Block::genesis();
        minted.transactions.push(crate::transaction::Transaction::new(
            "0",
            "mallory",
            serde_json::Number::from(1_000_000),
        ));
        assert!(!minted.is_genesis());
    }
}

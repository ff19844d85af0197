use std::mem;

use log::debug;

use super::{Block, hasher};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// What a miner needs to know about the head of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub index: u64,
    pub proof: u64,
    pub hash: String,
}

/// In-memory chain plus the pool of transactions waiting for the next block.
///
/// The ledger itself is not synchronized; the node wraps it in a single mutex
/// so that `submit`, `seal_block` and `replace_chain` are linearized.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    pub fn tip(&self) -> Result<Tip> {
        let last = self.last_block()?;
        Ok(Tip {
            index: last.index,
            proof: last.proof,
            hash: hasher::digest(last),
        })
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn submit(&mut self, tx: Transaction) -> Result<u64> {
        let target = self.last_block()?.index + 1;
        self.pending.push(tx);
        debug!("pending pool size now {}", self.pending.len());
        Ok(target)
    }

    /// Seal everything pending into a new block and append it.
    ///
    /// `previous_hash` defaults to the digest of the current last block.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<String>) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => hasher::digest(self.last_block()?),
        };
        let index = self.chain.len() as u64 + 1;
        let block = Block::new(index, mem::take(&mut self.pending), proof, previous_hash);
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Seal a mined block, but only if the chain still ends at `expected_tip`.
    ///
    /// `reward` joins the pending transactions only when the seal goes through.
    pub fn seal_on_tip(
        &mut self,
        expected_tip: &str,
        proof: u64,
        reward: Transaction,
    ) -> Result<Block> {
        let actual = hasher::digest(self.last_block()?);
        if actual != expected_tip {
            return Err(LedgerError::StaleTip {
                expected: expected_tip.to_string(),
                actual,
            });
        }
        self.pending.push(reward);
        self.seal_block(proof, Some(actual))
    }

    /// Swap in a whole new chain. The caller validates it first.
    ///
    /// Pending transactions are kept.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> Result<()> {
        if candidate.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        self.chain = candidate;
        Ok(())
    }
}

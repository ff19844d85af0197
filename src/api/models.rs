use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::blockchain::{Block, ChainValidator, Ledger, ProofOfWork};
use crate::consensus::{ChainFetcher, ConsensusResolver, PeerSet};
use crate::error::Result;
use crate::transaction::Transaction;

/// Everything one node owns: its ledger, its peers and how it mines.
///
/// Built once at startup and handed to every handler; the ledger mutex is the
/// only place where chain and pending pool are mutated.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerSet>,
    pub pow: ProofOfWork,
    pub node_id: String,
    pub resolver: ConsensusResolver,
    pub mine_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(
        node_id: String,
        pow: ProofOfWork,
        fetcher: Arc<dyn ChainFetcher>,
        peer_timeout: Duration,
        mine_timeout: Option<Duration>,
    ) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            peers: Mutex::new(PeerSet::new()),
            pow,
            node_id,
            resolver: ConsensusResolver::new(fetcher, ChainValidator::new(pow), peer_timeout),
            mine_timeout,
        }
    }

    pub fn validator(&self) -> ChainValidator {
        ChainValidator::new(self.pow)
    }

    /// Run one conflict-resolution round against all registered peers.
    pub async fn resolve_conflicts(&self) -> Result<bool> {
        let peers = self.peers.lock().addresses();
        self.resolver.resolve(&peers, &self.ledger).await
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing one can be named in the rejection.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

impl NewTxRequest {
    /// The transaction, or the names of the missing fields.
    pub fn into_transaction(self) -> std::result::Result<Transaction, Vec<&'static str>> {
        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => {
                Ok(Transaction::new(sender, recipient, amount))
            }
            (sender, recipient, amount) => {
                let mut missing = Vec::new();
                if sender.is_none() {
                    missing.push("sender");
                }
                if recipient.is_none() {
                    missing.push("recipient");
                }
                if amount.is_none() {
                    missing.push("amount");
                }
                Err(missing)
            }
        }
    }
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Chain API Models ---------- */

/// Same shape as [`crate::consensus::PeerChain`], borrowed.
#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "New Block Forged",
            index: block.index,
            timestamp: block.timestamp,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub count: usize,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub message: &'static str,
    pub replaced: bool,
    pub chain: &'a [Block],
    pub length: usize,
}

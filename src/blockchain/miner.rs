use log::{debug, info, warn};
use parking_lot::Mutex;
use serde_json::Number;
use tokio_util::sync::CancellationToken;

use super::{Block, Ledger, MINING_REWARD, ProofOfWork, REWARD_SENDER};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// Mine one block on top of whatever the chain tip is.
///
/// The puzzle is solved without holding the ledger lock. If the tip moved in
/// the meantime the proof is stale and the search starts over against the new
/// tip. The reward to `node_id` is added only when the block is sealed.
/// Blocking: run it off the async executor.
pub fn mine(
    ledger: &Mutex<Ledger>,
    pow: &ProofOfWork,
    node_id: &str,
    cancel: &CancellationToken,
) -> Result<Block> {
    loop {
        let tip = ledger.lock().tip()?;
        debug!(
            "MINER - searching proof on top of block #{} (last_proof={}, difficulty={})",
            tip.index,
            tip.proof,
            pow.difficulty()
        );

        let proof = pow
            .solve_until(tip.proof, cancel)
            .ok_or(LedgerError::MiningCancelled)?;

        let reward = Transaction::new(REWARD_SENDER, node_id, Number::from(MINING_REWARD));
        match ledger.lock().seal_on_tip(&tip.hash, proof, reward) {
            Ok(block) => {
                info!(
                    "MINER - sealed block #{} (proof={}, txs={})",
                    block.index,
                    block.proof,
                    block.transactions.len()
                );
                return Ok(block);
            }
            Err(LedgerError::StaleTip { expected, actual }) => {
                warn!("MINER - proof {proof} is stale (tip {expected} -> {actual}), retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

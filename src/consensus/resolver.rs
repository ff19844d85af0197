use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::time::timeout;

use super::client::ChainFetcher;
use crate::blockchain::{Block, ChainValidator, Ledger};
use crate::error::{FetchError, Result};

/// Longest-valid-chain fork choice against a set of peers.
pub struct ConsensusResolver {
    fetcher: Arc<dyn ChainFetcher>,
    validator: ChainValidator,
    peer_timeout: Duration,
}

impl ConsensusResolver {
    pub fn new(
        fetcher: Arc<dyn ChainFetcher>,
        validator: ChainValidator,
        peer_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            validator,
            peer_timeout,
        }
    }

    /// Poll every peer and adopt the longest valid chain that is strictly
    /// longer than ours. Returns whether the local chain was replaced.
    ///
    /// Peers that fail, time out or send an invalid chain are skipped.
    pub async fn resolve(&self, peers: &[String], ledger: &Mutex<Ledger>) -> Result<bool> {
        let local_len = ledger.lock().len();

        let fetches = peers.iter().map(|peer| async move {
            let outcome = match timeout(self.peer_timeout, self.fetcher.fetch_chain(peer)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.peer_timeout.as_millis())),
            };
            (peer, outcome)
        });

        let mut candidates: Vec<(&String, Vec<Block>)> = Vec::new();
        for (peer, outcome) in join_all(fetches).await {
            let snapshot = match outcome {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer {peer}: {e}");
                    continue;
                }
            };
            if snapshot.chain.len() <= local_len {
                debug!(
                    "CONSENSUS - peer {peer} has {} blocks, ours has {local_len}",
                    snapshot.chain.len()
                );
                continue;
            }
            if let Err(fault) = self.validator.validate(&snapshot.chain) {
                warn!("CONSENSUS - rejecting chain from {peer}: {fault}");
                continue;
            }
            candidates.push((peer, snapshot.chain));
        }

        // The chain may have grown while peers were being polled.
        let mut ledger = ledger.lock();
        let mut max_len = ledger.len();
        let mut best = None;
        for (peer, chain) in candidates {
            if chain.len() > max_len {
                max_len = chain.len();
                best = Some((peer, chain));
            }
        }

        match best {
            Some((peer, chain)) => {
                let (old_len, new_len) = (ledger.len(), chain.len());
                ledger.replace_chain(chain)?;
                info!("CONSENSUS - replaced chain with {peer}'s ({old_len} -> {new_len} blocks)");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio_util::sync::CancellationToken;

    use super::ConsensusResolver;
    use crate::blockchain::{Block, ChainValidator, Ledger, ProofOfWork, hasher, miner};
    use crate::consensus::client::testing::StaticFetcher;

    const POW: ProofOfWork = ProofOfWork::new(1);

    fn ledger_with(blocks: usize) -> Mutex<Ledger> {
        let ledger = Mutex::new(Ledger::new());
        for _ in 1..blocks {
            miner::mine(&ledger, &POW, "miner", &CancellationToken::new()).unwrap();
        }
        ledger
    }

    fn chain_of(blocks: usize) -> Vec<Block> {
        ledger_with(blocks).lock().chain().to_vec()
    }

    fn resolver(fetcher: StaticFetcher) -> ConsensusResolver {
        ConsensusResolver::new(
            Arc::new(fetcher),
            ChainValidator::new(POW),
            Duration::from_millis(200),
        )
    }

    fn peers(names: &[&str]) -> Vec<String> {
        names.iter().map(|p| p.to_string()).collect()
    }

    #[actix_web::test]
    async fn adopts_a_longer_valid_chain() {
        let local = ledger_with(2);
        let theirs = chain_of(3);
        let resolver = resolver(StaticFetcher::default().with_chain("b:5000", theirs.clone()));

        assert!(resolver.resolve(&peers(&["b:5000"]), &local).await.unwrap());
        assert_eq!(local.lock().chain(), theirs.as_slice());
    }

    #[actix_web::test]
    async fn keeps_ours_on_equal_or_shorter() {
        let local = ledger_with(2);
        let ours = local.lock().chain().to_vec();
        let resolver = resolver(
            StaticFetcher::default()
                .with_chain("same:1", chain_of(2))
                .with_chain("short:1", chain_of(1)),
        );

        assert!(
            !resolver
                .resolve(&peers(&["same:1", "short:1"]), &local)
                .await
                .unwrap()
        );
        assert_eq!(local.lock().chain(), ours.as_slice());
    }

    #[actix_web::test]
    async fn ignores_a_longer_tampered_chain() {
        let local = ledger_with(2);
        let ours = local.lock().chain().to_vec();
        let mut forged = chain_of(5);
        forged[2].previous_hash = hasher::digest(&forged[0]);
        let resolver = resolver(StaticFetcher::default().with_chain("evil:1", forged));

        assert!(!resolver.resolve(&peers(&["evil:1"]), &local).await.unwrap());
        assert_eq!(local.lock().chain(), ours.as_slice());
    }

    #[actix_web::test]
    async fn ignores_a_chain_built_on_a_different_genesis() {
        let local = ledger_with(2);
        let ours = local.lock().chain().to_vec();

        let mut genesis = Block::genesis();
        genesis.proof = 7;
        genesis.transactions.push(crate::transaction::Transaction::new(
            "0",
            "mallory",
            serde_json::Number::from(1_000_000),
        ));
        let mut forged = vec![genesis];
        for index in 2..=4 {
            let prev = &forged[forged.len() - 1];
            let next = Block::new(index, Vec::new(), POW.solve(prev.proof), hasher::digest(prev));
            forged.push(next);
        }
        assert!(!ChainValidator::new(POW).is_valid(&forged));

        let resolver = resolver(StaticFetcher::default().with_chain("evil:1", forged));
        assert!(!resolver.resolve(&peers(&["evil:1"]), &local).await.unwrap());
        assert_eq!(local.lock().chain(), ours.as_slice());
    }

    #[actix_web::test]
    async fn picks_the_longest_valid_among_many() {
        let local = ledger_with(1);
        let mut forged = chain_of(6);
        forged[3].proof = forged[3].proof.wrapping_add(1);
        let four = chain_of(4);
        let resolver = resolver(
            StaticFetcher::default()
                .with_chain("forged:1", forged)
                .with_chain("three:1", chain_of(3))
                .with_chain("four:1", four.clone()),
        );

        let all = peers(&["forged:1", "three:1", "down:1", "four:1"]);
        assert!(resolver.resolve(&all, &local).await.unwrap());
        assert_eq!(local.lock().chain(), four.as_slice());
    }

    #[actix_web::test]
    async fn slow_peer_does_not_stall_the_rest() {
        let local = ledger_with(1);
        let theirs = chain_of(2);
        let resolver = resolver(
            StaticFetcher::default()
                .with_chain("slow:1", chain_of(4))
                .with_delay("slow:1", Duration::from_secs(30))
                .with_chain("fast:1", theirs.clone()),
        );

        assert!(
            resolver
                .resolve(&peers(&["slow:1", "fast:1"]), &local)
                .await
                .unwrap()
        );
        assert_eq!(local.lock().chain(), theirs.as_slice());
    }

    #[actix_web::test]
    async fn no_peers_means_no_change() {
        let local = ledger_with(1);
        let resolver = resolver(StaticFetcher::default());
        assert!(!resolver.resolve(&[], &local).await.unwrap());
        assert_eq!(local.lock().len(), 1);
    }

    #[actix_web::test]
    async fn pending_pool_survives_replacement() {
        let local = ledger_with(1);
        local
            .lock()
            .submit(crate::transaction::Transaction::new(
                "A",
                "B",
                serde_json::Number::from(5),
            ))
            .unwrap();
        let resolver = resolver(StaticFetcher::default().with_chain("b:1", chain_of(3)));

        assert!(resolver.resolve(&peers(&["b:1"]), &local).await.unwrap());
        assert_eq!(local.lock().pending().len(), 1);
    }
}

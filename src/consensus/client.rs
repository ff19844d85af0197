use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::FetchError;

/// Wire shape of `GET /chain`, served locally and fetched from peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Source of peer chains.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError>;
}

/// Fetches `http://{peer}/chain` over HTTP.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
        let response = self
            .client
            .get(format!("http://{peer}/chain"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let body: PeerChain = response.json().await?;
        if body.length != body.chain.len() {
            return Err(FetchError::LengthMismatch {
                reported: body.length,
                actual: body.chain.len(),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{ChainFetcher, PeerChain};
    use crate::blockchain::Block;
    use crate::error::FetchError;

    /// Canned peer answers. Unknown peers answer with a 503.
    #[derive(Default)]
    pub struct StaticFetcher {
        chains: HashMap<String, Vec<Block>>,
        slow: HashMap<String, Duration>,
    }

    impl StaticFetcher {
        pub fn with_chain(mut self, peer: &str, chain: Vec<Block>) -> Self {
            self.chains.insert(peer.to_string(), chain);
            self
        }

        pub fn with_delay(mut self, peer: &str, delay: Duration) -> Self {
            self.slow.insert(peer.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl ChainFetcher for StaticFetcher {
        async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
            if let Some(delay) = self.slow.get(peer) {
                tokio::time::sleep(*delay).await;
            }
            let chain = self.chains.get(peer).cloned().ok_or(FetchError::Status(503))?;
            Ok(PeerChain {
                length: chain.len(),
                chain,
            })
        }
    }
}

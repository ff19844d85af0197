pub mod client;
pub mod peers;
pub mod resolver;

pub use client::{ChainFetcher, HttpChainFetcher, PeerChain};
pub use peers::PeerSet;
pub use resolver::ConsensusResolver;

/// Default per-peer timeout while resolving conflicts.
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 3_000;

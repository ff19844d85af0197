use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures of local ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The chain lost its genesis block. Only a broken seal/replace path can cause this.
    #[error("chain is empty; the genesis block is missing")]
    EmptyChain,
    #[error("chain tip moved from {expected} to {actual} while the proof was being searched")]
    StaleTip { expected: String, actual: String },
    #[error("proof search was cancelled before a solution was found")]
    MiningCancelled,
    #[error("invalid peer address `{0}`")]
    InvalidPeer(String),
}

/// Why a peer's chain could not be obtained. Never fatal to a resolution round.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("peer answered with status {0}")]
    Status(u16),
    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
    #[error("peer did not answer within {0} ms")]
    Timeout(u128),
}

/// The first inconsistency found while walking a candidate chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainFault {
    #[error("chain has no blocks")]
    Empty,
    #[error("first block is not a genesis block")]
    BadGenesis,
    #[error("block {position} carries index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },
    #[error("block {index} does not link to the digest of its predecessor")]
    BrokenLink { index: u64 },
    #[error("block {index} carries a proof that does not solve its predecessor's puzzle")]
    BadProof { index: u64 },
}

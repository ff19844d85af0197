pub mod block;
pub mod hasher;
pub mod ledger;
pub mod miner;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use ledger::Ledger;
pub use pow::ProofOfWork;
pub use validator::ChainValidator;

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// `previous_hash` of the genesis block, which has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof every node agrees to put in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Reserved sender of mining rewards.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner of each block.
pub const MINING_REWARD: u64 = 1;

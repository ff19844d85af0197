use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;

use super::DEFAULT_DIFFICULTY;

/// How many candidates are tried between two cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// The mining puzzle: find `p` such that SHA-256 of the decimal text
/// `"{last_proof}{p}"` starts with `difficulty` zero hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub const fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Check a proof against the previous block's proof.
    pub fn verify(&self, last_proof: u64, proof: u64) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(format!("{last_proof}{proof}").as_bytes());
        leading_zero_nibbles(&hasher.finalize()) >= self.difficulty
    }

    /// Smallest non-negative proof for `last_proof`. Runs until one is found.
    pub fn solve(&self, last_proof: u64) -> u64 {
        let mut proof = 0;
        while !self.verify(last_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Same search as [`solve`](Self::solve), abandoned with `None` once
    /// `cancel` fires.
    pub fn solve_until(&self, last_proof: u64, cancel: &CancellationToken) -> Option<u64> {
        let mut proof = 0;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return None;
            }
            if self.verify(last_proof, proof) {
                return Some(proof);
            }
            proof = proof.checked_add(1)?;
        }
    }
}

fn leading_zero_nibbles(digest: &[u8]) -> usize {
    let mut count = 0;
    for byte in digest {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}

use super::{Block, ProofOfWork, hasher};
use crate::error::ChainFault;

/// Checks that a chain is internally consistent: the agreed genesis head, contiguous
/// indices, hash links and puzzle solutions between every adjacent pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    pub fn is_valid(&self, chain: &[Block]) -> bool {
        self.validate(chain).is_ok()
    }

    /// Walk the chain and report the first violation.
    pub fn validate(&self, chain: &[Block]) -> Result<(), ChainFault> {
        let genesis = chain.first().ok_or(ChainFault::Empty)?;
        if !genesis.is_genesis() {
            return Err(ChainFault::BadGenesis);
        }

        for (position, pair) in chain.windows(2).enumerate() {
            let (prev, current) = (&pair[0], &pair[1]);

            let expected = prev.index + 1;
            if current.index != expected {
                return Err(ChainFault::IndexGap {
                    position: position + 1,
                    expected,
                    found: current.index,
                });
            }

            if current.previous_hash != hasher::digest(prev) {
                return Err(ChainFault::BrokenLink {
                    index: current.index,
                });
            }

            if !self.pow.verify(prev.proof, current.proof) {
                return Err(ChainFault::BadProof {
                    index: current.index,
                });
            }
        }

        Ok(())
    }
}

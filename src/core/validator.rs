use crate::core::{Block, ProofOfWork};
use crate::error::{LedgerError, Result};
use log::debug;

/// Checks hash linkage and proof-of-work of a materialized chain.
///
/// Pure: no mutation, no I/O.
pub struct ChainValidator;

impl ChainValidator {
    /// Walk every adjacent pair and report the first broken one.
    ///
    /// Positions in the returned error are 1-based, matching block indices
    /// of a well-formed chain. A single-block chain is valid; an empty chain
    /// is [`LedgerError::EmptyChain`].
    pub fn validate(chain: &[Block]) -> Result<()> {
        if chain.is_empty() {
            return Err(LedgerError::EmptyChain);
        }

        for (offset, pair) in chain.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = offset + 2;

            debug!("Checking block {index} against block {}", index - 1);
            if current.get_previous_hash() != previous.hash()? {
                return Err(LedgerError::BrokenLink { index });
            }
            if !ProofOfWork::valid(previous.get_proof(), current.get_proof()) {
                return Err(LedgerError::InvalidChainProof { index });
            }
        }

        Ok(())
    }

    pub fn is_valid(chain: &[Block]) -> bool {
        Self::validate(chain).is_ok()
    }
}

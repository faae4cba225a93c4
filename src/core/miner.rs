use crate::core::{Block, CancelToken, Ledger, ProofOfWork};
use crate::error::Result;
use log::{info, warn};
use std::sync::RwLock;

/// Sender recorded on the reward a node pays itself for mining
pub const MINING_REWARD_SENDER: &str = "0";
pub const MINING_REWARD: i64 = 1;

/// Runs the whole mining step for one node: solve, reward, mint.
pub struct Miner {
    node_id: String,
}

impl Miner {
    pub fn new(node_id: impl Into<String>) -> Miner {
        Miner {
            node_id: node_id.into(),
        }
    }

    pub fn get_node_id(&self) -> &str {
        self.node_id.as_str()
    }

    /// Mine on a ledger the caller owns exclusively
    pub fn mine_now(&self, ledger: &mut Ledger) -> Result<Block> {
        let last_proof = ledger.tail().get_proof();
        let proof = ProofOfWork::search(last_proof);
        ledger.submit_transaction(MINING_REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
        ledger.mint(proof, None)
    }

    /// Mine on a shared ledger without holding its lock during the search.
    ///
    /// Returns `Ok(None)` when the search was cancelled or the tail moved
    /// while searching (a replaced chain or a block minted by someone else);
    /// the found proof is then stale and nothing is committed. `cancel`
    /// should belong to this call alone.
    pub fn mine(&self, ledger: &RwLock<Ledger>, cancel: &CancelToken) -> Result<Option<Block>> {
        let (last_proof, tail_hash) = {
            let ledger = ledger.read()?;
            let tail = ledger.tail();
            (tail.get_proof(), tail.hash()?)
        };

        info!("Searching proof for last proof {last_proof}");
        let proof = match ProofOfWork::search_with_cancel(last_proof, cancel) {
            Some(proof) => proof,
            None => {
                warn!("Mining on top of {tail_hash} was cancelled");
                return Ok(None);
            }
        };

        let mut ledger = ledger.write()?;
        if ledger.tail().hash()? != tail_hash {
            warn!("Tail moved while mining, discarding proof {proof}");
            return Ok(None);
        }

        ledger.submit_transaction(MINING_REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
        let block = ledger.mint(proof, Some(tail_hash))?;
        Ok(Some(block))
    }
}

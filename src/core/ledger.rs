// This is the ledger itself: the committed chain plus the pool of transactions
// waiting for the next block. The chain is append-only through `mint` and can
// only be swapped wholesale through `replace_chain` after consensus picked a
// longer valid history.

use crate::core::{Block, ChainValidator, ProofOfWork, Transaction};
use crate::error::{LedgerError, Result};
use crate::utils::current_timestamp;
use log::{info, warn};

#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,         // Never empty, chain[0] is genesis
    pending: Vec<Transaction>, // Drained into the next minted block
}

impl Ledger {
    // A fresh ledger holds only the genesis block
    pub fn new() -> Result<Ledger> {
        Ok(Self::with_genesis(Block::genesis(current_timestamp()?)))
    }

    pub fn with_genesis(genesis: Block) -> Ledger {
        Ledger {
            chain: vec![genesis],
            pending: Vec::new(),
        }
    }

    // Queue a transaction and tell the caller which block will carry it
    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.tail().get_index() + 1
    }

    // Seal every pending transaction into a new block on top of the tail.
    // I re-check the proof and the link before touching anything, so a bad
    // caller gets an error and the chain and pool stay exactly as they were.
    pub fn mint(&mut self, proof: u64, previous_hash: Option<String>) -> Result<Block> {
        let tail = self.tail();
        let tail_hash = tail.hash()?;
        let last_proof = tail.get_proof();
        let index = tail.get_index() + 1;

        let previous_hash = match previous_hash {
            Some(supplied) if supplied != tail_hash => {
                warn!("Refusing block {index}: previous hash {supplied} does not match tail {tail_hash}");
                return Err(LedgerError::InvalidPreviousHash {
                    expected: tail_hash,
                    actual: supplied,
                });
            }
            Some(supplied) => supplied,
            None => tail_hash,
        };

        if !ProofOfWork::valid(last_proof, proof) {
            warn!("Refusing block {index}: proof {proof} does not solve {last_proof}");
            return Err(LedgerError::InvalidProof { last_proof, proof });
        }

        let timestamp = current_timestamp()?;
        // The pool moves into the block, nothing is shared with the sealed block
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, timestamp, transactions, proof, previous_hash);

        info!(
            "Minted block {} with {} transactions (proof: {})",
            index,
            block.get_transactions().len(),
            proof
        );
        self.chain.push(block.clone());
        Ok(block)
    }

    // Swap in a whole new history. Consensus validates before calling this;
    // the only thing I still refuse is an empty chain.
    pub fn replace_chain(&mut self, new_chain: Vec<Block>) -> Result<()> {
        if new_chain.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        info!(
            "Replacing local chain of length {} with chain of length {}",
            self.chain.len(),
            new_chain.len()
        );
        self.chain = new_chain;
        Ok(())
    }

    pub fn tail(&self) -> &Block {
        // chain is never empty: new/with_genesis seed it and replace_chain refuses []
        &self.chain[self.chain.len() - 1]
    }

    pub fn chain(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pending.as_slice()
    }

    /// Full validation of the live chain
    pub fn is_valid(&self) -> bool {
        ChainValidator::is_valid(&self.chain)
    }
}

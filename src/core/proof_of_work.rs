use crate::utils::sha256_hex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Required prefix of `sha256("{last_proof}{proof}")` in hex
pub const DIFFICULTY_PREFIX: &str = "0000";

// How many candidates the cancellable search tries between flag checks
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Shared flag used to abandon an in-flight proof search.
///
/// Once cancelled a token stays cancelled; each search gets a fresh one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Is `other` a clone of this token?
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct ProofOfWork;

impl ProofOfWork {
    /// Does `proof` solve the puzzle posed by `last_proof`?
    pub fn valid(last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        sha256_hex(guess.as_bytes()).starts_with(DIFFICULTY_PREFIX)
    }

    /// Smallest non-negative proof for `last_proof`. Unbounded.
    pub fn search(last_proof: u64) -> u64 {
        let mut proof = 0;
        while !Self::valid(last_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Like [`ProofOfWork::search`], but gives up with `None` once `cancel` fires
    pub fn search_with_cancel(last_proof: u64, cancel: &CancelToken) -> Option<u64> {
        let mut proof = 0;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return None;
            }
            if Self::valid(last_proof, proof) {
                return Some(proof);
            }
            proof += 1;
        }
    }
}

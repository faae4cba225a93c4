//! Longest-valid-chain conflict resolution
//!
//! Every registered peer is asked for its chain. A peer's chain replaces the
//! local one only if it is strictly longer than the best seen so far and
//! passes [`ChainValidator`]. Peer failures never abort resolution.
//!
//! Fetches run concurrently, but the acceptance decision walks the responses
//! in the order the peers were given (sorted network locations when coming
//! from a [`NodeRegistry`]). Because only strictly longer chains win, the
//! first peer in that order wins a tie.

use crate::core::{Block, ChainValidator, Ledger};
use crate::error::{LedgerError, Result};
use crate::network::NodeRegistry;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::thread;

/// What a peer reports when asked for its chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

impl ChainResponse {
    pub fn from_chain(chain: &[Block]) -> ChainResponse {
        ChainResponse {
            length: chain.len(),
            chain: chain.to_vec(),
        }
    }
}

/// Source of peer chains. Any error means the peer is treated as unreachable.
pub trait ChainFetcher: Sync {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse>;
}

pub struct ConsensusResolver;

impl ConsensusResolver {
    /// Query every peer and adopt the longest valid chain longer than ours.
    ///
    /// Returns `true` when the local chain was replaced.
    pub fn resolve<F: ChainFetcher + ?Sized>(
        ledger: &mut Ledger,
        peers: &NodeRegistry,
        fetcher: &F,
    ) -> Result<bool> {
        let responses = Self::fetch_all(peers.addresses(), fetcher);
        match Self::select_longest(ledger.len(), responses) {
            Some(chain) => {
                ledger.replace_chain(chain)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetch every peer's chain on its own scoped thread.
    ///
    /// Results come back in the same order as `peers`.
    pub fn fetch_all<'a, F, I>(peers: I, fetcher: &F) -> Vec<(String, Result<ChainResponse>)>
    where
        F: ChainFetcher + ?Sized,
        I: IntoIterator<Item = &'a String>,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = peers
                .into_iter()
                .map(|peer| {
                    let peer = peer.as_str();
                    (peer, scope.spawn(move || fetcher.fetch_chain(peer)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(peer, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(LedgerError::Network(format!(
                            "Chain fetch from {peer} panicked"
                        )))
                    });
                    (peer.to_string(), result)
                })
                .collect()
        })
    }

    /// Pick the chain to adopt, if any, processing `responses` in order.
    pub fn select_longest<I>(local_length: usize, responses: I) -> Option<Vec<Block>>
    where
        I: IntoIterator<Item = (String, Result<ChainResponse>)>,
    {
        let mut best_length = local_length;
        let mut best_chain = None;

        for (peer, response) in responses {
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!("Skipping peer {peer}: {e}");
                    continue;
                }
            };

            if response.length != response.chain.len() {
                warn!(
                    "Skipping peer {peer}: reported length {} but sent {} blocks",
                    response.length,
                    response.chain.len()
                );
                continue;
            }

            if response.length <= best_length {
                debug!(
                    "Peer {peer} chain of length {} is not longer than {best_length}",
                    response.length
                );
                continue;
            }

            if let Err(e) = ChainValidator::validate(&response.chain) {
                warn!("Rejecting chain from {peer}: {e}");
                continue;
            }

            info!(
                "Peer {peer} offers a valid chain of length {}",
                response.length
            );
            best_length = response.length;
            best_chain = Some(response.chain);
        }

        best_chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::{ledger_with_blocks, tagged_ledger, with_proof, MockFetcher};

    fn registry(peers: &[&str]) -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        for peer in peers {
            registry.register(&format!("http://{peer}")).unwrap();
        }
        registry
    }

    #[test]
    fn test_adopts_longer_valid_chain_over_longer_invalid_one() {
        let mut local = ledger_with_blocks(3);

        let mut invalid = ledger_with_blocks(5).chain().to_vec();
        invalid[3] = with_proof(&invalid[3], 1);
        let valid = ledger_with_blocks(4);

        let fetcher = MockFetcher::new()
            .with_chain("10.0.0.1:5000", &invalid)
            .with_chain("10.0.0.2:5000", valid.chain());
        let peers = registry(&["10.0.0.1:5000", "10.0.0.2:5000"]);

        assert!(ConsensusResolver::resolve(&mut local, &peers, &fetcher).unwrap());
        assert_eq!(local.len(), 4);
        assert_eq!(local.chain(), valid.chain());
    }

    #[test]
    fn test_keeps_local_chain_when_no_peer_is_longer() {
        let mut local = ledger_with_blocks(3);
        let before = local.chain().to_vec();
        let same_length = ledger_with_blocks(3);
        let shorter = ledger_with_blocks(2);

        let fetcher = MockFetcher::new()
            .with_chain("a:1", same_length.chain())
            .with_chain("b:1", shorter.chain());
        let peers = registry(&["a:1", "b:1"]);

        assert!(!ConsensusResolver::resolve(&mut local, &peers, &fetcher).unwrap());
        assert_eq!(local.chain(), before.as_slice());
    }

    #[test]
    fn test_unreachable_peers_are_skipped() {
        let mut local = ledger_with_blocks(2);
        let longer = ledger_with_blocks(4);

        // "down:1" is registered but the fetcher has nothing for it
        let fetcher = MockFetcher::new().with_chain("up:1", longer.chain());
        let peers = registry(&["down:1", "up:1"]);

        assert!(ConsensusResolver::resolve(&mut local, &peers, &fetcher).unwrap());
        assert_eq!(local.len(), 4);
    }

    #[test]
    fn test_no_peers_means_no_change() {
        let mut local = ledger_with_blocks(2);
        let peers = NodeRegistry::new();
        assert!(!ConsensusResolver::resolve(&mut local, &peers, &MockFetcher::new()).unwrap());
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_peer_in_sorted_order() {
        let mut local = ledger_with_blocks(2);
        let first = tagged_ledger(4, "first");
        let second = tagged_ledger(4, "second");

        let fetcher = MockFetcher::new()
            .with_chain("b.example:1", second.chain())
            .with_chain("a.example:1", first.chain());
        let peers = registry(&["b.example:1", "a.example:1"]);

        assert!(ConsensusResolver::resolve(&mut local, &peers, &fetcher).unwrap());
        assert_eq!(local.chain(), first.chain());
    }

    #[test]
    fn test_lying_length_is_ignored() {
        let mut local = ledger_with_blocks(3);
        let short = ledger_with_blocks(2);

        let fetcher = MockFetcher::new().with_response(
            "liar:1",
            ChainResponse {
                length: 10,
                chain: short.chain().to_vec(),
            },
        );
        let peers = registry(&["liar:1"]);

        assert!(!ConsensusResolver::resolve(&mut local, &peers, &fetcher).unwrap());
        assert_eq!(local.len(), 3);
    }

    #[test]
    fn test_empty_peer_chain_is_rejected() {
        let responses = vec![(
            "empty:1".to_string(),
            Ok(ChainResponse {
                length: 0,
                chain: vec![],
            }),
        )];
        assert!(ConsensusResolver::select_longest(0, responses).is_none());
    }

    #[test]
    fn test_fetch_all_preserves_peer_order() {
        let chain = ledger_with_blocks(1);
        let fetcher = MockFetcher::new()
            .with_chain("a:1", chain.chain())
            .with_chain("c:1", chain.chain());
        let peers = vec!["c:1".to_string(), "b:1".to_string(), "a:1".to_string()];

        let results = ConsensusResolver::fetch_all(&peers, &fetcher);

        let order: Vec<&str> = results.iter().map(|(peer, _)| peer.as_str()).collect();
        assert_eq!(order, vec!["c:1", "b:1", "a:1"]);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}

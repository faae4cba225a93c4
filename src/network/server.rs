use crate::core::{Block, CancelToken, ChainFetcher, ConsensusResolver, Ledger, Miner};
use crate::error::{LedgerError, Result};
use crate::network::{NodeRegistry, TcpChainFetcher};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

const TCP_READ_TIMEOUT: u64 = 60;

/// Requests and replies of the node protocol, one of each per connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Package {
    NewTransaction {
        sender: String,
        recipient: String,
        amount: i64,
    },
    Mine,
    GetChain,
    RegisterNodes {
        nodes: Vec<String>,
    },
    Resolve,
    TransactionAccepted {
        index: u64,
    },
    Mined {
        block: Block,
    },
    Chain {
        length: usize,
        chain: Vec<Block>,
    },
    NodesRegistered {
        total_nodes: Vec<String>,
    },
    Resolved {
        replaced: bool,
        chain: Vec<Block>,
    },
    Error {
        message: String,
    },
}

/// Everything one running node owns.
///
/// The ledger sits behind a single `RwLock`, so transaction submission,
/// minting and chain replacement are serialized against each other.
pub struct NodeState {
    ledger: RwLock<Ledger>,
    registry: RwLock<NodeRegistry>,
    miner: Miner,
    mining: Mutex<Vec<CancelToken>>, // One token per search in flight
    fetcher: Box<dyn ChainFetcher + Send>,
}

impl NodeState {
    pub fn new(ledger: Ledger, node_id: &str, peer_timeout: Duration) -> NodeState {
        Self::with_fetcher(ledger, node_id, Box::new(TcpChainFetcher::new(peer_timeout)))
    }

    pub fn with_fetcher(
        ledger: Ledger,
        node_id: &str,
        fetcher: Box<dyn ChainFetcher + Send>,
    ) -> NodeState {
        NodeState {
            ledger: RwLock::new(ledger),
            registry: RwLock::new(NodeRegistry::new()),
            miner: Miner::new(node_id),
            mining: Mutex::new(Vec::new()),
            fetcher,
        }
    }

    pub fn get_ledger(&self) -> &RwLock<Ledger> {
        &self.ledger
    }

    pub fn get_node_id(&self) -> &str {
        self.miner.get_node_id()
    }

    pub fn submit_transaction(&self, sender: String, recipient: String, amount: i64) -> Result<u64> {
        let mut ledger = self.ledger.write()?;
        Ok(ledger.submit_transaction(sender, recipient, amount))
    }

    pub fn mine(&self) -> Result<Option<Block>> {
        let cancel = self.start_mining()?;
        let mined = self.miner.mine(&self.ledger, &cancel);
        self.finish_mining(&cancel)?;
        mined
    }

    fn start_mining(&self) -> Result<CancelToken> {
        let cancel = CancelToken::new();
        self.mining.lock()?.push(cancel.clone());
        Ok(cancel)
    }

    fn finish_mining(&self, cancel: &CancelToken) -> Result<()> {
        self.mining.lock()?.retain(|running| !running.same_as(cancel));
        Ok(())
    }

    fn cancel_mining(&self) -> Result<()> {
        let running: Vec<CancelToken> = self.mining.lock()?.drain(..).collect();
        if !running.is_empty() {
            info!("Cancelling {} mining searches", running.len());
        }
        for cancel in running {
            cancel.cancel();
        }
        Ok(())
    }

    pub fn chain(&self) -> Result<Vec<Block>> {
        Ok(self.ledger.read()?.chain().to_vec())
    }

    pub fn register_nodes(&self, nodes: &[String]) -> Result<Vec<String>> {
        if nodes.is_empty() {
            return Err(LedgerError::InvalidAddress(
                "Please supply a valid list of nodes".to_string(),
            ));
        }
        let mut registry = self.registry.write()?;
        registry.register_all(nodes)?;
        Ok(registry.addresses().iter().cloned().collect())
    }

    /// Run consensus against every registered peer.
    ///
    /// Peers are fetched without holding the ledger lock; the decision and
    /// the replacement happen under the write lock against the then-current
    /// chain length. A replacement cancels any in-flight mining.
    pub fn resolve(&self) -> Result<bool> {
        let peers: Vec<String> = self.registry.read()?.addresses().iter().cloned().collect();
        let responses = ConsensusResolver::fetch_all(&peers, self.fetcher.as_ref());

        let mut ledger = self.ledger.write()?;
        match ConsensusResolver::select_longest(ledger.len(), responses) {
            Some(chain) => {
                ledger.replace_chain(chain)?;
                self.cancel_mining()?;
                info!("Our chain was replaced, new length {}", ledger.len());
                Ok(true)
            }
            None => {
                info!("Our chain is authoritative");
                Ok(false)
            }
        }
    }
}

/// TCP front end for a [`NodeState`]
pub struct Server {
    state: Arc<NodeState>,
}

impl Server {
    pub fn new(state: NodeState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn get_state(&self) -> Arc<NodeState> {
        Arc::clone(&self.state)
    }

    /// Bind `addr` and serve forever
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| LedgerError::Network(format!("Failed to bind to {addr}: {e}")))?;

        info!(
            "Node {} listening on {addr}",
            self.state.get_node_id()
        );
        self.serve(listener)
    }

    /// Serve an already bound listener, one thread per connection
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer_addr = match stream.peer_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            error!("Failed to get peer address: {e}");
                            continue;
                        }
                    };

                    let state = Arc::clone(&self.state);
                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(&state, stream, peer_addr) {
                            error!("Error handling connection from {peer_addr}: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(state: &NodeState, stream: TcpStream, peer_addr: SocketAddr) -> Result<()> {
        stream
            .set_read_timeout(Some(Duration::from_secs(TCP_READ_TIMEOUT)))
            .map_err(|e| LedgerError::Network(format!("Failed to set read timeout: {e}")))?;

        let reader = BufReader::new(&stream);
        let pkg = match Deserializer::from_reader(reader).into_iter::<Package>().next() {
            Some(pkg) => pkg.map_err(|e| {
                LedgerError::Network(format!("Failed to deserialize package: {e}"))
            })?,
            None => return Ok(()),
        };

        info!("Received request from {peer_addr}: {}", Self::describe(&pkg));
        let reply = Self::process_message(state, pkg);

        let mut writer = &stream;
        serde_json::to_writer(writer, &reply)
            .map_err(|e| LedgerError::Network(format!("Failed to send reply: {e}")))?;
        writer.flush()?;
        let _ = stream.shutdown(Shutdown::Both);
        Ok(())
    }

    fn process_message(state: &NodeState, pkg: Package) -> Package {
        let result = match pkg {
            Package::NewTransaction {
                sender,
                recipient,
                amount,
            } => state
                .submit_transaction(sender, recipient, amount)
                .map(|index| Package::TransactionAccepted { index }),
            Package::Mine => state.mine().map(|mined| match mined {
                Some(block) => Package::Mined { block },
                None => Package::Error {
                    message: "Mining was superseded by a newer chain".to_string(),
                },
            }),
            Package::GetChain => state.chain().map(|chain| Package::Chain {
                length: chain.len(),
                chain,
            }),
            Package::RegisterNodes { nodes } => state
                .register_nodes(&nodes)
                .map(|total_nodes| Package::NodesRegistered { total_nodes }),
            Package::Resolve => state.resolve().and_then(|replaced| {
                Ok(Package::Resolved {
                    replaced,
                    chain: state.chain()?,
                })
            }),
            other => {
                warn!("Ignoring reply-only package sent as a request: {}", Self::describe(&other));
                Err(LedgerError::Network(format!(
                    "{} is not a request",
                    Self::describe(&other)
                )))
            }
        };

        result.unwrap_or_else(|e| Package::Error {
            message: e.to_string(),
        })
    }

    // Chains can be large, log only the variant
    fn describe(pkg: &Package) -> &'static str {
        match pkg {
            Package::NewTransaction { .. } => "NewTransaction",
            Package::Mine => "Mine",
            Package::GetChain => "GetChain",
            Package::RegisterNodes { .. } => "RegisterNodes",
            Package::Resolve => "Resolve",
            Package::TransactionAccepted { .. } => "TransactionAccepted",
            Package::Mined { .. } => "Mined",
            Package::Chain { .. } => "Chain",
            Package::NodesRegistered { .. } => "NodesRegistered",
            Package::Resolved { .. } => "Resolved",
            Package::Error { .. } => "Error",
        }
    }
}

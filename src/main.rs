// This is the entry point for the ledger node binary
// One subcommand starts a node, the others are thin clients that send a
// single request to a running node and print the reply
use clap::Parser;
use ledger_node::{send_request, Command, Ledger, NodeState, Opt, Package, Server, GLOBAL_CONFIG};
use log::{error, LevelFilter};
use std::process;
use std::time::Duration;

// Mining can take a while, so the client waits longer for that reply
const MINE_TIMEOUT: Duration = Duration::from_secs(600);

fn main() {
    // Info by default, RUST_LOG still wins when set
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let default_node = GLOBAL_CONFIG.get_node_addr().to_string();
    let timeout = GLOBAL_CONFIG.peer_timeout();

    match command {
        // Start serving a fresh ledger with only the genesis block
        Command::StartNode { addr } => {
            let addr = addr.unwrap_or(default_node);
            let ledger = Ledger::new()?;
            let state = NodeState::new(ledger, GLOBAL_CONFIG.get_node_id(), timeout);
            Server::new(state).run(&addr)?;
        }
        Command::Send {
            from,
            to,
            amount,
            node,
        } => {
            let pkg = Package::NewTransaction {
                sender: from,
                recipient: to,
                amount,
            };
            match send_request(&node.unwrap_or(default_node), &pkg, timeout)? {
                Package::TransactionAccepted { index } => {
                    println!("Transaction will be added to Block {index}")
                }
                other => return Err(unexpected(other)),
            }
        }
        Command::Mine { node } => {
            match send_request(&node.unwrap_or(default_node), &Package::Mine, MINE_TIMEOUT)? {
                Package::Mined { block } => {
                    println!("New Block Forged");
                    println!("{}", serde_json::to_string_pretty(&block)?);
                }
                other => return Err(unexpected(other)),
            }
        }
        Command::Register { peers, node } => {
            let pkg = Package::RegisterNodes { nodes: peers };
            match send_request(&node.unwrap_or(default_node), &pkg, timeout)? {
                Package::NodesRegistered { total_nodes } => {
                    println!("New nodes have been added");
                    for peer in total_nodes {
                        println!("{peer}");
                    }
                }
                other => return Err(unexpected(other)),
            }
        }
        // Resolution fetches every peer, so give it room for a few round trips
        Command::Resolve { node } => {
            match send_request(&node.unwrap_or(default_node), &Package::Resolve, timeout * 4)? {
                Package::Resolved { replaced, chain } => {
                    if replaced {
                        println!("Our chain was replaced (length {})", chain.len());
                    } else {
                        println!("Our chain is authoritative (length {})", chain.len());
                    }
                }
                other => return Err(unexpected(other)),
            }
        }
        Command::Printchain { node } => {
            match send_request(&node.unwrap_or(default_node), &Package::GetChain, timeout)? {
                Package::Chain { chain, .. } => {
                    for block in chain {
                        println!("Block index: {}", block.get_index());
                        println!("Timestamp: {}", block.get_timestamp());
                        println!("Proof: {}", block.get_proof());
                        println!("Previous hash: {}", block.get_previous_hash());
                        println!("Hash: {}", block.hash()?);
                        for tx in block.get_transactions() {
                            println!(
                                "- {} -> {}: {}",
                                tx.get_sender(),
                                tx.get_recipient(),
                                tx.get_amount()
                            );
                        }
                        println!()
                    }
                }
                other => return Err(unexpected(other)),
            }
        }
    }
    Ok(())
}

fn unexpected(reply: Package) -> Box<dyn std::error::Error> {
    match reply {
        Package::Error { message } => message.into(),
        other => format!("Unexpected reply from node: {other:?}").into(),
    }
}

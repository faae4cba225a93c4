use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ledger-node")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "startnode", about = "Start a ledger node")]
    StartNode {
        #[arg(long = "addr", help = "Address to listen on (defaults to NODE_ADDRESS)")]
        addr: Option<String>,
    },
    #[command(name = "send", about = "Submit a transaction to a node")]
    Send {
        #[arg(help = "Sender address")]
        from: String,
        #[arg(help = "Recipient address")]
        to: String,
        #[arg(help = "Amount to transfer", allow_negative_numbers = true)]
        amount: i64,
        #[arg(long = "node", help = "Node to talk to")]
        node: Option<String>,
    },
    #[command(name = "mine", about = "Ask a node to mine a block")]
    Mine {
        #[arg(long = "node", help = "Node to talk to")]
        node: Option<String>,
    },
    #[command(name = "register", about = "Register peer nodes with a node")]
    Register {
        #[arg(required = true, help = "Peer URLs, e.g. http://127.0.0.1:5001")]
        peers: Vec<String>,
        #[arg(long = "node", help = "Node to talk to")]
        node: Option<String>,
    },
    #[command(name = "resolve", about = "Run longest-chain consensus on a node")]
    Resolve {
        #[arg(long = "node", help = "Node to talk to")]
        node: Option<String>,
    },
    #[command(name = "printchain", about = "Print all blocks of a node's chain")]
    Printchain {
        #[arg(long = "node", help = "Node to talk to")]
        node: Option<String>,
    },
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vml",
    about = "Vending Ledger: revenue splits, inventory, products and eSIMs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Configuration file (defaults to ./vml.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Set the global total balance
    Init(InitArgs),
    /// Run a state-changing operation
    Invoke(CallArgs),
    /// Run a read-only operation
    Query(CallArgs),
    /// List every operation and its parameters
    Operations,
    /// Print raw store entries
    Dump(DumpArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(allow_hyphen_values = true)]
    pub total: String,
}

#[derive(Args)]
pub struct CallArgs {
    pub operation: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct DumpArgs {
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (defaults to 127.0.0.1:7050)
    #[arg(long)]
    pub bind: Option<String>,
}

//! Command-line client for AnkaraKart balance and usage queries
//!
//! # Usage
//!
//! ```bash
//! ankarakart balance 1234567890123456
//! ankarakart usage 1234567890123456 --raw
//! ankarakart --proxy socks5://127.0.0.1:1080 balance 1234567890123456
//! ```
//!
//! Results are printed as JSON on stdout. Errors go to stderr and the
//! process exits with status 1.

use clap::{Args, Parser, Subcommand};

use ankarakart::cli::query::{QueryArgs, QueryKind, run_query_mode};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "ankarakart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args)]
struct GlobalOptions {
    /// Print the backend rows unchanged instead of normalized records
    #[arg(long, global = true)]
    raw: bool,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Proxy server URL (http://host:port, socks5://host:port, etc.)
    #[arg(short, long, global = true, value_name = "PROXY")]
    proxy: Option<String>,

    /// File the spoofed device identity is kept in
    #[arg(long, global = true, value_name = "FILE")]
    identity_file: Option<String>,

    /// Do not write the device identity back after the query
    #[arg(long, global = true)]
    no_save_identity: bool,

    /// Disable TLS certificate verification
    #[arg(long, global = true)]
    disable_tls_verification: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current balance of a card
    Balance {
        /// 16-digit card number
        #[arg(value_name = "CARD")]
        card: String,
    },
    /// Show the recent usage history of a card
    Usage {
        /// 16-digit card number
        #[arg(value_name = "CARD")]
        card: String,
    },
}

impl Cli {
    fn into_query_args(self) -> QueryArgs {
        let (kind, card) = match self.command {
            Commands::Balance { card } => (QueryKind::Balance, card),
            Commands::Usage { card } => (QueryKind::Usage, card),
        };
        let options = self.options;

        QueryArgs {
            kind,
            card,
            raw: options.raw,
            config: options.config,
            proxy: options.proxy,
            identity_file: options.identity_file,
            no_save_identity: options.no_save_identity,
            disable_tls_verification: options.disable_tls_verification,
            verbose: options.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_query_mode(cli.into_query_args()).await
}

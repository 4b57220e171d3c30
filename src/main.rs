//! Token-gated message board (v1)
//!
//! A terminal board where only wallets holding enough of a configured
//! ERC-20 token may post, and every post carries an attestation id.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │                  GATED BOARD                 │
//!   stdin lines    │  ┌────────┐    ┌──────────────────────┐      │
//!   ──────────────▶│  │  view  │───▶│   BoardController    │      │
//!                  │  │terminal│◀───│ connect / submit     │      │
//!   stdout    ◀────│  └────────┘    └───┬──────┬──────┬────┘      │
//!                  │                    │      │      │           │
//!                  │              wallet│ chain│      │attestation│
//!                  │                    ▼      ▼      ▼           │
//!                  │           ┌─────────┐┌───────┐┌──────────┐   │
//!                  │           │ env key ││  RPC  ││   HTTP   │   │
//!                  │           │ / node  ││client ││  client  │   │
//!                  │           └─────────┘└───────┘└──────────┘   │
//!                  └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use gated_board::attestation::AttestationClient;
use gated_board::blockchain::{BlockchainClient, WalletProvider};
use gated_board::board::{BoardController, GatePolicy, SequencerTimeouts};
use gated_board::config::{load_config, BoardConfig, WalletSource};
use gated_board::observability::{logging, metrics};
use gated_board::view::terminal::{
    render_error, render_messages, render_outcome, render_status, HELP,
};
use gated_board::view::{parse_intent, Intent};

#[derive(Clone, Copy, ValueEnum)]
enum WalletArg {
    LocalKey,
    NodeAccounts,
    None,
}

impl From<WalletArg> for WalletSource {
    fn from(arg: WalletArg) -> Self {
        match arg {
            WalletArg::LocalKey => WalletSource::LocalKey,
            WalletArg::NodeAccounts => WalletSource::NodeAccounts,
            WalletArg::None => WalletSource::None,
        }
    }
}

#[derive(Parser)]
#[command(name = "gated-board")]
#[command(about = "Token-gated message board", long_about = None)]
struct Cli {
    /// TOML configuration file; compiled-in defaults are used without one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the wallet provider
    #[arg(short, long, value_enum)]
    wallet: Option<WalletArg>,

    /// Override the log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BoardConfig::default(),
    };
    if let Some(wallet) = cli.wallet {
        config.wallet.source = wallet.into();
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("gated-board v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let gate = GatePolicy::try_from(&config)?;
    tracing::info!(
        token = %gate.token,
        min_balance = %gate.min_balance,
        chain_id = gate.chain_id,
        "Token gate configured"
    );

    let chain = BlockchainClient::new(config.blockchain.clone()).await?;
    if !chain.is_healthy().await {
        tracing::warn!(rpc_url = %config.blockchain.rpc_url, "No RPC provider is answering; connects will fail until one does");
    }
    let wallet = WalletProvider::from_config(&config.wallet, &chain);
    let attestations = AttestationClient::new(&config.attestation)?;

    let board = BoardController::new(
        gate,
        SequencerTimeouts::from(&config.timeouts),
        wallet,
        chain,
        attestations,
    );

    run_repl(&board).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_repl<W, C, A>(board: &BoardController<W, C, A>) -> std::io::Result<()>
where
    W: gated_board::board::WalletConnector,
    C: gated_board::board::ChainReader,
    A: gated_board::board::AttestationService,
{
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let intent = match parse_intent(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match intent {
            Intent::Connect => match board.connect().await {
                Ok(_) => println!("{}", render_status(&board.snapshot())),
                Err(e) => println!("{}", render_error(&e)),
            },
            Intent::Disconnect => {
                board.disconnect();
                println!("disconnected");
            }
            Intent::Draft(text) => board.set_draft(text),
            Intent::Post(text) => {
                let result = match text {
                    Some(text) => board.submit(&text).await,
                    None => board.submit_draft().await,
                };
                match result {
                    Ok(outcome) => println!("{}", render_outcome(&outcome)),
                    Err(e) => println!("{}", render_error(&e)),
                }
            }
            Intent::List => println!("{}", render_messages(&board.messages())),
            Intent::Status => println!("{}", render_status(&board.snapshot())),
            Intent::Help => println!("{}", HELP),
            Intent::Quit => break,
        }
    }

    Ok(())
}

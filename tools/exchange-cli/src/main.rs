mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use matching_engine::{EngineConfig, MarketSession, MatchingEngine};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use commands::Reply;

/// Interactive console for the reference matching engine
#[derive(Debug, Parser)]
#[command(name = "exchange-cli", version)]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not print the prompt
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,exchange_cli=info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let engine = Arc::new(MatchingEngine::new(config));
    let (subscription, mut updates) = engine.subscribe();
    let listener = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            tracing::info!(
                symbol = %update.symbol,
                cause = ?update.cause,
                trades = update.trades.len(),
                bids = update.book.bids.len(),
                asks = update.book.asks.len(),
                "Book updated"
            );
        }
    });

    let mut session = MarketSession::new(Arc::clone(&engine));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if !args.quiet {
            let prompt = format!("[{}]> ", session.selected_symbol());
            stdout.write_all(prompt.as_bytes()).await?;
            stdout.flush().await?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match commands::process_line(&mut session, &line) {
            Ok(Reply::Output(text)) => {
                stdout.write_all(text.as_bytes()).await?;
            }
            Ok(Reply::Quit) => break,
            Err(e) => {
                stdout.write_all(format!("ERROR: {e}\n").as_bytes()).await?;
            }
        }
        stdout.flush().await?;
    }

    engine.unsubscribe(subscription);
    listener.abort();
    Ok(())
}

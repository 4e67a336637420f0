//! Duel - Unified CLI
//!
//! `duel server` runs the referee, `duel client` joins a game.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ServerArgs};
use duel::client::{ClientOutcome, RemotePeer, TerminalSurface, normalize_name, spawn_key_reader};
use duel_server::Server;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Notify, mpsc};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Server(args) => run_server(args).await,
        Command::Client { host, port, name } => run_client(host, port, name).await,
    }
}

/// Run the referee until killed.
async fn run_server(args: ServerArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = args.into_config()?;
    info!(?config, "Starting duel server");

    let server = Server::bind(config).await?;
    server.run().await;
    Ok(())
}

/// Join one game in the terminal.
async fn run_client(host: String, port: u16, name: Option<String>) -> Result<()> {
    // Log to file so the terminal UI is not disturbed
    let log_file = std::fs::File::create("duel_client.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let name = match name {
        Some(raw) => normalize_name(&raw).context("Name must be non-empty and on a single line")?,
        None => prompt_name(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?,
    };

    info!(host = %host, port, name = %name, "Starting duel client");

    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let quit = Arc::new(Notify::new());
    let surface = TerminalSurface::enter(name.clone(), key_rx, Arc::clone(&quit))?;
    spawn_key_reader(key_tx, quit);

    let outcome = play(&host, port, &name, surface).await;

    match outcome {
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "Client failed");
            Err(e)
        }
    }
}

#[instrument(skip(surface))]
async fn play(host: &str, port: u16, name: &str, surface: TerminalSurface) -> Result<ClientOutcome> {
    // The surface is dropped inside `run`, restoring the terminal before anything is printed.
    RemotePeer::connect((host, port), name, surface).await?.run().await
}

/// Asks for a name until a usable one is entered. Fails on end of input.
async fn prompt_name<R, W>(mut input: R, mut output: W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output.write_all(b"Enter your name: ").await?;
        output.flush().await?;

        let mut line = String::new();
        let read = input.read_line(&mut line).await.context("Failed to read name")?;
        anyhow::ensure!(read > 0, "No name entered");

        if let Some(name) = normalize_name(&line) {
            return Ok(name);
        }
    }
}

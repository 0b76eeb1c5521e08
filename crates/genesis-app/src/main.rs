//! Genesis terminal client - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing (stderr, so logs never interleave with the transcript)
//! 3. Build the HTTP backend and a session controller
//! 4. Multiplex stdin lines and backend completions until EOF or /quit

mod cli;
mod client;
mod render;
mod repl;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use genesis_chat::{HttpBackend, SessionController};
use genesis_core::config::GenesisConfig;

use crate::cli::CliArgs;
use crate::client::Client;
use crate::repl::{parse_line, Command};

async fn print(stdout: &mut Stdout, text: &str) -> genesis_core::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> genesis_core::Result<()> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = GenesisConfig::load_or_default(&config_file);
    config.backend.base_url = args.resolve_backend_url(&config.backend.base_url);
    let log_level = args.resolve_log_level(&config.general.log_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    if args.write_config {
        config.save(&config_file)?;
        println!("Wrote configuration to {}", config_file.display());
        return Ok(());
    }

    tracing::info!("Starting Genesis v{}", env!("CARGO_PKG_VERSION"));

    let backend = HttpBackend::new(config.backend.clone())?;
    tracing::info!(
        path = %config_file.display(),
        backend = %backend.base_url(),
        "Configuration resolved"
    );

    let session = SessionController::new(config.session.clone());
    tracing::info!(session = %session.id(), "Session started");
    let (mut client, mut completions) = Client::new(session, backend);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print(
        &mut stdout,
        "Genesis - buy vs rent explainer. /help for commands.\n> ",
    )
    .await?;

    let mut input_closed = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    input_closed = true;
                    break;
                };
                let output = match parse_line(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => client.command(command).await,
                    Err(msg) => format!("{}\n", msg),
                };
                print(&mut stdout, &format!("{}> ", output)).await?;
            }
            Some(completion) = completions.recv() => {
                let output = client.apply(completion);
                print(&mut stdout, &format!("{}> ", output)).await?;
            }
        }
    }

    // Piped input ended: let outstanding answers land before exiting
    while input_closed && client.session().is_loading() {
        let Some(completion) = completions.recv().await else {
            break;
        };
        let output = client.apply(completion);
        print(&mut stdout, &output).await?;
    }

    tracing::info!(
        session = %client.session().id(),
        turns = client.session().transcript().len(),
        "Session ended"
    );
    Ok(())
}

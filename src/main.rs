//! Bento - a focus timer for the terminal
//!
//! Runs one timer block cycling through:
//! - 25 minutes of focus
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 focus cycles

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::warn;

use bento::cli::{Cli, Commands, Display, RunArgs, Session};
use bento::sound::try_create_player;
use bento::timer::{SystemClock, TimerEngine};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects `debug` and
/// the default is `warn`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_session(args).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs an interactive session on stdin.
async fn run_session(args: RunArgs) -> Result<()> {
    let store = Arc::new(
        args.config_store()
            .context("Invalid timer configuration")?,
    );
    let sound = args.sound_source().context("Invalid sound file")?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(store, Arc::new(SystemClock), event_tx);
    if let Some(source) = sound {
        match try_create_player() {
            Some(player) => engine = engine.with_sound(player, source),
            None => warn!("Continuing without a completion sound"),
        }
    }

    let input = BufReader::new(tokio::io::stdin());
    Session::new(engine, event_rx, Display::new(args.json))
        .run(input)
        .await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

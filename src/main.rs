//! # Ranking Bot CLI (`rbot`)
//!
//! Command-line interface for answering natural-language questions about a
//! regional athletics ranking dataset.
//!
//! ## Usage
//!
//! ```bash
//! rbot --config ./config/rbot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rbot ask "<question>"` | Answer a single question and exit |
//! | `rbot repl` | Interactive loop, one question per line |
//! | `rbot stats` | Print a summary of the loaded dataset |
//!
//! ## Examples
//!
//! ```bash
//! rbot ask "resultados de Jose Perez en el 100 metros lisos de los ultimos 5 años"
//! rbot ask "cuantos atletas han corrido el 100m en 2024?"
//! rbot repl
//! rbot stats
//! ```

mod ask;
mod compose;
mod config;
mod dataset;
mod engine;
mod events;
mod intent;
mod llm;
mod mark;
mod normalize;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Ranking Bot — natural-language questions over an athletics ranking
/// dataset, answered with a language model.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with the dataset path and language-model settings.
#[derive(Parser)]
#[command(
    name = "rbot",
    about = "Ranking Bot — natural-language queries over an athletics ranking dataset",
    version,
    long_about = "Ranking Bot translates free-text questions into structured filters with a \
    language-model call, applies them to an in-memory ranking table, and composes the final \
    natural-language answer with a second call."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/rbot.toml`. Dataset and language-model settings
    /// are read from this file.
    #[arg(long, global = true, default_value = "./config/rbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question.
    ///
    /// Runs the full pipeline (intent extraction, filtering, composition)
    /// for one question and prints the answer.
    Ask {
        /// The question, in free text.
        question: String,
    },

    /// Start an interactive question loop.
    ///
    /// Reads one question per line from stdin until EOF or "salir".
    /// Per-question errors are printed and the loop continues.
    Repl,

    /// Print a summary of the loaded dataset.
    ///
    /// Row, athlete, event, and year counts. Useful for verifying the
    /// dataset loads before spending language-model calls.
    Stats,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    // The dataset load is the one fatal failure: without a table the
    // process cannot answer anything, so it is reported once, here.
    let ctx = ask::AppContext::from_config(cfg)?;

    match cli.command {
        Commands::Ask { question } => {
            ask::run_ask(&ctx, &question).await?;
        }
        Commands::Repl => {
            ask::run_repl(&ctx).await?;
        }
        Commands::Stats => {
            ask::run_stats(&ctx)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

//! Per-question orchestration, REPL, and dataset stats.
//!
//! One question flows normalize → extract → execute → compose against the
//! shared, immutable [`AppContext`]. Every per-question failure is caught
//! here and converted into a user-visible message; nothing a single
//! question does can terminate the process or corrupt the table. Only the
//! dataset load at startup is fatal, and that is reported once by `main`.

use anyhow::Result;
use chrono::Datelike;
use std::collections::HashSet;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::compose::compose;
use crate::config::Config;
use crate::dataset::{load_dataset, RankingRecord};
use crate::engine::execute;
use crate::intent::extract_intent;
use crate::llm::{create_model, LanguageModel};
use crate::normalize::normalize;

/// Everything a question needs, constructed once at startup and passed by
/// reference into every question-handling call. No ambient globals.
pub struct AppContext {
    pub config: Config,
    pub table: Vec<RankingRecord>,
    pub model: Box<dyn LanguageModel>,
}

impl AppContext {
    pub fn new(config: Config, table: Vec<RankingRecord>, model: Box<dyn LanguageModel>) -> Self {
        Self {
            config,
            table,
            model,
        }
    }

    /// Load the dataset and construct the model from configuration.
    ///
    /// A load failure here is the one fatal error of the session.
    pub fn from_config(config: Config) -> Result<Self> {
        let table = load_dataset(&config.dataset.path)?;
        info!(rows = table.len(), "dataset loaded");
        let model = create_model(&config.llm)?;
        Ok(Self::new(config, table, model))
    }
}

/// The composed answer plus any filter warnings to surface alongside it.
#[derive(Debug)]
pub struct Answer {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Answer one question end to end.
///
/// Errors from either language-model call (transport or malformed payload)
/// propagate as the single "request failed" condition; the caller reports
/// them without touching the table or later questions.
pub async fn answer_question(ctx: &AppContext, question: &str) -> Result<Answer> {
    let normalized = normalize(question);
    let intent = extract_intent(ctx.model.as_ref(), &normalized).await?;
    debug!(?intent, "intent extracted");

    let current_year = chrono::Local::now().year();
    let output = execute(&intent, &ctx.table, current_year);
    debug!(rows = output.rows.len(), "engine output");

    let text = compose(ctx.model.as_ref(), &output, question).await?;
    Ok(Answer {
        text,
        warnings: output.warnings,
    })
}

/// Answer a single question and print the result.
///
/// Per-question failures are printed as one message and are not fatal.
pub async fn run_ask(ctx: &AppContext, question: &str) -> Result<()> {
    match answer_question(ctx, question).await {
        Ok(answer) => {
            for warning in &answer.warnings {
                println!("{}", warning);
            }
            println!("{}", answer.text);
        }
        Err(err) => {
            println!(
                "Ocurrió un error al procesar tu solicitud: {}. Intenta de nuevo.",
                err
            );
        }
    }
    Ok(())
}

/// Interactive loop: one question per line until EOF or "salir".
pub async fn run_repl(ctx: &AppContext) -> Result<()> {
    println!("¡Haz una pregunta sobre atletas, equipos o marcas y te daré la respuesta!");
    println!("(escribe \"salir\" para terminar)");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let question = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let question = question.trim();

        if question.is_empty() {
            continue;
        }
        if normalize(question) == "salir" {
            break;
        }

        run_ask(ctx, question).await?;
    }

    Ok(())
}

/// Print a summary of the loaded dataset.
pub fn run_stats(ctx: &AppContext) -> Result<()> {
    let athletes: HashSet<&str> = ctx.table.iter().map(|r| r.athlete.as_str()).collect();
    let events: HashSet<&str> = ctx.table.iter().map(|r| r.event_norm.as_str()).collect();
    let years_min = ctx.table.iter().map(|r| r.year).min();
    let years_max = ctx.table.iter().map(|r| r.year).max();
    let unparseable_marks = ctx
        .table
        .iter()
        .filter(|r| r.mark_seconds.is_none())
        .count();

    println!("Ranking Bot — Dataset Stats");
    println!("===========================");
    println!();
    println!("  Dataset:    {}", ctx.config.dataset.path.display());
    println!("  Rows:       {}", ctx.table.len());
    println!("  Athletes:   {}", athletes.len());
    println!("  Events:     {}", events.len());
    match (years_min, years_max) {
        (Some(min), Some(max)) => println!("  Years:      {}-{}", min, max),
        _ => println!("  Years:      -"),
    }
    println!("  Unparseable marks: {}", unparseable_marks);
    println!();

    Ok(())
}

//! # Ranking Bot
//!
//! A natural-language query bot for a regional athletics ranking dataset.
//!
//! Ranking Bot answers free-text questions ("resultados de Jose Perez en el
//! 100 metros lisos de los ultimos 5 años") by translating them into a
//! structured filter intent with a language-model call, applying that intent
//! deterministically to an in-memory ranking table, and composing the final
//! answer with a second language-model call.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────────┐   ┌────────┐
//! │ question │──▶│ normalize │──▶│ intent (LLM) │──▶│ engine │
//! └──────────┘   └───────────┘   └──────────────┘   └───┬────┘
//!                                                       │
//!                              ┌────────────────────────┤
//!                              ▼                        ▼
//!                       ┌────────────┐          ┌───────────────┐
//!                       │ no results │          │ compose (LLM) │
//!                       └────────────┘          └───────────────┘
//! ```
//!
//! The ranking table is loaded once at startup and is read-only for the
//! lifetime of the process; every question is handled against the same
//! shared, immutable [`ask::AppContext`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`normalize`] | Accent/case normalization (ñ preserved) |
//! | [`mark`] | Time-mark parsing (`SS.ss` / `MM:SS.ss`) |
//! | [`events`] | Event synonym table and resolution |
//! | [`dataset`] | Ranking table loading |
//! | [`intent`] | Query-intent extraction and schema |
//! | [`llm`] | Language-model provider abstraction |
//! | [`engine`] | Filter/aggregate query engine |
//! | [`compose`] | Final-answer composition |
//! | [`ask`] | Per-question orchestration and REPL |

pub mod ask;
pub mod compose;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod events;
pub mod intent;
pub mod llm;
pub mod mark;
pub mod normalize;

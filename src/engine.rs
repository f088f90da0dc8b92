//! Deterministic filter/aggregate query engine.
//!
//! [`execute`] applies one [`QueryIntent`] to the shared ranking table and
//! produces either a filtered row sequence (search actions) or a
//! distinct-athlete count with its supporting rows (count actions). All
//! paths degrade to an empty outcome rather than erroring: a missing
//! parameter, an unresolvable event, or a filter value that can't be
//! coerced never aborts the question. The current year is injected by the
//! caller so relative-range filtering stays deterministic under test.

use serde_json::Value;
use std::collections::HashSet;

use crate::dataset::RankingRecord;
use crate::events::resolve_event;
use crate::intent::{Action, QueryIntent};
use crate::normalize::normalize;

/// Result of executing one intent against the table.
///
/// An empty `rows` is a first-class "no results" outcome, not an error.
/// `distinct_athletes` is set only by the count actions. `warnings` carries
/// user-visible notes about filters that were ignored.
#[derive(Debug, Default)]
pub struct EngineOutput<'a> {
    pub rows: Vec<&'a RankingRecord>,
    pub distinct_athletes: Option<usize>,
    pub warnings: Vec<String>,
}

impl<'a> EngineOutput<'a> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn empty() -> Self {
        Self::default()
    }
}

/// Apply `intent` to `table`.
///
/// Dispatches on the extracted action; anything that isn't one of the two
/// count actions takes the default search path, as the original product
/// behavior defines.
pub fn execute<'a>(
    intent: &QueryIntent,
    table: &'a [RankingRecord],
    current_year: i32,
) -> EngineOutput<'a> {
    match intent.action {
        Action::CountByEventAndYear => count_by_event_and_year(intent, table),
        Action::CountByMark => count_by_mark(intent, table),
        _ => search(intent, table, current_year),
    }
}

/// Count distinct athletes that ran a given event in a given year.
///
/// Requires both the event and a coercible exact year; anything missing or
/// unresolvable yields the empty outcome. The count paths use only the
/// synonym table — no substring fallback — since a counted answer over a
/// fuzzy match would be misleading.
fn count_by_event_and_year<'a>(intent: &QueryIntent, table: &'a [RankingRecord]) -> EngineOutput<'a> {
    let (Some(event), Some(year_value)) = (&intent.event, &intent.year) else {
        return EngineOutput::empty();
    };
    let Some(year) = coerce_year(year_value) else {
        return EngineOutput::empty();
    };
    let Some(event_id) = resolve_event(event) else {
        return EngineOutput::empty();
    };

    let rows: Vec<&RankingRecord> = table
        .iter()
        .filter(|r| r.event_norm == event_id && r.year == year)
        .collect();

    EngineOutput {
        distinct_athletes: Some(distinct_athletes(&rows)),
        rows,
        warnings: Vec::new(),
    }
}

/// Count distinct athletes at or under a mark threshold in a given event.
///
/// Rows whose mark could not be parsed are excluded — an unparseable mark
/// is absent data, never a pass.
fn count_by_mark<'a>(intent: &QueryIntent, table: &'a [RankingRecord]) -> EngineOutput<'a> {
    let (Some(event), Some(limit)) = (&intent.event, intent.mark_limit) else {
        return EngineOutput::empty();
    };
    let Some(event_id) = resolve_event(event) else {
        return EngineOutput::empty();
    };

    let rows: Vec<&RankingRecord> = table
        .iter()
        .filter(|r| {
            r.event_norm == event_id && matches!(r.mark_seconds, Some(seconds) if seconds <= limit)
        })
        .collect();

    EngineOutput {
        distinct_athletes: Some(distinct_athletes(&rows)),
        rows,
        warnings: Vec::new(),
    }
}

/// Default search path: independent, cumulative, each-optional filters.
fn search<'a>(
    intent: &QueryIntent,
    table: &'a [RankingRecord],
    current_year: i32,
) -> EngineOutput<'a> {
    let mut rows: Vec<&RankingRecord> = table.iter().collect();
    let mut warnings = Vec::new();

    if let Some(athlete) = &intent.athlete {
        // Token AND-match: "Perez Jose" finds "Jose Perez Gomez"
        let tokens: Vec<String> = normalize(athlete)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        rows.retain(|r| tokens.iter().all(|token| r.athlete_norm.contains(token)));
    }

    if let Some(event) = &intent.event {
        match resolve_event(event) {
            Some(event_id) => rows.retain(|r| r.event_norm == event_id),
            None => {
                // Degraded match for events the synonym table doesn't cover
                let label = normalize(event);
                rows.retain(|r| r.event_norm.contains(&label));
            }
        }
    }

    if let Some(year_value) = &intent.year {
        match coerce_year(year_value) {
            Some(year) => rows.retain(|r| r.year == year),
            None => warnings.push(format!(
                "No se pudo procesar el año: '{}'. Se ignorará este filtro.",
                value_display(year_value)
            )),
        }
    }

    if let Some(range_value) = &intent.year_range {
        match coerce_integer(range_value) {
            Some(range) => {
                let start = current_year - range as i32;
                rows.retain(|r| r.year >= start && r.year <= current_year);
            }
            None => warnings
                .push("No se pudo procesar el rango de años. Se ignorará este filtro.".to_string()),
        }
    }

    if let Some(sort_by) = &intent.sort_by {
        if normalize(sort_by) == "fecha" {
            rows.sort_by(|a, b| b.date.cmp(&a.date));
        }
        // Other sort keys are accepted but have no defined ordering
    }

    EngineOutput {
        rows,
        distinct_athletes: None,
        warnings,
    }
}

fn distinct_athletes(rows: &[&RankingRecord]) -> usize {
    rows.iter()
        .map(|r| r.athlete.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Coerce a JSON year value: an integer, or a string of digits.
fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|y| y as i32),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Coerce a JSON integer value, accepting numeric strings and whole floats.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

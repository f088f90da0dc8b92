//! Ranking table loading.
//!
//! The dataset is a single semicolon-delimited UTF-8 file with one row per
//! ranking entry. It is loaded once at startup into a `Vec<RankingRecord>`
//! that stays read-only for the lifetime of the process; the normalized
//! columns and the numeric mark are computed here, once, so the query engine
//! never re-normalizes per question.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::warn;

use crate::mark::parse_mark;
use crate::normalize::normalize;

/// One row of the ranking dataset, with derived normalized fields.
#[derive(Debug, Clone)]
pub struct RankingRecord {
    pub athlete: String,
    pub team: String,
    pub event: String,
    pub mark: String,
    pub year: i32,
    pub date: NaiveDate,
    pub placement: Option<i64>,
    pub wind: Option<f64>,

    /// Derived at load: accent/case-normalized athlete name.
    pub athlete_norm: String,
    /// Derived at load: accent/case-normalized team name.
    pub team_norm: String,
    /// Derived at load: accent/case-normalized event name.
    pub event_norm: String,
    /// Derived at load: mark in seconds, `None` when unparseable.
    pub mark_seconds: Option<f64>,
}

const REQUIRED_COLUMNS: &[&str] = &["Atleta", "Equipo", "Prueba", "Marca", "Ano", "Fecha"];
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Load the ranking table from a semicolon-delimited file.
///
/// Rules applied per row:
/// - entirely blank rows are dropped;
/// - rows with an empty athlete, event, or mark are dropped;
/// - a non-numeric `Ano` drops the row with a warning;
/// - a `Fecha` not matching `DD/MM/YYYY` fails the whole load.
pub fn load_dataset(path: &Path) -> Result<Vec<RankingRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    let mut lines = content.lines();
    let header_line = match lines.next() {
        Some(line) => line,
        None => bail!("Dataset file is empty: {}", path.display()),
    };

    let header: Vec<&str> = header_line.split(';').map(str::trim).collect();
    for required in REQUIRED_COLUMNS {
        if !header.contains(required) {
            bail!("Dataset is missing required column '{}'", required);
        }
    }

    let column = |name: &str| header.iter().position(|h| *h == name);
    let idx_athlete = column("Atleta").unwrap();
    let idx_team = column("Equipo").unwrap();
    let idx_event = column("Prueba").unwrap();
    let idx_mark = column("Marca").unwrap();
    let idx_year = column("Ano").unwrap();
    let idx_date = column("Fecha").unwrap();
    let idx_placement = column("Puesto");
    let idx_wind = column("Viento");

    let mut records = Vec::new();

    for (line_no, line) in lines.enumerate() {
        let line_no = line_no + 2; // 1-based, after the header
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();

        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }

        let field = |idx: usize| fields.get(idx).copied().unwrap_or("");

        let athlete = field(idx_athlete);
        let event = field(idx_event);
        let mark = field(idx_mark);
        if athlete.is_empty() || event.is_empty() || mark.is_empty() {
            warn!(line = line_no, "dropping row with empty athlete/event/mark");
            continue;
        }

        let year = match field(idx_year).parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                warn!(
                    line = line_no,
                    value = field(idx_year),
                    "dropping row with non-numeric year"
                );
                continue;
            }
        };

        let date = NaiveDate::parse_from_str(field(idx_date), DATE_FORMAT).with_context(|| {
            format!(
                "Invalid date '{}' on line {} (expected DD/MM/YYYY)",
                field(idx_date),
                line_no
            )
        })?;

        let team = field(idx_team);
        let placement = idx_placement.and_then(|idx| field(idx).parse::<i64>().ok());
        let wind = idx_wind.and_then(|idx| field(idx).parse::<f64>().ok());

        records.push(RankingRecord {
            athlete_norm: normalize(athlete),
            team_norm: normalize(team),
            event_norm: normalize(event),
            mark_seconds: parse_mark(mark),
            athlete: athlete.to_string(),
            team: team.to_string(),
            event: event.to_string(),
            mark: mark.to_string(),
            year,
            date,
            placement,
            wind,
        });
    }

    Ok(records)
}

//! Event-name resolution.
//!
//! Users refer to events loosely ("100m", "100 metros", "100 metros lisos")
//! while the dataset carries one canonical label per event
//! ("100 M.L. MASCULINO"). A fixed synonym table maps the common
//! sprint/middle-distance spellings to their canonical label; anything the
//! table doesn't cover falls back to substring matching against the
//! dataset's normalized event column (see the engine's event filter).
//!
//! The table is a plain slice so its contents are auditable: the uniqueness
//! test below fails if any label is mapped twice, which is how a
//! data-entry collision in the source material was caught.

use crate::normalize::normalize;

/// Normalized free-text label → canonical dataset event name.
///
/// Labels must already be in normalized form (lower-case, no accents) since
/// lookups normalize their input first.
pub const EVENT_SYNONYMS: &[(&str, &str)] = &[
    ("100", "100 M.L. MASCULINO"),
    ("100m", "100 M.L. MASCULINO"),
    ("100 metros", "100 M.L. MASCULINO"),
    ("100 metros lisos", "100 M.L. MASCULINO"),
    ("200", "200 M.L. MASCULINO"),
    ("200m", "200 M.L. MASCULINO"),
    ("200 metros", "200 M.L. MASCULINO"),
    ("200 metros lisos", "200 M.L. MASCULINO"),
    ("400", "400 M.L. MASCULINO"),
    ("400m", "400 M.L. MASCULINO"),
    ("400 metros", "400 M.L. MASCULINO"),
    ("400 metros lisos", "400 M.L. MASCULINO"),
    ("800", "800 M.L. MASCULINO"),
    ("800m", "800 M.L. MASCULINO"),
    ("800 metros", "800 M.L. MASCULINO"),
    ("1500", "1500 M.L. MASCULINO"),
    ("1500m", "1500 M.L. MASCULINO"),
    ("1500 metros", "1500 M.L. MASCULINO"),
    ("1500 metros lisos", "1500 M.L. MASCULINO"),
];

/// Resolve a free-text event label to the dataset's normalized event name.
///
/// The input is normalized, looked up exactly in [`EVENT_SYNONYMS`], and the
/// canonical value is post-processed (dots removed, lower-cased) to match
/// the dataset's normalized event column. Returns `None` when the table has
/// no entry — callers fall back to substring matching, so unmapped events
/// still get a best-effort answer.
pub fn resolve_event(raw_label: &str) -> Option<String> {
    let label = normalize(raw_label);
    EVENT_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == label)
        .map(|(_, canonical)| canonical.replace('.', "").to_lowercase())
}

/// Labels that appear more than once in [`EVENT_SYNONYMS`].
///
/// A duplicated label means one spelling silently maps to two events; the
/// source material shipped with such a collision, so the table keeps this
/// check honest.
pub fn duplicate_labels() -> Vec<&'static str> {
    let mut duplicates = Vec::new();
    for (i, (label, _)) in EVENT_SYNONYMS.iter().enumerate() {
        let first = EVENT_SYNONYMS
            .iter()
            .position(|(other, _)| other == label)
            .unwrap_or(i);
        if first < i && !duplicates.contains(label) {
            duplicates.push(*label);
        }
    }
    duplicates
}

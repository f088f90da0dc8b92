//! Time-mark parsing.
//!
//! Marks in the dataset are free text: sprint times like `"10.50"` and
//! middle-distance times like `"1:02.30"` (minutes:seconds). [`parse_mark`]
//! converts both to a comparable number of seconds. Anything that fails
//! numeric conversion yields `None` — callers treat unparseable marks as
//! absent data and exclude them from threshold comparisons.

/// Convert a time-mark string to seconds.
///
/// - `"10.50"` → `Some(10.50)`
/// - `"1:02.30"` → `Some(62.30)` (minutes × 60 + seconds)
/// - `"abc"`, `"1:2:3"`, `""` → `None`
pub fn parse_mark(mark: &str) -> Option<f64> {
    let mark = mark.trim();

    match mark.split_once(':') {
        None => mark.parse::<f64>().ok(),
        Some((minutes, seconds)) => {
            // More than one colon is not a time mark
            if seconds.contains(':') {
                return None;
            }
            let minutes = minutes.parse::<f64>().ok()?;
            let seconds = seconds.parse::<f64>().ok()?;
            Some(minutes * 60.0 + seconds)
        }
    }
}

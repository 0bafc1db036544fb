// =============================================================================
// Price Series Loader — raw JSON rows to a canonical OHLCV series
// =============================================================================
//
// The market-data collaborator returns one JSON object per trading day with
// loosely-named columns ("Date" / "Datetime" / "index", "Open", "High", ...).
// The loader normalises those rows into a `PriceSeries`:
//
//   - the time column is detected by name pattern,
//   - dates are parsed from several wire formats,
//   - numeric fields are coerced; rows that fail coercion are dropped and
//     recorded as warnings (never silently included as zero),
//   - the result is sorted ascending and checked for duplicate dates.
//
// The series is immutable after loading; every derived column downstream is
// produced as a new aligned series.
// =============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One raw row as received from the data service.
pub type RawRow = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day. Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An ordered OHLCV series, strictly ascending by date, no duplicates.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

/// A row the loader refused to include, kept for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RowWarning {
    /// Zero-based index of the row in the raw input.
    pub row: usize,
    pub reason: String,
}

/// Loader result: the series plus any rows dropped along the way.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub series: PriceSeries,
    pub dropped: Vec<RowWarning>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems that prevent producing a series at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No column name matched a date/time pattern.
    MissingTimeColumn,
    /// Two rows resolved to the same calendar date.
    DuplicateDate(NaiveDate),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTimeColumn => write!(f, "no date or time column found in raw input"),
            Self::DuplicateDate(d) => write!(f, "duplicate date in raw input: {d}"),
        }
    }
}

impl std::error::Error for LoadError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Normalise raw rows into a `PriceSeries`.
///
/// Empty input is not an error: it produces an empty series and the caller
/// is responsible for surfacing the "no data" condition.
pub fn load(rows: &[RawRow]) -> Result<LoadOutcome, LoadError> {
    let Some(first) = rows.first() else {
        return Ok(LoadOutcome {
            series: PriceSeries { bars: Vec::new() },
            dropped: Vec::new(),
        });
    };

    let time_col = detect_time_column(first).ok_or(LoadError::MissingTimeColumn)?;

    let mut bars = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match parse_bar(row, &time_col) {
            Ok(bar) => bars.push(bar),
            Err(reason) => {
                debug!(row = idx, %reason, "dropping malformed row");
                dropped.push(RowWarning { row: idx, reason });
            }
        }
    }

    bars.sort_by_key(|b| b.date);
    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(LoadError::DuplicateDate(pair[0].date));
        }
    }

    Ok(LoadOutcome {
        series: PriceSeries { bars },
        dropped,
    })
}

/// Find the key that holds the timestamp: any name containing "date" or
/// "time" (case-insensitive), or the literal "index" left over from a
/// reset dataframe index upstream.
fn detect_time_column(row: &RawRow) -> Option<String> {
    row.keys()
        .find(|k| {
            let lower = k.to_lowercase();
            lower.contains("date") || lower.contains("time") || lower == "index"
        })
        .cloned()
}

/// Parse one row into a `PriceBar`, or explain why it cannot be one.
fn parse_bar(row: &RawRow, time_col: &str) -> Result<PriceBar, String> {
    let date_val = row
        .get(time_col)
        .ok_or_else(|| format!("missing time column '{time_col}'"))?;
    let date = parse_date(date_val).ok_or_else(|| format!("unparseable date: {date_val}"))?;

    let open = numeric_field(row, "open")?;
    let high = numeric_field(row, "high")?;
    let low = numeric_field(row, "low")?;
    let close = numeric_field(row, "close")?;
    let volume = numeric_field(row, "volume")?;

    if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 {
        return Err("non-positive price".to_string());
    }
    if low > open.min(close) || high < open.max(close) {
        return Err("inconsistent OHLC range (low/high do not bound open/close)".to_string());
    }
    if volume < 0.0 {
        return Err("negative volume".to_string());
    }

    Ok(PriceBar {
        date,
        open,
        high,
        low,
        close,
        volume: volume.round() as u64,
    })
}

/// Case-insensitive numeric field lookup with explicit failure reasons.
fn numeric_field(row: &RawRow, name: &str) -> Result<f64, String> {
    let value = row
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
        .ok_or_else(|| format!("missing field '{name}'"))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(format!("unparseable numeric field '{name}': {value}")),
    }
}

/// Accept the date formats the collaborator is known to emit: plain dates,
/// ISO datetimes, RFC 2822 (Flask's default for timestamps), and epoch
/// milliseconds.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(d);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt.date());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt.date());
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }
            if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
                return Some(dt.date_naive());
            }
            None
        }
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

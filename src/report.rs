//! Scan snapshots, summary metrics and tabular export
//!
//! Value-level persistence and presentation contracts: a scan's records can
//! be filtered by minimum score, rolled up into the dashboard's headline
//! metrics, stored as a JSON snapshot keyed by scan timestamp, or exported
//! as CSV. No file or network I/O happens here; callers own where the
//! bytes go.

use crate::score::{RSI_OVERSOLD, VOLUME_SURGE};
use crate::SignalRecord;

/// Errors from snapshot serialization and CSV export
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// ============================================================
// SNAPSHOT
// ============================================================

/// One scan's records keyed by the caller-supplied scan timestamp.
///
/// The engine itself never reads a clock; the timestamp is whatever moment
/// the caller attributes the scan to, which keeps evaluation idempotent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanSnapshot {
    /// Unix timestamp of the scan
    pub timestamp: i64,
    pub records: Vec<SignalRecord>,
}

impl ScanSnapshot {
    pub fn new(timestamp: i64, records: Vec<SignalRecord>) -> Self {
        Self { timestamp, records }
    }

    /// Serialize for the persistence collaborator
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a previously stored scan
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Headline metrics over the snapshot's records
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::of(&self.records)
    }
}

// ============================================================
// SUMMARY & FILTER
// ============================================================

/// The dashboard's headline metrics for a record list
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanSummary {
    pub scanned: usize,
    pub avg_score: f64,
    /// Records with RSI below the oversold threshold
    pub oversold: usize,
    /// Records closing above their slow moving average
    pub above_ma_slow: usize,
    /// Records with a volume-ratio surge
    pub volume_spikes: usize,
}

impl ScanSummary {
    pub fn of(records: &[SignalRecord]) -> Self {
        let scanned = records.len();
        let avg_score = if scanned == 0 {
            0.0
        } else {
            records.iter().map(|r| r.score as f64).sum::<f64>() / scanned as f64
        };

        Self {
            scanned,
            avg_score,
            oversold: records.iter().filter(|r| r.rsi < RSI_OVERSOLD).count(),
            above_ma_slow: records.iter().filter(|r| r.ma_slow.is_above()).count(),
            volume_spikes: records
                .iter()
                .filter(|r| r.volume_ratio > VOLUME_SURGE)
                .count(),
        }
    }
}

/// Keep only records at or above `min_score`, preserving order
pub fn filter_records(records: &[SignalRecord], min_score: u8) -> Vec<SignalRecord> {
    records
        .iter()
        .filter(|r| r.score >= min_score)
        .cloned()
        .collect()
}

// ============================================================
// CSV EXPORT
// ============================================================

/// Export records as CSV, one row per symbol.
///
/// Columns: symbol, close, change_pct, score, rsi, volume_ratio, structure,
/// ma_fast, ma_slow, entry, stop_loss, take_profit. Setup columns are empty
/// when no setup exists.
pub fn to_csv(records: &[SignalRecord]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "symbol",
        "close",
        "change_pct",
        "score",
        "rsi",
        "volume_ratio",
        "structure",
        "ma_fast",
        "ma_slow",
        "entry",
        "stop_loss",
        "take_profit",
    ])?;

    for r in records {
        let (entry, stop_loss, take_profit) = match &r.setup {
            Some(s) => (
                format!("{:.4}", s.entry),
                format!("{:.4}", s.stop_loss),
                format!("{:.4}", s.take_profit),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        wtr.write_record([
            r.symbol.as_str(),
            &format!("{:.4}", r.close),
            &format!("{:.2}", r.change_pct),
            &r.score.to_string(),
            &format!("{:.1}", r.rsi),
            &format!("{:.2}", r.volume_ratio),
            r.structure.label(),
            &r.ma_fast.to_string(),
            &r.ma_slow.to_string(),
            &entry,
            &stop_loss,
            &take_profit,
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(data)?)
}

// ============================================================
// TESTS
// ============================================================

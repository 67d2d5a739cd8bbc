//! # sigscan - Technical Signal Engine
//!
//! Batch analytics engine for daily OHLCV series: RSI, moving averages,
//! volume ratio, swing-based market structure, demand-zone detection and a
//! bounded 0-100 composite score.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigscan::prelude::*;
//!
//! // Define your OHLCV data
//! struct Bar { o: f64, h: f64, l: f64, c: f64, v: f64 }
//!
//! impl OHLCV for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//!     fn volume(&self) -> f64 { self.v }
//! }
//!
//! // Engine with default configuration (50-bar minimum)
//! let engine = SignalEngine::new();
//!
//! let bars: Vec<Bar> = vec![];
//! match engine.evaluate("ACME", &bars) {
//!     Ok(record) => println!("{}: score {}", record.symbol, record.score),
//!     Err(SignalError::InsufficientData { need, got }) => {
//!         println!("skipped: need {need} bars, got {got}");
//!     }
//!     Err(e) => println!("invalid input: {e}"),
//! }
//! ```
//!
//! The pipeline is pure and one-way: raw series -> indicators ->
//! {structure, zones} -> score -> [`SignalRecord`]. Each symbol is
//! independent, so batches parallelize trivially via [`scan_parallel`].

pub mod config;
pub mod indicators;
pub mod report;
pub mod score;
pub mod structure;
pub mod zones;

pub mod prelude {
    pub use crate::{
        // Configuration
        config::{ScoreWeights, SignalConfig},
        // Indicators
        indicators,
        // Reporting
        report::{ScanSnapshot, ScanSummary},
        // Parallel
        scan_parallel,
        // Scoring
        score::ScoreInputs,
        // Structure
        structure::{MarketStructure, SwingKind, SwingPoint},
        // Zones
        zones::{DemandZone, TradeSetup},
        Fraction,
        MaRelation,
        OHLCVExt,
        Period,
        PriceBar,
        Result,
        ScanError,
        SignalEngine,
        // Errors
        SignalError,
        SignalRecord,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors that can occur while evaluating a price series
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignalError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0 (zone margins, buffers, tolerances)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
    /// Create a new Fraction, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(SignalError::InvalidValue(
                "Fraction cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(SignalError::OutOfRange {
                field: "Fraction",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Fraction from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Fraction {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Fraction {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Fraction::new(value).map_err(serde::de::Error::custom)
    }
}

/// Window length in bars (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(SignalError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// Unix timestamp of the bar, when the source carries one
    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
            || self.volume().is_nan()
        {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open() < self.low() || self.open() > self.high() {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "open outside [low, high]",
            });
        }
        if self.close() < self.low() || self.close() > self.high() {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "close outside [low, high]",
            });
        }
        if self.volume() < 0.0 {
            return Err(SignalError::InvalidBar {
                index: 0,
                reason: "negative volume",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// PRICE BAR - concrete serde-able bar
// ============================================================

/// One trading day of OHLCV data with its unix timestamp.
///
/// A ready-made input type for callers that do not bring their own bar
/// struct; any type implementing [`OHLCV`] works just as well.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceBar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Create a validated bar (`low <= open,close <= high`, finite values)
    pub fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self> {
        let bar = Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }
}

impl OHLCV for PriceBar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

// ============================================================
// SIGNAL RECORD - engine output for one symbol
// ============================================================

/// Relationship of the last close to a moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MaRelation {
    Above,
    Below,
}

impl MaRelation {
    #[inline]
    pub fn relate(close: f64, ma: f64) -> Self {
        if close > ma {
            MaRelation::Above
        } else {
            MaRelation::Below
        }
    }

    #[inline]
    pub fn is_above(self) -> bool {
        matches!(self, MaRelation::Above)
    }
}

impl std::fmt::Display for MaRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaRelation::Above => write!(f, "Above"),
            MaRelation::Below => write!(f, "Below"),
        }
    }
}

/// Engine output for one symbol - created fresh on each evaluation
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    /// Last close of the series
    pub close: f64,
    /// Percent change vs. the prior close
    pub change_pct: f64,
    /// Composite score, clamped to 0..=100
    pub score: u8,
    /// RSI at the last bar
    pub rsi: f64,
    /// Last volume over trailing average volume
    pub volume_ratio: f64,
    pub structure: structure::MarketStructure,
    /// Close vs. the fast moving average (default 20 bars)
    pub ma_fast: MaRelation,
    /// Close vs. the slow moving average (default 50 bars)
    pub ma_slow: MaRelation,
    /// Entry/stop/target suggestion; absent when no valid zone exists
    pub setup: Option<zones::TradeSetup>,
}

// ============================================================
// SIGNAL ENGINE
// ============================================================

use config::SignalConfig;
use score::ScoreInputs;

/// Main signal engine - one configuration, evaluated per symbol
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    config: SignalConfig,
}

impl SignalEngine {
    /// Engine with default configuration (RSI 14, MA 20/50, 5-bar volume
    /// window, 5-bar swing window)
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom, validated configuration
    pub fn with_config(config: SignalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Minimum series length the configured windows require
    #[inline]
    pub fn min_bars(&self) -> usize {
        self.config.required_bars()
    }

    /// Evaluate one symbol's series into a [`SignalRecord`].
    ///
    /// The fixed pipeline: indicators -> {structure, zones} -> score.
    /// Fails with [`SignalError::InsufficientData`] when the series is
    /// shorter than [`min_bars`](Self::min_bars); per-bar validation only
    /// runs when [`SignalConfig::validate_data`] is set.
    pub fn evaluate<T: OHLCV>(&self, symbol: &str, bars: &[T]) -> Result<SignalRecord> {
        let cfg = &self.config;

        if cfg.validate_data {
            validate_bars(bars)?;
        }

        let need = cfg.required_bars();
        if bars.len() < need {
            return Err(SignalError::InsufficientData {
                need,
                got: bars.len(),
            });
        }

        let last = bars.len() - 1;
        let close = bars[last].close();
        let prev_close = bars[last - 1].close();
        let change_pct = if prev_close > 0.0 {
            (close - prev_close) / prev_close * 100.0
        } else {
            0.0
        };

        // All last-bar indicator values are defined once the length check
        // passed; the fallbacks never fire for a valid configuration.
        let rsi = indicators::rsi(bars, cfg.rsi_period.get())
            .last()
            .copied()
            .flatten()
            .unwrap_or(indicators::NEUTRAL_RSI);
        let ma_fast = indicators::sma_last(bars, cfg.ma_fast.get()).unwrap_or(close);
        let ma_slow = indicators::sma_last(bars, cfg.ma_slow.get()).unwrap_or(close);
        let volume_ratio = indicators::volume_ratio(bars, cfg.volume_window.get());

        let market_structure = structure::classify(bars, cfg.swing_window.get());

        let zone = zones::find_demand_zone(
            bars,
            cfg.zone_lookahead.get(),
            cfg.zone_confirm_margin.get(),
        );
        let setup = zone.as_ref().and_then(|z| {
            zones::trade_setup(
                close,
                z,
                cfg.zone_stop_buffer.get(),
                cfg.zone_entry_tolerance.get(),
            )
        });

        let score = score::composite_score(
            &ScoreInputs {
                volume_ratio,
                rsi,
                close,
                ma_slow,
                structure: market_structure,
            },
            &cfg.weights,
        );

        Ok(SignalRecord {
            symbol: symbol.to_string(),
            close,
            change_pct,
            score,
            rsi,
            volume_ratio,
            structure: market_structure,
            ma_fast: MaRelation::relate(close, ma_fast),
            ma_slow: MaRelation::relate(close, ma_slow),
            setup,
        })
    }
}

/// Per-bar sanity checks plus strict timestamp ordering where timestamps
/// are present
fn validate_bars<T: OHLCV>(bars: &[T]) -> Result<()> {
    let mut prev_ts: Option<i64> = None;
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            SignalError::InvalidBar { reason, .. } => SignalError::InvalidBar { index: i, reason },
            other => other,
        })?;
        if let Some(ts) = bar.timestamp() {
            if let Some(prev) = prev_ts {
                if ts <= prev {
                    return Err(SignalError::InvalidBar {
                        index: i,
                        reason: "timestamps not strictly increasing",
                    });
                }
            }
            prev_ts = Some(ts);
        }
    }
    Ok(())
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Error from scanning a single symbol
#[derive(Debug, Clone)]
pub struct ScanError {
    pub symbol: String,
    pub error: SignalError,
}

/// Evaluate many symbols in parallel.
///
/// Per-symbol failures never abort the batch; they come back in the second
/// list so callers can report a skipped-ticker count.
pub fn scan_parallel<'a, T, I>(
    engine: &SignalEngine,
    instruments: I,
) -> (Vec<SignalRecord>, Vec<ScanError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine.evaluate(symbol, bars).map_err(|error| ScanError {
                symbol: symbol.to_string(),
                error,
            })
        })
        .collect();

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => records.push(r),
            Err(e) => errors.push(e),
        }
    }

    (records, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(o: f64, h: f64, l: f64, c: f64, v: f64) -> PriceBar {
        PriceBar {
            timestamp: 0,
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
        }
    }

    /// Bars rising one point per day, mild wiggle, flat volume
    fn make_uptrend(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                PriceBar {
                    timestamp: i as i64 * 86_400,
                    open: base - 0.5,
                    high: base + 1.0,
                    low: base - 1.0,
                    close: base + 0.5,
                    volume: 1_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_fraction_validation() {
        assert!(Fraction::new(0.0).is_ok());
        assert!(Fraction::new(1.0).is_ok());
        assert!(Fraction::new(0.02).is_ok());
        assert!(Fraction::new(-0.1).is_err());
        assert!(Fraction::new(1.1).is_err());
        assert!(Fraction::new(f64::NAN).is_err());
        assert!(Fraction::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(50).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let b = bar(100.0, 110.0, 90.0, 105.0, 1_000.0);
        assert_eq!(b.body(), 5.0);
        assert_eq!(b.range(), 20.0);
        assert!(b.is_bullish());
        assert!(!b.is_bearish());
    }

    #[test]
    fn test_price_bar_rejects_inverted_bounds() {
        assert!(PriceBar::new(0, 100.0, 90.0, 110.0, 100.0, 1_000.0).is_err());
        assert!(PriceBar::new(0, 120.0, 110.0, 90.0, 100.0, 1_000.0).is_err());
        assert!(PriceBar::new(0, 100.0, 110.0, 90.0, 100.0, -5.0).is_err());
        assert!(PriceBar::new(0, 100.0, 110.0, 90.0, 105.0, 1_000.0).is_ok());
    }

    #[test]
    fn test_insufficient_data() {
        let engine = SignalEngine::new();
        let bars = make_uptrend(10);
        match engine.evaluate("SHORT", &bars) {
            Err(SignalError::InsufficientData { need, got }) => {
                assert_eq!(need, 50);
                assert_eq!(got, 10);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_uptrend() {
        let engine = SignalEngine::new();
        let record = engine.evaluate("UP", &make_uptrend(60)).unwrap();

        assert_eq!(record.symbol, "UP");
        assert!(record.ma_slow.is_above());
        assert!(record.ma_fast.is_above());
        assert!(record.change_pct > 0.0);
        assert!(record.score <= 100);
        // Monotone rise must never read as bearish structure
        assert_ne!(record.structure, structure::MarketStructure::BosBearish);
        assert_ne!(record.structure, structure::MarketStructure::Downtrend);
    }

    #[test]
    fn test_evaluate_idempotent() {
        let engine = SignalEngine::new();
        let bars = make_uptrend(60);
        let a = engine.evaluate("SAME", &bars).unwrap();
        let b = engine.evaluate("SAME", &bars).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_bars_ordering() {
        let cfg = SignalConfig {
            validate_data: true,
            ..SignalConfig::default()
        };
        let engine = SignalEngine::with_config(cfg).unwrap();

        let mut bars = make_uptrend(60);
        bars[30].timestamp = bars[29].timestamp; // duplicate date
        match engine.evaluate("DUP", &bars) {
            Err(SignalError::InvalidBar { index, .. }) => assert_eq!(index, 30),
            other => panic!("expected InvalidBar, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_parallel_mixed_batch() {
        let engine = SignalEngine::new();
        let long = make_uptrend(60);
        let short = make_uptrend(10);

        let instruments: Vec<(&str, &[PriceBar])> =
            vec![("LONG", &long), ("SHORT", &short), ("LONG2", &long)];

        let (records, errors) = scan_parallel(&engine, instruments);
        assert_eq!(records.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].symbol, "SHORT");
        assert!(matches!(
            errors[0].error,
            SignalError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let engine = SignalEngine::new();
        let record = engine.evaluate("SER", &make_uptrend(60)).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: SignalRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}

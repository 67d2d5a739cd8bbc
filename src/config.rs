//! Engine configuration
//!
//! All window sizes, zone thresholds and score weights live here as one
//! explicit struct. The historical screener revisions disagreed slightly on
//! the zone thresholds (stop buffer 0.992 vs 0.995 of the zone floor, entry
//! tolerance 1.02 vs 1.03 vs 1.05 of the zone ceiling); those are tunables,
//! not contracts, and the defaults below are the canonical set.
//!
//! # Example
//!
//! ```rust
//! use sigscan::prelude::*;
//!
//! let config = SignalConfig {
//!     volume_window: Period::new(20).unwrap(),
//!     zone_lookahead: Period::new(5).unwrap(),
//!     ..SignalConfig::default()
//! };
//! let engine = SignalEngine::with_config(config).unwrap();
//! assert_eq!(engine.min_bars(), 50);
//! ```

use crate::{Fraction, Period, Result, SignalError};

// ============================================================
// SCORE WEIGHTS
// ============================================================

/// Additive score contributions, clamped to 0..=100 after summing.
///
/// The default weighting: volume conviction dominates (40/20/5), price above
/// the slow MA adds 30, oversold RSI adds 20 (10 for the neutral band) and a
/// confirmed bullish break of structure adds 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScoreWeights {
    /// volume_ratio > 2.0
    pub volume_surge: u32,
    /// 1.5 < volume_ratio <= 2.0
    pub volume_elevated: u32,
    /// Any other volume reading
    pub volume_base: u32,
    /// close > slow MA
    pub above_ma_slow: u32,
    /// RSI < 35
    pub rsi_oversold: u32,
    /// 35 <= RSI < 65
    pub rsi_neutral: u32,
    /// Structure is a bullish break of structure
    pub bullish_structure: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            volume_surge: 40,
            volume_elevated: 20,
            volume_base: 5,
            above_ma_slow: 30,
            rsi_oversold: 20,
            rsi_neutral: 10,
            bullish_structure: 10,
        }
    }
}

// ============================================================
// SIGNAL CONFIG
// ============================================================

/// Full engine configuration: indicator windows, structure window, zone
/// thresholds and score weights
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalConfig {
    /// RSI lookback (deltas averaged per bar)
    pub rsi_period: Period,
    /// Fast simple moving average window
    pub ma_fast: Period,
    /// Slow simple moving average window
    pub ma_slow: Period,
    /// Trailing volume-average window (excludes the last bar)
    pub volume_window: Period,
    /// Centered swing-point window; must be odd
    pub swing_window: Period,
    /// Bars ahead of a candidate origin checked for confirmation
    pub zone_lookahead: Period,
    /// Rally above the origin high required to confirm a zone
    pub zone_confirm_margin: Fraction,
    /// Stop placed this far below the zone floor
    pub zone_stop_buffer: Fraction,
    /// Band above the zone ceiling within which entry is at market
    pub zone_entry_tolerance: Fraction,
    /// Run per-bar OHLCV and ordering validation before evaluating
    pub validate_data: bool,
    pub weights: ScoreWeights,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rsi_period: Period::new_const(14),
            ma_fast: Period::new_const(20),
            ma_slow: Period::new_const(50),
            volume_window: Period::new_const(5),
            swing_window: Period::new_const(5),
            zone_lookahead: Period::new_const(3),
            zone_confirm_margin: Fraction::new_const(0.02),
            zone_stop_buffer: Fraction::new_const(0.008),
            zone_entry_tolerance: Fraction::new_const(0.03),
            validate_data: false,
            weights: ScoreWeights::default(),
        }
    }
}

impl SignalConfig {
    /// Check cross-field constraints that the validated scalar types cannot
    /// express on their own
    pub fn validate(&self) -> Result<()> {
        if self.swing_window.get() % 2 == 0 {
            return Err(SignalError::InvalidConfig(format!(
                "swing_window must be odd, got {}",
                self.swing_window.get()
            )));
        }
        if self.ma_fast >= self.ma_slow {
            return Err(SignalError::InvalidConfig(format!(
                "ma_fast ({}) must be shorter than ma_slow ({})",
                self.ma_fast.get(),
                self.ma_slow.get()
            )));
        }
        Ok(())
    }

    /// Minimum series length all configured windows need at once.
    ///
    /// RSI needs `period + 1` bars for its first value, the trailing volume
    /// average needs `window + 1` because it excludes the last bar, and the
    /// moving averages need their full window. 50 with the defaults.
    pub fn required_bars(&self) -> usize {
        self.ma_slow
            .get()
            .max(self.ma_fast.get())
            .max(self.rsi_period.get() + 1)
            .max(self.volume_window.get() + 1)
            .max(self.swing_window.get())
            .max(2) // percent change needs a prior close
    }
}

// ============================================================
// TESTS
// ============================================================

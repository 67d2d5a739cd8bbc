//! Indicator calculator: RSI, simple moving averages and volume ratio
//!
//! Pure numeric transforms over an OHLCV slice. Per-bar outputs use
//! `Option<f64>`: `None` marks bars before the window has filled, so callers
//! cannot accidentally read a warm-up value.

use crate::OHLCV;

/// RSI value reported when a window shows no losses at all ("no clear
/// momentum" for flat or one-sided windows)
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index over a simple rolling mean of gains and losses.
///
/// Bar `i` averages the `period` close-to-close deltas ending at `i`, so the
/// first `period` bars are `None`. A window whose average loss is zero maps
/// to exactly [`NEUTRAL_RSI`] instead of an undefined gain/loss ratio.
pub fn rsi<T: OHLCV>(bars: &[T], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    for i in period..bars.len() {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for j in (i - period + 1)..=i {
            let delta = bars[j].close() - bars[j - 1].close();
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum += -delta;
            }
        }
        let gain = gain_sum / period as f64;
        let loss = loss_sum / period as f64;

        out[i] = Some(if loss == 0.0 {
            NEUTRAL_RSI
        } else {
            let rs = gain / loss;
            100.0 - 100.0 / (1.0 + rs)
        });
    }

    out
}

/// Simple moving average of closes; `None` until the window has filled
pub fn sma<T: OHLCV>(bars: &[T], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if window == 0 || bars.len() < window {
        return out;
    }

    let mut sum: f64 = bars[..window].iter().map(|b| b.close()).sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..bars.len() {
        sum += bars[i].close() - bars[i - window].close();
        out[i] = Some(sum / window as f64);
    }

    out
}

/// Simple moving average at the last bar only
pub fn sma_last<T: OHLCV>(bars: &[T], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window {
        return None;
    }
    let sum: f64 = bars[bars.len() - window..].iter().map(|b| b.close()).sum();
    Some(sum / window as f64)
}

/// Last bar's volume over the mean volume of the preceding `window` bars,
/// excluding the last bar itself.
///
/// Returns 0.0 when the trailing average is zero or undefined (too few
/// bars), matching the screener's "no conviction" reading.
pub fn volume_ratio<T: OHLCV>(bars: &[T], window: usize) -> f64 {
    if window == 0 || bars.len() < window + 1 {
        return 0.0;
    }
    let last = bars.len() - 1;
    let avg: f64 = bars[last - window..last]
        .iter()
        .map(|b| b.volume())
        .sum::<f64>()
        / window as f64;

    if avg > 0.0 {
        bars[last].volume() / avg
    } else {
        0.0
    }
}

// ============================================================
// TESTS
// ============================================================

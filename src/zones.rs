//! Zone finder: demand-zone ("order block") detection and trade setups
//!
//! A bearish bar whose high is cleared by at least `confirm_margin` within
//! the next `lookahead` closes marks a demand zone. Only the most recent
//! confirmed origin is kept; it is the zone current price action cares
//! about. The confirmation check reads a single close, not the whole path
//! to it, trading false positives for an O(n) scan.

use crate::{OHLCVExt, OHLCV};

/// Reward is always twice the risk
pub const REWARD_RISK_RATIO: f64 = 2.0;

/// A price band where buying previously overwhelmed selling
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DemandZone {
    /// Origin bar's low
    pub low: f64,
    /// Origin bar's high
    pub high: f64,
    /// Bar index where the zone originated
    pub origin_index: usize,
}

/// Entry/stop/target suggestion derived from a demand zone
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl TradeSetup {
    /// Potential loss per unit, `entry - stop_loss`
    #[inline]
    pub fn risk(&self) -> f64 {
        self.entry - self.stop_loss
    }
}

/// Locate the most recent confirmed demand zone.
///
/// Candidate origins are bearish bars at indices `1..len - lookahead`; a
/// candidate is confirmed when `close[i + lookahead] > high[i] * (1 +
/// confirm_margin)`. The scan runs backwards so the first hit is the most
/// recent origin.
pub fn find_demand_zone<T: OHLCV>(
    bars: &[T],
    lookahead: usize,
    confirm_margin: f64,
) -> Option<DemandZone> {
    if lookahead == 0 || bars.len() <= lookahead + 1 {
        return None;
    }

    for i in (1..bars.len() - lookahead).rev() {
        if !bars[i].is_bearish() {
            continue;
        }
        if bars[i + lookahead].close() > bars[i].high() * (1.0 + confirm_margin) {
            return Some(DemandZone {
                low: bars[i].low(),
                high: bars[i].high(),
                origin_index: i,
            });
        }
    }

    None
}

/// Derive a 1:2 risk/reward setup from a zone and the current price.
///
/// The stop sits `stop_buffer` below the zone floor. Entry is at market
/// while price is within `entry_tolerance` above the zone ceiling and at
/// the ceiling (a retrace limit) once price has run further. A zone whose
/// implied risk is not positive yields `None`: absence of a setup is the
/// defined "no valid entry" outcome, not an error.
pub fn trade_setup(
    price: f64,
    zone: &DemandZone,
    stop_buffer: f64,
    entry_tolerance: f64,
) -> Option<TradeSetup> {
    let stop_loss = zone.low * (1.0 - stop_buffer);
    let entry = if price < zone.high * (1.0 + entry_tolerance) {
        price
    } else {
        zone.high
    };

    let risk = entry - stop_loss;
    if risk <= 0.0 {
        return None;
    }

    Some(TradeSetup {
        entry,
        stop_loss,
        take_profit: entry + REWARD_RISK_RATIO * risk,
    })
}

// ============================================================
// TESTS
// ============================================================

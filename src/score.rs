//! Scorer: bounded composite score from the indicator outputs
//!
//! A pure weighted sum. Every factor contributes independently; nothing
//! masks anything else, and the total is clamped to 0..=100 so no single
//! weighting choice can push a record off the scale.

use crate::config::ScoreWeights;
use crate::structure::MarketStructure;

/// Volume ratio above this reads as a surge
pub const VOLUME_SURGE: f64 = 2.0;
/// Volume ratio above this (up to the surge level) reads as elevated
pub const VOLUME_ELEVATED: f64 = 1.5;
/// RSI below this reads as oversold
pub const RSI_OVERSOLD: f64 = 35.0;
/// RSI below this (and at or above oversold) reads as neutral momentum
pub const RSI_OVERBOUGHT: f64 = 65.0;

/// Already-validated inputs to the scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub volume_ratio: f64,
    pub rsi: f64,
    pub close: f64,
    /// Slow moving average at the last bar
    pub ma_slow: f64,
    pub structure: MarketStructure,
}

/// Combine the factors into a 0..=100 composite score
pub fn composite_score(inputs: &ScoreInputs, weights: &ScoreWeights) -> u8 {
    let volume = if inputs.volume_ratio > VOLUME_SURGE {
        weights.volume_surge
    } else if inputs.volume_ratio > VOLUME_ELEVATED {
        weights.volume_elevated
    } else {
        weights.volume_base
    };

    let trend = if inputs.close > inputs.ma_slow {
        weights.above_ma_slow
    } else {
        0
    };

    let momentum = if inputs.rsi < RSI_OVERSOLD {
        weights.rsi_oversold
    } else if inputs.rsi < RSI_OVERBOUGHT {
        weights.rsi_neutral
    } else {
        0
    };

    let structure = if inputs.structure.is_bullish_breakout() {
        weights.bullish_structure
    } else {
        0
    };

    let total = volume as u64 + trend as u64 + momentum as u64 + structure as u64;
    total.min(100) as u8
}

// ============================================================
// TESTS
// ============================================================

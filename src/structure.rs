//! Structure detector: swing points and market-structure classification
//!
//! A bar is a swing high when its high matches the maximum of a centered
//! odd window around it (symmetrically a swing low on the minimum). The two
//! most recent swings of each kind plus the final close classify the series
//! into one of six labels. Classification never fails: thin input simply
//! degrades to [`MarketStructure::Sideways`].

use crate::OHLCV;

/// Kind of swing extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwingKind {
    High,
    Low,
}

/// A confirmed local extremum
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SwingPoint {
    /// Position in the series
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

/// Market-structure label for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MarketStructure {
    /// Last close above the most recent swing high
    BosBullish,
    /// Last close below the most recent swing low
    BosBearish,
    /// Higher high and higher low
    Uptrend,
    /// Lower high and lower low
    Downtrend,
    /// Two swings of each kind, no directional agreement
    Range,
    /// Fewer than two swings of each kind
    Sideways,
}

impl MarketStructure {
    /// Display label as shown on the screener dashboard
    pub fn label(self) -> &'static str {
        match self {
            MarketStructure::BosBullish => "BOS Bullish",
            MarketStructure::BosBearish => "BOS Bearish",
            MarketStructure::Uptrend => "Uptrend",
            MarketStructure::Downtrend => "Downtrend",
            MarketStructure::Range => "Neutral/Range",
            MarketStructure::Sideways => "Sideways",
        }
    }

    #[inline]
    pub fn is_bullish_breakout(self) -> bool {
        matches!(self, MarketStructure::BosBullish)
    }
}

impl std::fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Collect all swing highs and lows in chronological order.
///
/// `window` must be odd; a bar needs `window / 2` neighbors on each side, so
/// the first and last `window / 2` bars can never qualify. Ties count: a bar
/// equal to the window extremum is a swing.
pub fn swing_points<T: OHLCV>(bars: &[T], window: usize) -> Vec<SwingPoint> {
    let half = window / 2;
    let mut points = Vec::new();
    if window == 0 || bars.len() < window {
        return points;
    }

    for i in half..bars.len() - half {
        let slice = &bars[i - half..=i + half];

        let window_high = slice.iter().map(|b| b.high()).fold(f64::MIN, f64::max);
        if bars[i].high() >= window_high {
            points.push(SwingPoint {
                index: i,
                price: bars[i].high(),
                kind: SwingKind::High,
            });
        }

        let window_low = slice.iter().map(|b| b.low()).fold(f64::MAX, f64::min);
        if bars[i].low() <= window_low {
            points.push(SwingPoint {
                index: i,
                price: bars[i].low(),
                kind: SwingKind::Low,
            });
        }
    }

    points
}

/// Classify the series from its swing points and final close.
///
/// Priority order: insufficient structure -> break of structure (either
/// direction) -> trend (higher-high/higher-low or lower-high/lower-low) ->
/// range. Strict comparisons throughout, so equal swings fall through to
/// [`MarketStructure::Range`].
pub fn classify<T: OHLCV>(bars: &[T], window: usize) -> MarketStructure {
    let points = swing_points(bars, window);

    let highs: Vec<f64> = points
        .iter()
        .filter(|p| p.kind == SwingKind::High)
        .map(|p| p.price)
        .collect();
    let lows: Vec<f64> = points
        .iter()
        .filter(|p| p.kind == SwingKind::Low)
        .map(|p| p.price)
        .collect();

    if highs.len() < 2 || lows.len() < 2 {
        return MarketStructure::Sideways;
    }

    let (h1, h2) = (highs[highs.len() - 2], highs[highs.len() - 1]);
    let (l1, l2) = (lows[lows.len() - 2], lows[lows.len() - 1]);
    let close = match bars.last() {
        Some(bar) => bar.close(),
        None => return MarketStructure::Sideways,
    };

    if close > h2 {
        MarketStructure::BosBullish
    } else if close < l2 {
        MarketStructure::BosBearish
    } else if h2 > h1 && l2 > l1 {
        MarketStructure::Uptrend
    } else if h2 < h1 && l2 < l1 {
        MarketStructure::Downtrend
    } else {
        MarketStructure::Range
    }
}

// ============================================================
// TESTS
// ============================================================

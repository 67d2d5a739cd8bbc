//! Property tests for the numeric invariants of the pipeline.

use proptest::prelude::*;
use sigscan::config::ScoreWeights;
use sigscan::prelude::*;
use sigscan::score::composite_score;
use sigscan::structure::classify;
use sigscan::zones::{trade_setup, DemandZone};
use sigscan::{indicators, structure::MarketStructure};

/// Build gap-free bars from a close sequence with unit wicks
fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(closes.len());
    let mut prev = closes[0];
    for (i, &close) in closes.iter().enumerate() {
        let open = prev;
        bars.push(PriceBar {
            timestamp: i as i64,
            open,
            high: open.max(close) + 1.0,
            low: (open.min(close) - 1.0).max(0.01),
            close,
            volume: 1_000.0,
        });
        prev = close;
    }
    bars
}

proptest! {
    /// RSI stays inside [0, 100] for any positive close sequence
    #[test]
    fn rsi_bounded(closes in prop::collection::vec(1.0f64..1_000.0, 20..120)) {
        let bars = bars_from_closes(&closes);
        for value in indicators::rsi(&bars, 14).into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    /// A window with zero average loss reads exactly neutral: strictly
    /// rising closes give RSI = 50, never an unbounded ratio
    #[test]
    fn rsi_zero_loss_is_neutral(start in 1.0f64..500.0, steps in prop::collection::vec(0.01f64..5.0, 20..60)) {
        let mut closes = vec![start];
        for step in &steps {
            closes.push(closes[closes.len() - 1] + step);
        }
        let bars = bars_from_closes(&closes);
        for value in indicators::rsi(&bars, 14).into_iter().flatten() {
            prop_assert_eq!(value, indicators::NEUTRAL_RSI);
        }
    }

    /// The composite score never leaves [0, 100], whatever the inputs or
    /// default-shaped weights
    #[test]
    fn score_bounded(
        volume_ratio in 0.0f64..10.0,
        rsi in 0.0f64..100.0,
        close in 1.0f64..1_000.0,
        ma_slow in 1.0f64..1_000.0,
        bullish in any::<bool>(),
    ) {
        let inputs = ScoreInputs {
            volume_ratio,
            rsi,
            close,
            ma_slow,
            structure: if bullish {
                MarketStructure::BosBullish
            } else {
                MarketStructure::Range
            },
        };
        let score = composite_score(&inputs, &ScoreWeights::default());
        prop_assert!(score <= 100);
    }

    /// Strictly rising closes never classify as bearish structure
    #[test]
    fn monotone_rise_never_bearish(start in 1.0f64..500.0, steps in prop::collection::vec(0.01f64..5.0, 10..100)) {
        let mut closes = vec![start];
        for step in &steps {
            closes.push(closes[closes.len() - 1] + step);
        }
        let bars = bars_from_closes(&closes);
        let label = classify(&bars, 5);
        prop_assert_ne!(label, MarketStructure::BosBearish);
        prop_assert_ne!(label, MarketStructure::Downtrend);
    }

    /// Whenever a setup is produced, the stop sits below the entry and the
    /// target is exactly entry + 2 * risk
    #[test]
    fn setup_consistency(
        low in 1.0f64..500.0,
        span in 0.1f64..100.0,
        price in 1.0f64..1_000.0,
        buffer in 0.0f64..0.05,
        tolerance in 0.0f64..0.10,
    ) {
        let zone = DemandZone { low, high: low + span, origin_index: 1 };
        if let Some(setup) = trade_setup(price, &zone, buffer, tolerance) {
            prop_assert!(setup.stop_loss < setup.entry);
            let risk = setup.entry - setup.stop_loss;
            let expected = setup.entry + 2.0 * risk;
            prop_assert!((setup.take_profit - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }

    /// Evaluation is a pure function of (series, config)
    #[test]
    fn evaluate_idempotent(closes in prop::collection::vec(10.0f64..200.0, 50..80)) {
        let bars = bars_from_closes(&closes);
        let engine = SignalEngine::new();
        let a = engine.evaluate("P", &bars);
        let b = engine.evaluate("P", &bars);
        match (a, b) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "one evaluation failed, the other did not"),
        }
    }
}

#![allow(dead_code)]

use heikin_kdj::{Bar, Ohlcv, Price, Signal, read_bars};
use std::fs::File;

const DAILY_PATH: &str = "tests/fixtures/data/daily.csv";

/// Load the daily OHLC fixture (60 weekdays from 2024-01-02).
pub fn load_daily_bars() -> Vec<Bar> {
    let file = File::open(DAILY_PATH).unwrap_or_else(|e| panic!("failed to open {DAILY_PATH}: {e}"));
    read_bars(file).expect("invalid daily fixture")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert an optional reference value against a computed one.
pub fn assert_defined_near(
    actual: Option<f64>,
    expected: Option<f64>,
    tolerance: f64,
    context: &str,
) {
    match (actual, expected) {
        (None, None) => {}
        (Some(a), Some(e)) => assert_near(a, e, tolerance, context),
        (a, e) => panic!("{context}: definedness mismatch, expected {e:?}, got {a:?}"),
    }
}

/// Heikin-Ashi candle computed by [`Reference`].
#[derive(Debug, Clone, Copy)]
pub struct RefCandle {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

/// Straightforward recomputation of the whole pipeline.
///
/// Every window is rescanned, and the smoothed averages use the closed-form
/// weighted sum over all defined inputs instead of a running state.
#[derive(Debug)]
pub struct Reference {
    pub candles: Vec<RefCandle>,
    pub rsv: Vec<Option<f64>>,
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
    pub j: Vec<Option<f64>>,
    pub signals: Vec<Signal>,
}

impl Reference {
    pub fn compute<B: Ohlcv>(bars: &[B], window: usize, smooth_k: usize, smooth_d: usize) -> Self {
        let candles = reference_candles(bars);

        let rsv: Vec<Option<f64>> = (0..candles.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(window);
                let slice = &candles[start..=i];
                let highest = slice.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                let lowest = slice.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                (highest > lowest)
                    .then(|| (candles[i].close - lowest) / (highest - lowest) * 100.0)
            })
            .collect();

        let k = closed_form_ewma(&rsv, smooth_k);
        let d = closed_form_ewma(&k, smooth_d);
        let j: Vec<Option<f64>> = k
            .iter()
            .zip(&d)
            .map(|(k, d)| Some(3.0 * (*k)? - 2.0 * (*d)?))
            .collect();

        let mut signals = vec![Signal::Neutral; candles.len()];
        for i in 1..candles.len() {
            if let (Some(pj), Some(pk), Some(cj), Some(ck)) = (j[i - 1], k[i - 1], j[i], k[i]) {
                if pj < pk && cj > ck {
                    signals[i] = Signal::Buy;
                } else if pj > pk && cj < ck {
                    signals[i] = Signal::Sell;
                }
            }
        }

        Self {
            candles,
            rsv,
            k,
            d,
            j,
            signals,
        }
    }
}

fn reference_candles<B: Ohlcv>(bars: &[B]) -> Vec<RefCandle> {
    let mut candles: Vec<RefCandle> = Vec::with_capacity(bars.len());
    for bar in bars {
        let close = (bar.open() + bar.high() + bar.low() + bar.close()) / 4.0;
        let open = match candles.last() {
            Some(prev) => (prev.open + prev.close) / 2.0,
            None => (bar.open() + bar.close()) / 2.0,
        };
        candles.push(RefCandle {
            open,
            high: bar.high().max(open).max(close),
            low: bar.low().min(open).min(close),
            close,
        });
    }
    candles
}

/// `m_t = (1-a)^t x_0 + sum a (1-a)^(t-i) x_i` over defined inputs only.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
fn closed_form_ewma(input: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut defined: Vec<f64> = Vec::new();

    input
        .iter()
        .map(|x| {
            let x = (*x)?;
            defined.push(x);
            let t = defined.len() - 1;
            let mut mean = defined[0] * (1.0 - alpha).powi(t as i32);
            for (i, value) in defined.iter().enumerate().skip(1) {
                mean += alpha * (1.0 - alpha).powi((t - i) as i32) * value;
            }
            Some(mean)
        })
        .collect()
}

// src/test_util.rs

use chrono::{Days, NaiveDate};

use crate::{Ohlcv, Price, Timestamp};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Asserts that a defined [`Value`](crate::Value) is within `1e-9` of `expected`.
macro_rules! assert_value {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (crate::Value, f64) = ($actual, $expected);
        let a = a
            .get()
            .unwrap_or_else(|| panic!("assert_value failed: indeterminate, expected={e}"));
        assert!(
            (a - e).abs() <= 1e-9,
            "assert_value failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_value;

/// The `n`-th test day, counting from 2024-01-01 as day 1.
pub fn day(n: u64) -> Timestamp {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n - 1)
}

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: Timestamp,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            timestamp: day(1),
        }
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Convenience: bar with OHLC all equal to `close` on day `n`.
pub fn bar(close: f64, n: u64) -> Bar {
    Bar::new(close, close, close, close).at(day(n))
}

/// Bars from `(open, high, low, close)` tuples on consecutive days.
pub fn bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    ohlc.iter()
        .zip(1..)
        .map(|(&(o, h, l, c), n)| Bar::new(o, h, l, c).at(day(n)))
        .collect()
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Indicator, Ohlcv, Price, Timestamp,
    error::{Error, Result},
    ohlcv::{check_order, validate},
};

/// A smoothed Heikin-Ashi candle.
///
/// ```text
/// ha_close = (open + high + low + close) / 4
/// ha_open  = (open + close) / 2                     first bar
///          = (prev_ha_open + prev_ha_close) / 2     afterwards
/// ha_high  = max(ha_open, ha_close, high)
/// ha_low   = min(ha_open, ha_close, low)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeikinAshiBar {
    #[serde(rename = "Date")]
    pub timestamp: Timestamp,
    #[serde(rename = "HA_Open")]
    pub ha_open: Price,
    #[serde(rename = "HA_High")]
    pub ha_high: Price,
    #[serde(rename = "HA_Low")]
    pub ha_low: Price,
    #[serde(rename = "HA_Close")]
    pub ha_close: Price,
}

impl Ohlcv for HeikinAshiBar {
    #[inline]
    fn open(&self) -> Price {
        self.ha_open
    }

    #[inline]
    fn high(&self) -> Price {
        self.ha_high
    }

    #[inline]
    fn low(&self) -> Price {
        self.ha_low
    }

    #[inline]
    fn close(&self) -> Price {
        self.ha_close
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Streaming Heikin-Ashi transformer.
///
/// Holds the previous smoothed candle; `ha_open` of every bar after the
/// first depends on it, so a candle can't be computed in isolation.
///
/// Feeding a bar with a non-finite field or `high < low` is a logic error.
/// Use [`heikin_ashi`] to validate a whole series up front.
#[derive(Clone, Debug, Default)]
pub struct HeikinAshi {
    current: Option<HeikinAshiBar>,
}

impl HeikinAshi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for HeikinAshi {
    type Output = HeikinAshiBar;

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> HeikinAshiBar {
        debug_assert!(
            self.current.is_none_or(|prev| prev.timestamp < bar.timestamp()),
            "timestamps must be strictly increasing: last={:?}, got={}",
            self.current.map(|prev| prev.timestamp),
            bar.timestamp(),
        );

        let ha_close =
            bar.open() / 4.0 + bar.high() / 4.0 + bar.low() / 4.0 + bar.close() / 4.0;
        let ha_open = match self.current {
            Some(prev) => f64::midpoint(prev.ha_open, prev.ha_close),
            None => f64::midpoint(bar.open(), bar.close()),
        };

        let candle = HeikinAshiBar {
            timestamp: bar.timestamp(),
            ha_open,
            ha_high: bar.high().max(ha_open).max(ha_close),
            ha_low: bar.low().min(ha_open).min(ha_close),
            ha_close,
        };
        self.current = Some(candle);

        candle
    }

    #[inline]
    fn value(&self) -> Option<HeikinAshiBar> {
        self.current
    }
}

impl Display for HeikinAshi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HeikinAshi")
    }
}

/// Converts a whole series of bars into Heikin-Ashi candles, one per bar.
///
/// Every bar is validated before the first candle is produced.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty slice, [`Error::InvalidBar`] for the
/// first bar with a non-finite field or `high < low`, [`Error::Unordered`]
/// if timestamps are not strictly increasing.
pub fn heikin_ashi<B: Ohlcv>(bars: &[B]) -> Result<Vec<HeikinAshiBar>> {
    if bars.is_empty() {
        return Err(Error::EmptyInput);
    }

    bars.iter()
        .enumerate()
        .try_for_each(|(index, bar)| validate(index, bar))?;
    check_order(bars)?;

    let mut transformer = HeikinAshi::new();
    Ok(bars.iter().map(|bar| transformer.compute(bar)).collect())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, assert_approx, bar, bars, day};

    fn scenario() -> Vec<Bar> {
        bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 13.0, 10.0, 12.0),
            (12.0, 12.0, 11.0, 11.5),
        ])
    }

    mod first_bar {
        use super::*;

        #[test]
        fn open_is_midpoint_of_open_and_close() {
            let ha = heikin_ashi(&[Bar::new(10.0, 12.0, 9.0, 11.0)]).unwrap();
            assert_eq!(ha.len(), 1);
            assert_eq!(ha[0].ha_open, 10.5);
        }

        #[test]
        fn close_is_mean_of_ohlc() {
            let ha = heikin_ashi(&[Bar::new(10.0, 13.0, 9.0, 12.0)]).unwrap();
            // (10 + 13 + 9 + 12) / 4 = 11
            assert_eq!(ha[0].ha_close, 11.0);
        }

        #[test]
        fn extremes_include_raw_high_and_low() {
            let ha = heikin_ashi(&[Bar::new(10.0, 12.0, 9.0, 11.0)]).unwrap();
            assert_eq!(ha[0].ha_high, 12.0);
            assert_eq!(ha[0].ha_low, 9.0);
        }
    }

    mod extreme_prices {
        use super::*;

        #[test]
        fn close_near_max_does_not_overflow() {
            let ha = heikin_ashi(&[Bar::new(1e308, 1.5e308, 1e308, 1.2e308)]).unwrap();
            assert!(ha[0].ha_close.is_finite());
            assert_approx!(ha[0].ha_close, 1.175e308);
            assert_approx!(ha[0].ha_open, 1.1e308);
        }

        #[test]
        fn open_recurrence_near_max_stays_finite() {
            let input = bars(&[
                (f64::MAX, f64::MAX, f64::MAX, f64::MAX),
                (f64::MAX, f64::MAX, f64::MAX, f64::MAX),
            ]);
            let ha = heikin_ashi(&input).unwrap();
            assert_eq!(ha[1].ha_open, f64::MAX);
            assert!(ha[1].ha_close.is_finite());
            assert_approx!(ha[1].ha_close, f64::MAX);
        }
    }

    mod recurrence {
        use super::*;

        #[test]
        fn matches_worked_scenario() {
            let ha = heikin_ashi(&scenario()).unwrap();

            assert_eq!(ha[0].ha_open, 10.5);
            assert_eq!(ha[0].ha_close, 10.5);

            assert_eq!(ha[1].ha_open, 10.5);
            assert_eq!(ha[1].ha_close, 11.5);
            assert_eq!(ha[1].ha_high, 13.0);
            assert_eq!(ha[1].ha_low, 10.0);

            // (10.5 + 11.5) / 2 = 11, (12 + 12 + 11 + 11.5) / 4 = 11.625
            assert_eq!(ha[2].ha_open, 11.0);
            assert_eq!(ha[2].ha_close, 11.625);
            assert_eq!(ha[2].ha_high, 12.0);
            assert_eq!(ha[2].ha_low, 11.0);
        }

        #[test]
        #[allow(clippy::cast_precision_loss)]
        fn open_reconstructs_from_previous_candle() {
            let input: Vec<Bar> = (1..=30)
                .map(|n| {
                    let base = 100.0 + (n as f64 * 0.7).sin() * 5.0;
                    Bar::new(base, base + 2.0, base - 1.5, base + 0.5).at(day(n))
                })
                .collect();
            let ha = heikin_ashi(&input).unwrap();

            for pair in ha.windows(2) {
                assert_approx!(
                    pair[1].ha_open,
                    (pair[0].ha_open + pair[0].ha_close) / 2.0
                );
            }
        }

        #[test]
        fn high_and_low_bound_open_and_close() {
            let ha = heikin_ashi(&bars(&[
                (10.0, 10.5, 9.5, 10.2),
                (14.0, 14.1, 13.9, 14.0),
                (8.0, 8.2, 7.9, 8.1),
                (8.0, 9.0, 7.0, 8.5),
            ]))
            .unwrap();

            for candle in &ha {
                assert!(candle.ha_high >= candle.ha_open.max(candle.ha_close));
                assert!(candle.ha_low <= candle.ha_open.min(candle.ha_close));
            }
        }

        #[test]
        fn output_aligned_with_input() {
            let input = scenario();
            let ha = heikin_ashi(&input).unwrap();
            assert_eq!(ha.len(), input.len());
            for (candle, bar) in ha.iter().zip(&input) {
                assert_eq!(candle.timestamp, bar.timestamp);
            }
        }
    }

    mod streaming {
        use super::*;

        #[test]
        fn value_is_none_before_first_bar() {
            assert_eq!(HeikinAshi::new().value(), None);
        }

        #[test]
        fn matches_series_function() {
            let input = scenario();
            let series = heikin_ashi(&input).unwrap();

            let mut ha = HeikinAshi::new();
            for (bar, expected) in input.iter().zip(&series) {
                assert_eq!(ha.compute(bar), *expected);
                assert_eq!(ha.value(), Some(*expected));
            }
        }

        #[test]
        fn candle_feeds_back_as_ohlcv() {
            let mut ha = HeikinAshi::new();
            let candle = ha.compute(&Bar::new(10.0, 12.0, 9.0, 11.0));
            assert_eq!(candle.open(), candle.ha_open);
            assert_eq!(candle.high(), candle.ha_high);
            assert_eq!(candle.low(), candle.ha_low);
            assert_eq!(candle.close(), candle.ha_close);
        }

        #[cfg(debug_assertions)]
        #[test]
        #[should_panic(expected = "timestamps must be strictly increasing")]
        fn panics_on_repeated_timestamp() {
            let mut ha = HeikinAshi::new();
            ha.compute(&bar(10.0, 2));
            ha.compute(&bar(11.0, 2));
        }
    }

    mod errors {
        use super::*;
        use crate::InvalidBarReason;

        #[test]
        fn empty_input() {
            let empty: Vec<Bar> = Vec::new();
            assert!(matches!(heikin_ashi(&empty), Err(Error::EmptyInput)));
        }

        #[test]
        fn invalid_bar_aborts_whole_series() {
            let input = bars(&[
                (10.0, 12.0, 9.0, 11.0),
                (11.0, 13.0, 10.0, 12.0),
                (12.0, 10.0, 11.0, 11.5),
            ]);
            match heikin_ashi(&input) {
                Err(Error::InvalidBar { index, reason, .. }) => {
                    assert_eq!(index, 2);
                    assert!(matches!(reason, InvalidBarReason::HighBelowLow { .. }));
                }
                other => panic!("expected InvalidBar, got {other:?}"),
            }
        }

        #[test]
        fn unordered_series_rejected() {
            let input = vec![bar(10.0, 2), bar(11.0, 1)];
            assert!(matches!(
                heikin_ashi(&input),
                Err(Error::Unordered { index: 1, .. })
            ));
        }

        #[test]
        fn non_finite_bar_rejected() {
            let input = bars(&[(10.0, 12.0, 9.0, 11.0), (f64::NAN, 13.0, 10.0, 12.0)]);
            assert!(matches!(
                heikin_ashi(&input),
                Err(Error::InvalidBar { index: 1, .. })
            ));
        }
    }
}

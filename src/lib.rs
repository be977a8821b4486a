//! Heikin-Ashi smoothed KDJ oscillator with J/K crossover signals.
//!
//! Three stages run over a daily OHLC series, each consuming the whole
//! output of the previous one:
//!
//! 1. [`heikin_ashi`] turns raw bars into smoothed [`HeikinAshiBar`]s.
//! 2. [`kdj`] derives %K, %D and %J ([`OscillatorPoint`]) from rolling
//!    extremes of those candles and exponential smoothing.
//! 3. [`crossovers`] marks where J crosses K ([`SignalPoint`]).
//!
//! [`Pipeline`] chains them. Flat windows produce
//! [`Value::Indeterminate`] rather than a made-up number, and never a signal.
//!
//! The stages are also available as streaming accumulators ([`HeikinAshi`],
//! [`Kdj`], [`CrossoverDetector`]) fed one bar at a time; [`HeikinAshi`] and
//! [`Kdj`] expose [`compute`](Kdj::compute) and [`value`](Kdj::value) as
//! inherent methods, so no trait import is needed. Import [`Indicator`] only
//! for generic code.
//!
//! Input and output collaborators sit behind [`BarSource`], [`SignalSink`]
//! and [`ChartSink`], with CSV and JSON implementations.

mod bar;
mod chart;
mod error;
mod ewma;
mod heikin_ashi;
mod indicator;
mod kdj;
mod ohlcv;
mod pipeline;
mod settings;
mod signal;
mod sink;
mod source;
mod value;
mod window;

pub use crate::error::{Error, InvalidBarReason, Result};
pub use crate::indicator::Indicator;
pub use crate::ohlcv::{Ohlcv, Price, Timestamp, check_order, validate};
pub use crate::value::Value;

pub use crate::bar::Bar;
pub use crate::heikin_ashi::{HeikinAshi, HeikinAshiBar, heikin_ashi};
pub use crate::kdj::{Kdj, KdjConfig, KdjConfigBuilder, OscillatorPoint, kdj};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::signal::{CrossoverDetector, Signal, SignalPoint, crossovers};

pub use crate::chart::{CandleChart, ChartSink, JsonChartSink, Marker, OscillatorChart};
pub use crate::settings::Settings;
pub use crate::sink::{CsvSignalSink, SignalSink, read_signals, read_signals_from, write_signals};
pub use crate::source::{BarSource, CsvBarSource, read_bars};

macro_rules! impl_indicator_methods {
    ($type:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, bar: &impl Ohlcv) -> $output {
                <Self as Indicator>::compute(self, bar)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(HeikinAshi, HeikinAshiBar);
impl_indicator_methods!(Kdj, OscillatorPoint);

#[cfg(test)]
mod test_util;

#[cfg(test)]
mod inherent_methods {
    use super::{HeikinAshi, Kdj, KdjConfig, Value};
    use crate::test_util::Bar;

    #[test]
    fn heikin_ashi_without_indicator_import() {
        let mut ha = HeikinAshi::new();
        assert_eq!(ha.value(), None);
        let candle = ha.compute(&Bar::new(10.0, 12.0, 9.0, 11.0));
        assert_eq!(ha.value(), Some(candle));
    }

    #[test]
    fn kdj_without_indicator_import() {
        let mut kdj = Kdj::new(KdjConfig::default());
        let point = kdj.compute(&Bar::new(10.0, 12.0, 9.0, 10.5));
        assert_eq!(point.k, Value::Defined(50.0));
        assert_eq!(kdj.value(), Some(point));
    }
}

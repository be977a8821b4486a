use crate::Ohlcv;

use std::fmt::{Debug, Display};

/// A streaming stage of the pipeline.
///
/// Stages keep their recurrence state internally and advance by one bar on
/// each call to [`compute`](Indicator::compute). Bars must be fed in
/// chronological order, one call per bar. The whole-series functions
/// ([`heikin_ashi`](crate::heikin_ashi), [`kdj`](crate::kdj)) are folds over
/// these accumulators.
///
/// # Example
///
/// ```
/// use heikin_kdj::{HeikinAshi, Indicator, Ohlcv, Price, Timestamp};
/// # use chrono::NaiveDate;
/// #
/// # struct Bar(f64, f64, f64, f64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.1 }
/// #     fn low(&self) -> Price { self.2 }
/// #     fn close(&self) -> Price { self.3 }
/// #     fn timestamp(&self) -> Timestamp { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }
/// # }
///
/// let mut ha = HeikinAshi::new();
/// let first = ha.compute(&Bar(10.0, 12.0, 9.0, 11.0));
///
/// assert_eq!(first.ha_open, 10.5);
/// assert_eq!(first.ha_close, 10.5);
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Computed output for one bar.
    type Output: Copy + Send + Sync + Debug;

    /// Feeds the next bar and returns its output.
    fn compute(&mut self, bar: &impl Ohlcv) -> Self::Output;

    /// Returns the last computed output without advancing state,
    /// or `None` before the first bar.
    fn value(&self) -> Option<Self::Output>;
}

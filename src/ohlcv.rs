use crate::error::{Error, InvalidBarReason};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar date.
///
/// The pipeline works on daily bars keyed by calendar date. Dates must be
/// strictly increasing along a series.
pub type Timestamp = chrono::NaiveDate;

/// OHLC bar data used as input to every stage.
///
/// Implement this on your own candle type to avoid per-bar conversion.
/// [`HeikinAshiBar`](crate::HeikinAshiBar) implements it as well, which is
/// how the oscillator reads the smoothed candles.
///
/// # Example
///
/// ```
/// use heikin_kdj::{Ohlcv, Price, Timestamp};
///
/// struct MyCandle {
///     o: f64, h: f64, l: f64, c: f64,
///     day: Timestamp,
/// }
///
/// impl Ohlcv for MyCandle {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn timestamp(&self) -> Timestamp { self.day }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Date the bar belongs to.
    fn timestamp(&self) -> Timestamp;
}

/// Checks that every field is finite and `high >= low`.
///
/// # Errors
///
/// Returns [`Error::InvalidBar`] carrying `index` and the first problem found.
pub fn validate(index: usize, bar: &impl Ohlcv) -> Result<(), Error> {
    let fields = [
        ("open", bar.open()),
        ("high", bar.high()),
        ("low", bar.low()),
        ("close", bar.close()),
    ];

    let reason = fields
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, value)| InvalidBarReason::NonFinite { field, value })
        .or_else(|| {
            (bar.high() < bar.low()).then(|| InvalidBarReason::HighBelowLow {
                high: bar.high(),
                low: bar.low(),
            })
        });

    match reason {
        Some(reason) => Err(Error::InvalidBar {
            index,
            timestamp: bar.timestamp(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Checks that timestamps are strictly increasing.
///
/// # Errors
///
/// Returns [`Error::Unordered`] for the first bar that does not come after
/// its predecessor (duplicates included).
pub fn check_order<B: Ohlcv>(bars: &[B]) -> Result<(), Error> {
    match bars
        .windows(2)
        .position(|pair| pair[1].timestamp() <= pair[0].timestamp())
    {
        Some(i) => Err(Error::Unordered {
            index: i + 1,
            timestamp: bars[i + 1].timestamp(),
            previous: bars[i].timestamp(),
        }),
        None => Ok(()),
    }
}

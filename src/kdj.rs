use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Indicator, Ohlcv, Timestamp, Value,
    error::{Error, Result},
    ewma::Ewma,
    window::ExtremaWindow,
};

/// Configuration for the [`Kdj`] stochastic oscillator.
///
/// * `window`: bars in the rolling high/low window (default 9).
/// * `smooth_k`: EWMA span smoothing RSV into %K (default 3).
/// * `smooth_d`: EWMA span smoothing %K into %D (default 3).
///
/// All three must be at least 1; this is checked on construction, so a
/// `KdjConfig` in hand is always valid.
///
/// # Example
///
/// ```
/// use heikin_kdj::KdjConfig;
///
/// let config = KdjConfig::builder().window(14).build().unwrap();
///
/// assert_eq!(config.window(), 14);
/// assert_eq!(config.smooth_k(), 3);
/// assert!(KdjConfig::builder().smooth_d(0).build().is_err());
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "KdjParams", into = "KdjParams")]
pub struct KdjConfig {
    window: usize,
    smooth_k: usize,
    smooth_d: usize,
}

impl KdjConfig {
    pub const DEFAULT_WINDOW: usize = 9;
    pub const DEFAULT_SMOOTH_K: usize = 3;
    pub const DEFAULT_SMOOTH_D: usize = 3;

    /// # Errors
    ///
    /// [`Error::Configuration`] if any parameter is zero.
    pub fn new(window: usize, smooth_k: usize, smooth_d: usize) -> Result<Self> {
        for (parameter, value) in [
            ("window", window),
            ("smooth_k", smooth_k),
            ("smooth_d", smooth_d),
        ] {
            if value < 1 {
                return Err(Error::Configuration { parameter, value });
            }
        }

        Ok(Self {
            window,
            smooth_k,
            smooth_d,
        })
    }

    /// Returns a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> KdjConfigBuilder {
        KdjConfigBuilder::new()
    }

    /// Rolling window length (number of bars).
    #[inline]
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    #[must_use]
    pub fn smooth_k(&self) -> usize {
        self.smooth_k
    }

    #[inline]
    #[must_use]
    pub fn smooth_d(&self) -> usize {
        self.smooth_d
    }
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
            smooth_k: Self::DEFAULT_SMOOTH_K,
            smooth_d: Self::DEFAULT_SMOOTH_D,
        }
    }
}

impl Display for KdjConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KdjConfig({}, {}, {})",
            self.window, self.smooth_k, self.smooth_d
        )
    }
}

/// Unvalidated config as it appears in a settings file.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct KdjParams {
    window: usize,
    smooth_k: usize,
    smooth_d: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        KdjConfig::default().into()
    }
}

impl TryFrom<KdjParams> for KdjConfig {
    type Error = Error;

    fn try_from(params: KdjParams) -> Result<Self> {
        Self::new(params.window, params.smooth_k, params.smooth_d)
    }
}

impl From<KdjConfig> for KdjParams {
    fn from(config: KdjConfig) -> Self {
        Self {
            window: config.window,
            smooth_k: config.smooth_k,
            smooth_d: config.smooth_d,
        }
    }
}

/// Builder for [`KdjConfig`].
///
/// Defaults: window = 9, `smooth_k` = 3, `smooth_d` = 3.
pub struct KdjConfigBuilder {
    params: KdjParams,
}

impl KdjConfigBuilder {
    fn new() -> Self {
        Self {
            params: KdjParams::default(),
        }
    }

    /// Sets the rolling window length.
    #[inline]
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.params.window = window;
        self
    }

    /// Sets the %K smoothing span.
    #[inline]
    #[must_use]
    pub fn smooth_k(mut self, span: usize) -> Self {
        self.params.smooth_k = span;
        self
    }

    /// Sets the %D smoothing span.
    #[inline]
    #[must_use]
    pub fn smooth_d(mut self, span: usize) -> Self {
        self.params.smooth_d = span;
        self
    }

    /// # Errors
    ///
    /// [`Error::Configuration`] if any parameter is zero.
    pub fn build(self) -> Result<KdjConfig> {
        self.params.try_into()
    }
}

/// One oscillator reading, aligned with the bar it was computed on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPoint {
    #[serde(rename = "Date")]
    pub timestamp: Timestamp,
    #[serde(rename = "K")]
    pub k: Value,
    #[serde(rename = "D")]
    pub d: Value,
    #[serde(rename = "J")]
    pub j: Value,
}

/// KDJ stochastic oscillator.
///
/// For each bar, over the trailing `window` bars (fewer at the start of the
/// series):
///
/// ```text
/// RSV = (close − lowest_low) / (highest_high − lowest_low) × 100
/// K   = EWMA(RSV, smooth_k)
/// D   = EWMA(K, smooth_d)
/// J   = 3K − 2D
/// ```
///
/// A window with zero range has no RSV; that bar's K, D and J are
/// [`Value::Indeterminate`] and the smoothing state carries over unchanged.
/// A range too wide to represent is treated the same way.
///
/// Fed with [`HeikinAshiBar`](crate::HeikinAshiBar)s in the pipeline, but any
/// [`Ohlcv`] works.
///
/// # Example
///
/// ```
/// use heikin_kdj::{Kdj, KdjConfig, Value};
/// # use heikin_kdj::{Ohlcv, Price, Timestamp};
/// # use chrono::{Days, NaiveDate};
/// #
/// # struct Bar(f64, f64, f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.3 as f64 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.1 }
/// #     fn close(&self) -> Price { self.2 }
/// #     fn timestamp(&self) -> Timestamp {
/// #         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(self.3)
/// #     }
/// # }
///
/// let mut kdj = Kdj::new(KdjConfig::builder().window(2).build().unwrap());
///
/// // RSV = (10.5 − 9) / (12 − 9) × 100 = 50, seeds K and D
/// let first = kdj.compute(&Bar(12.0, 9.0, 10.5, 0));
/// assert_eq!(first.k, Value::Defined(50.0));
/// assert_eq!(first.j, Value::Defined(50.0));
///
/// // RSV = (11.5 − 9) / (13 − 9) × 100 = 62.5, K = 0.5 × 62.5 + 0.5 × 50
/// let second = kdj.compute(&Bar(13.0, 10.0, 11.5, 1));
/// assert_eq!(second.k, Value::Defined(56.25));
/// ```
#[derive(Clone, Debug)]
pub struct Kdj {
    config: KdjConfig,
    window: ExtremaWindow,
    k: Ewma,
    d: Ewma,
    rsv: Option<Value>,
    current: Option<OscillatorPoint>,
}

impl Kdj {
    #[must_use]
    pub fn new(config: KdjConfig) -> Self {
        Self {
            config,
            window: ExtremaWindow::new(config.window),
            k: Ewma::new(config.smooth_k),
            d: Ewma::new(config.smooth_d),
            rsv: None,
            current: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &KdjConfig {
        &self.config
    }

    /// Raw stochastic value of the last bar, `None` before the first bar.
    #[must_use]
    pub fn rsv(&self) -> Option<Value> {
        self.rsv
    }
}

impl Indicator for Kdj {
    type Output = OscillatorPoint;

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> OscillatorPoint {
        debug_assert!(
            self.current
                .is_none_or(|prev| prev.timestamp < bar.timestamp()),
            "timestamps must be strictly increasing: last={:?}, got={}",
            self.current.map(|prev| prev.timestamp),
            bar.timestamp(),
        );

        self.window.add(bar);

        let rsv: Value = self
            .window
            .extremes()
            .filter(|(lowest, highest)| highest > lowest)
            .map(|(lowest, highest)| (bar.close() - lowest) / (highest - lowest) * 100.0)
            .filter(|rsv| rsv.is_finite())
            .into();

        let k = self.k.update(rsv);
        let d = self.d.update(k);
        let j = k.zip_with(d, |k, d| 3.0 * k - 2.0 * d);

        let point = OscillatorPoint {
            timestamp: bar.timestamp(),
            k,
            d,
            j,
        };
        self.rsv = Some(rsv);
        self.current = Some(point);

        point
    }

    #[inline]
    fn value(&self) -> Option<OscillatorPoint> {
        self.current
    }
}

impl Display for Kdj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KDJ({}, {}, {})",
            self.config.window, self.config.smooth_k, self.config.smooth_d
        )
    }
}

/// Computes the oscillator over a whole series, one point per bar.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty slice.
pub fn kdj<B: Ohlcv>(bars: &[B], config: &KdjConfig) -> Result<Vec<OscillatorPoint>> {
    if bars.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut oscillator = Kdj::new(*config);
    Ok(bars.iter().map(|bar| oscillator.compute(bar)).collect())
}

use tracing::{debug, instrument};

use crate::{
    HeikinAshiBar, KdjConfig, Ohlcv, OscillatorPoint, Signal, SignalPoint, crossovers,
    error::Result, heikin_ashi, kdj,
};

/// Every intermediate series of one run, position-aligned with the input.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    pub heikin_ashi: Vec<HeikinAshiBar>,
    pub oscillator: Vec<OscillatorPoint>,
    pub signals: Vec<SignalPoint>,
}

impl PipelineOutput {
    #[must_use]
    pub fn buys(&self) -> impl Iterator<Item = &SignalPoint> {
        self.signals.iter().filter(|s| s.signal == Signal::Buy)
    }

    #[must_use]
    pub fn sells(&self) -> impl Iterator<Item = &SignalPoint> {
        self.signals.iter().filter(|s| s.signal == Signal::Sell)
    }
}

/// Heikin-Ashi → KDJ → crossover signals over one bar series.
///
/// Runs are independent: a `Pipeline` holds only its configuration, so one
/// instance can process many series, from several threads if needed.
///
/// # Example
///
/// ```
/// use heikin_kdj::{Bar, KdjConfig, Pipeline, Signal};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let bars = [
///     Bar::new(day(1), 10.0, 12.0, 9.0, 11.0),
///     Bar::new(day(2), 11.0, 13.0, 10.0, 12.0),
///     Bar::new(day(3), 12.0, 12.0, 11.0, 11.5),
/// ];
///
/// let pipeline = Pipeline::new(KdjConfig::builder().window(2).build().unwrap());
/// let output = pipeline.run(&bars).unwrap();
///
/// assert_eq!(output.signals.len(), 3);
/// assert_eq!(output.signals[0].signal, Signal::Neutral);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Pipeline {
    config: KdjConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: KdjConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &KdjConfig {
        &self.config
    }

    /// Runs all three stages.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`](crate::Error::EmptyInput),
    /// [`Error::InvalidBar`](crate::Error::InvalidBar) or
    /// [`Error::Unordered`](crate::Error::Unordered); nothing is produced in
    /// that case.
    #[instrument(level = "debug", skip_all, fields(bars = bars.len(), config = %self.config))]
    pub fn run<B: Ohlcv>(&self, bars: &[B]) -> Result<PipelineOutput> {
        let heikin_ashi = heikin_ashi(bars)?;
        let oscillator = kdj(&heikin_ashi, &self.config)?;

        let indeterminate = oscillator.iter().filter(|p| p.j.is_indeterminate()).count();
        if indeterminate > 0 {
            debug!(indeterminate, "flat windows in oscillator");
        }

        let signals = crossovers(&oscillator);
        let output = PipelineOutput {
            heikin_ashi,
            oscillator,
            signals,
        };
        debug!(
            buys = output.buys().count(),
            sells = output.sells().count(),
            "pipeline finished"
        );

        Ok(output)
    }
}

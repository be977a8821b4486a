use std::{
    collections::HashMap,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::{Bar, Ohlcv, Price, Signal, SignalPoint, Timestamp, error::Result};

/// A buy or sell marker placed on a chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub timestamp: Timestamp,
    pub price: Price,
    pub signal: Signal,
}

/// Candlestick view of the raw bars with signal markers at the close.
#[derive(Clone, Debug, Serialize)]
pub struct CandleChart {
    pub title: &'static str,
    pub candles: Vec<Bar>,
    pub buys: Vec<Marker>,
    pub sells: Vec<Marker>,
}

impl CandleChart {
    pub const TITLE: &'static str = "Trading Positions on Candlestick Chart";

    /// Markers sit at the raw close of the bar sharing the signal's date.
    /// Signals dated outside `bars` are dropped.
    #[must_use]
    pub fn new<B: Ohlcv>(bars: &[B], signals: &[SignalPoint]) -> Self {
        let candles: Vec<Bar> = bars
            .iter()
            .map(|b| Bar::new(b.timestamp(), b.open(), b.high(), b.low(), b.close()))
            .collect();
        let closes: HashMap<Timestamp, Price> =
            candles.iter().map(|bar| (bar.date, bar.close)).collect();

        let (buys, sells) = markers(signals, |signal| {
            let close = closes.get(&signal.timestamp).copied();
            if close.is_none() {
                debug!(date = %signal.timestamp, "signal has no matching bar");
            }
            close
        });

        Self {
            title: Self::TITLE,
            candles,
            buys,
            sells,
        }
    }
}

/// Line view of K, D and J with signal markers on the J line.
#[derive(Clone, Debug, Serialize)]
pub struct OscillatorChart {
    pub title: &'static str,
    pub points: Vec<SignalPoint>,
    pub buys: Vec<Marker>,
    pub sells: Vec<Marker>,
}

impl OscillatorChart {
    pub const TITLE: &'static str = "KDJ Indicator with Buy/Sell Signals";

    #[must_use]
    pub fn new(signals: &[SignalPoint]) -> Self {
        let (buys, sells) = markers(signals, |signal| signal.j.get());

        Self {
            title: Self::TITLE,
            points: signals.to_vec(),
            buys,
            sells,
        }
    }
}

fn markers(
    signals: &[SignalPoint],
    mut price_of: impl FnMut(&SignalPoint) -> Option<Price>,
) -> (Vec<Marker>, Vec<Marker>) {
    signals
        .iter()
        .filter(|s| s.signal != Signal::Neutral)
        .filter_map(|s| {
            price_of(s).map(|price| Marker {
                timestamp: s.timestamp,
                price,
                signal: s.signal,
            })
        })
        .partition(|marker| marker.signal == Signal::Buy)
}

/// Renders charts. A read-only consumer of pipeline output; its failure
/// never invalidates the computed series.
pub trait ChartSink {
    /// # Errors
    ///
    /// Any rendering or output failure.
    fn candles(&mut self, chart: &CandleChart) -> Result<()>;

    /// # Errors
    ///
    /// Any rendering or output failure.
    fn oscillator(&mut self, chart: &OscillatorChart) -> Result<()>;
}

/// Writes chart data as JSON (`candles.json`, `kdj.json`) into a directory
/// for an external plotter.
#[derive(Clone, Debug)]
pub struct JsonChartSink {
    dir: PathBuf,
}

impl JsonChartSink {
    pub const CANDLES_FILE: &'static str = "candles.json";
    pub const OSCILLATOR_FILE: &'static str = "kdj.json";

    #[must_use]
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn write<T: Serialize>(&self, file: &str, chart: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), chart)?;
        debug!(path = %path.display(), "wrote chart");
        Ok(())
    }
}

impl ChartSink for JsonChartSink {
    fn candles(&mut self, chart: &CandleChart) -> Result<()> {
        self.write(Self::CANDLES_FILE, chart)
    }

    fn oscillator(&mut self, chart: &OscillatorChart) -> Result<()> {
        self.write(Self::OSCILLATOR_FILE, chart)
    }
}

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{OscillatorPoint, Timestamp, Value};

/// Discrete trading signal, serialized as `-1`, `0` or `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Signal {
    Sell = -1,
    #[default]
    Neutral = 0,
    Buy = 1,
}

impl Signal {
    /// Signal for the step from `prev` to `cur`.
    ///
    /// Buy when J crosses strictly from below K to above it, sell on the
    /// mirror move. Touching (J equal to K on either side) or any
    /// indeterminate reading is neutral.
    #[must_use]
    pub fn crossing(prev: &OscillatorPoint, cur: &OscillatorPoint) -> Self {
        let (Some(prev_j), Some(prev_k), Some(j), Some(k)) =
            (prev.j.get(), prev.k.get(), cur.j.get(), cur.k.get())
        else {
            return Self::Neutral;
        };

        if prev_j < prev_k && j > k {
            Self::Buy
        } else if prev_j > prev_k && j < k {
            Self::Sell
        } else {
            Self::Neutral
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal as i8
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Sell),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Buy),
            other => Err(format!("signal must be -1, 0 or 1, got {other}")),
        }
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Oscillator reading together with the signal it produced.
///
/// Column names follow the persisted layout: `Date, J, K, D, Signal`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    #[serde(rename = "Date")]
    pub timestamp: Timestamp,
    #[serde(rename = "J")]
    pub j: Value,
    #[serde(rename = "K")]
    pub k: Value,
    #[serde(rename = "D")]
    pub d: Value,
    #[serde(rename = "Signal")]
    pub signal: Signal,
}

impl SignalPoint {
    #[must_use]
    pub fn new(point: &OscillatorPoint, signal: Signal) -> Self {
        Self {
            timestamp: point.timestamp,
            j: point.j,
            k: point.k,
            d: point.d,
            signal,
        }
    }
}

/// Streaming J/K crossover detector.
///
/// Stateless apart from the previous point; the first point never signals.
#[derive(Clone, Debug, Default)]
pub struct CrossoverDetector {
    previous: Option<OscillatorPoint>,
}

impl CrossoverDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn compute(&mut self, point: &OscillatorPoint) -> SignalPoint {
        let signal = self
            .previous
            .as_ref()
            .map_or(Signal::Neutral, |prev| Signal::crossing(prev, point));
        self.previous = Some(*point);

        SignalPoint::new(point, signal)
    }
}

/// Derives a signal for every oscillator point.
#[must_use]
pub fn crossovers(points: &[OscillatorPoint]) -> Vec<SignalPoint> {
    let mut detector = CrossoverDetector::new();
    points.iter().map(|point| detector.compute(point)).collect()
}

use serde::{Deserialize, Serialize};

use crate::{Ohlcv, Price, Timestamp};

/// A daily OHLC bar as read from the input file.
///
/// Field names match the CSV headers `Date, Open, High, Low, Close`;
/// any other columns in the file (volume, adjusted close) are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "Date")]
    pub date: Timestamp,
    #[serde(rename = "Open")]
    pub open: Price,
    #[serde(rename = "High")]
    pub high: Price,
    #[serde(rename = "Low")]
    pub low: Price,
    #[serde(rename = "Close")]
    pub close: Price,
}

impl Bar {
    #[must_use]
    pub fn new(date: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

impl Ohlcv for Bar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        self.date
    }
}

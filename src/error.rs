use std::fmt::{self, Display};

use thiserror::Error;

use crate::{Price, Timestamp};

/// Errors raised by the indicator pipeline and its collaborators.
///
/// Structural problems ([`EmptyInput`](Error::EmptyInput),
/// [`InvalidBar`](Error::InvalidBar), [`Unordered`](Error::Unordered),
/// [`Configuration`](Error::Configuration)) abort a run before any output
/// is produced. Flat windows are not errors; they surface as
/// [`Value::Indeterminate`](crate::Value::Indeterminate).
#[derive(Debug, Error)]
pub enum Error {
    /// Zero bars were supplied.
    #[error("no bars supplied")]
    EmptyInput,

    /// A bar has a non-finite field or `high < low`.
    #[error("invalid bar at index {index} ({timestamp}): {reason}")]
    InvalidBar {
        index: usize,
        timestamp: Timestamp,
        reason: InvalidBarReason,
    },

    /// Bars are not in strictly increasing date order.
    #[error("bar at index {index} ({timestamp}) does not follow {previous}")]
    Unordered {
        index: usize,
        timestamp: Timestamp,
        previous: Timestamp,
    },

    /// A window or smoothing parameter is out of range.
    #[error("invalid configuration: `{parameter}` must be at least 1, got {value}")]
    Configuration {
        parameter: &'static str,
        value: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),
}

/// Why a bar was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidBarReason {
    NonFinite { field: &'static str, value: Price },
    HighBelowLow { high: Price, low: Price },
}

impl Display for InvalidBarReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field, value } => write!(f, "{field} is not finite ({value})"),
            Self::HighBelowLow { high, low } => write!(f, "high {high} is below low {low}"),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

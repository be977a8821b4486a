use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::Price;

/// An oscillator reading that may be indeterminate.
///
/// A window whose highest high equals its lowest low has no range, so its
/// raw stochastic value is undefined. That position is marked
/// [`Indeterminate`](Value::Indeterminate) through K, D and J instead of
/// being defaulted to some number.
///
/// `Value` deliberately has no ordering. Compare through
/// [`get`](Value::get), so an indeterminate operand never compares true.
///
/// Serialized as an optional float: an empty CSV cell or JSON `null`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Price>", into = "Option<Price>")]
pub enum Value {
    /// A computed reading.
    Defined(Price),
    /// No reading: the window had no range, or an input was indeterminate.
    #[default]
    Indeterminate,
}

impl Value {
    /// The number, or `None` when indeterminate.
    #[inline]
    #[must_use]
    pub fn get(self) -> Option<Price> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Indeterminate => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_indeterminate(self) -> bool {
        matches!(self, Self::Indeterminate)
    }

    #[inline]
    #[must_use]
    pub fn map(self, f: impl FnOnce(Price) -> Price) -> Self {
        match self {
            Self::Defined(v) => Self::Defined(f(v)),
            Self::Indeterminate => Self::Indeterminate,
        }
    }

    /// Combines two readings; indeterminate if either side is.
    #[inline]
    #[must_use]
    pub fn zip_with(self, other: Self, f: impl FnOnce(Price, Price) -> Price) -> Self {
        match (self, other) {
            (Self::Defined(a), Self::Defined(b)) => Self::Defined(f(a, b)),
            _ => Self::Indeterminate,
        }
    }
}

impl From<Option<Price>> for Value {
    fn from(value: Option<Price>) -> Self {
        value.map_or(Self::Indeterminate, Self::Defined)
    }
}

impl From<Value> for Option<Price> {
    fn from(value: Value) -> Self {
        value.get()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{v}"),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

use crate::{Price, Value};

/// Recursive exponentially weighted mean.
///
/// Uses the standard smoothing factor `α = 2 / (span + 1)`:
///
/// ```text
/// ewma_0 = x_0
/// ewma_i = α × x_i + (1 − α) × ewma_{i−1}
/// ```
///
/// An indeterminate input yields an indeterminate output and leaves the
/// state untouched, so the next defined input continues from the last
/// defined mean (or seeds it, if there is none yet).
#[derive(Clone, Debug)]
pub(crate) struct Ewma {
    alpha: f64,
    current: Option<Price>,
}

impl Ewma {
    pub fn new(span: usize) -> Self {
        Self {
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (span + 1) as f64,
            current: None,
        }
    }

    #[inline]
    pub fn update(&mut self, input: Value) -> Value {
        let Some(x) = input.get() else {
            return Value::Indeterminate;
        };

        let next = match self.current {
            Some(previous) => self.alpha.mul_add(x - previous, previous),
            None => x,
        };
        self.current = Some(next);

        Value::Defined(next)
    }
}

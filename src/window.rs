use crate::{Ohlcv, Price};
use std::collections::VecDeque;

/// Trailing window of `(high, low)` pairs for the rolling extremes.
///
/// Holds at most `size` bars. Until `size` bars have been added the window
/// is partial and the extremes cover whatever history exists, matching
/// the usual rolling-statistic semantics.
#[derive(Clone, Debug)]
pub(crate) struct ExtremaWindow {
    size: usize,
    window: VecDeque<(Price, Price)>,
}

impl ExtremaWindow {
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "window size must be non-zero");

        Self {
            size,
            window: VecDeque::with_capacity(size),
        }
    }

    #[inline]
    pub fn add(&mut self, ohlcv: &impl Ohlcv) {
        if self.window.len() == self.size {
            self.window.pop_front();
        }
        self.window.push_back((ohlcv.high(), ohlcv.low()));
    }

    /// `(lowest_low, highest_high)` over the window, `None` while empty.
    ///
    /// Recomputed from the window on every call; O(size).
    #[inline]
    pub fn extremes(&self) -> Option<(Price, Price)> {
        let mut pairs = self.window.iter().copied();
        let (high, low) = pairs.next()?;

        Some(pairs.fold((low, high), |(lowest, highest), (high, low)| {
            (lowest.min(low), highest.max(high))
        }))
    }
}

use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{SignalPoint, error::Result};

/// Durably stores a computed signal series.
pub trait SignalSink {
    /// Stores `signals` in order, keeping field names.
    ///
    /// # Errors
    ///
    /// Any failure to write the series.
    fn persist(&mut self, signals: &[SignalPoint]) -> Result<()>;
}

/// Writes signals to a CSV file with `Date, J, K, D, Signal` columns.
///
/// Indeterminate readings are written as empty cells. Floats are written in
/// shortest round-trip form, so [`read_signals`] reloads identical values.
#[derive(Clone, Debug)]
pub struct CsvSignalSink {
    path: PathBuf,
}

impl CsvSignalSink {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalSink for CsvSignalSink {
    fn persist(&mut self, signals: &[SignalPoint]) -> Result<()> {
        write_signals(File::create(&self.path)?, signals)?;
        debug!(path = %self.path.display(), rows = signals.len(), "persisted signals");
        Ok(())
    }
}

/// Serializes signals as CSV into `writer`.
///
/// # Errors
///
/// I/O or serialization failures.
pub fn write_signals<W: Write>(writer: W, signals: &[SignalPoint]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for signal in signals {
        wtr.serialize(signal)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Reloads a series written by [`CsvSignalSink`].
///
/// # Errors
///
/// I/O or parse failures.
pub fn read_signals<P: AsRef<Path>>(path: P) -> Result<Vec<SignalPoint>> {
    read_signals_from(File::open(path)?)
}

/// Parses a CSV signal series from `reader`.
///
/// # Errors
///
/// Parse failures, including signal codes other than `-1`, `0`, `1`.
pub fn read_signals_from<R: Read>(reader: R) -> Result<Vec<SignalPoint>> {
    let mut rdr = csv::Reader::from_reader(reader);
    Ok(rdr.deserialize().collect::<Result<Vec<_>, _>>()?)
}

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{Bar, error::Result, ohlcv::check_order};

/// Supplies the ordered bar series the pipeline runs on.
pub trait BarSource {
    /// Loads every bar in chronological order.
    ///
    /// `Ok(None)` means the source has no data at all (e.g. the resource
    /// does not exist), as opposed to an empty but readable series.
    ///
    /// # Errors
    ///
    /// I/O and parse failures, and [`Error::Unordered`](crate::Error::Unordered)
    /// if dates are not strictly increasing.
    fn load(&self) -> Result<Option<Vec<Bar>>>;
}

/// Reads daily bars from a CSV file with `Date, Open, High, Low, Close`
/// columns (dates as `YYYY-MM-DD`).
#[derive(Clone, Debug)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
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

impl BarSource for CsvBarSource {
    fn load(&self) -> Result<Option<Vec<Bar>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "input file not found");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let bars = read_bars(file)?;
        debug!(path = %self.path.display(), bars = bars.len(), "loaded bars");

        Ok(Some(bars))
    }
}

/// Parses bars from CSV text and checks their order.
///
/// # Errors
///
/// CSV/parse failures and [`Error::Unordered`](crate::Error::Unordered).
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let bars = rdr.deserialize().collect::<Result<Vec<Bar>, _>>()?;
    check_order(&bars)?;

    Ok(bars)
}

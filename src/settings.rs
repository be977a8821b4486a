//! Run settings loaded from a TOML file.
//!
//! ```toml
//! input = "Data.csv"
//! output = "Output.csv"
//! charts = "charts"
//!
//! [kdj]
//! window = 9
//! smooth_k = 3
//! smooth_d = 3
//! ```
//!
//! Every key is optional. Missing `[kdj]` keys take their defaults; zero
//! values and unknown keys, at any level, are rejected while parsing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{KdjConfig, error::Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Input bar CSV.
    pub input: Option<PathBuf>,
    /// Where the signal CSV is written.
    pub output: Option<PathBuf>,
    /// Directory for chart data; charts are skipped when unset.
    pub charts: Option<PathBuf>,
    pub kdj: KdjConfig,
}

impl Settings {
    /// # Errors
    ///
    /// I/O failure reading `path`, or an invalid document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// # Errors
    ///
    /// [`Error::Settings`](crate::Error::Settings) for malformed TOML, unknown
    /// keys or out-of-range parameters.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

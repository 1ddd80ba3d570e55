//! Error types shared by the generation pipeline.

use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Problems with the configuration document or the holiday rule files it points to.
/// All of them are raised before the first date is classified.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration document: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("configuration is missing required key `{0}`")]
    MissingKey(String),

    #[error("date_types.{first} and date_types.{second} share the code `{code}`")]
    DuplicateCode {
        code: String,
        first: String,
        second: String,
    },

    #[error("malformed holiday rules in {}: {source}", path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no built-in holiday rules for jurisdiction `{0}`")]
    UnknownJurisdiction(String),
}

/// Top level error for classification, generation and rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot parse date `{input}`: {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The oracle reported the date as neither a holiday nor a workday.
    #[error("holiday oracle gave no classification for {date}")]
    Classification { date: NaiveDate },

    #[error("year {0} is outside the representable date range")]
    InvalidYear(i32),

    #[error("holiday data does not cover year {0}")]
    UnsupportedYear(i32),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

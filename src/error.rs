use std::{error::Error as StdError, io};

use thiserror::Error;

use crate::decoder::DecodeError;

/// Failures raised while building the schema index; the scan never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option was not supplied.
    #[error("missing required option '{0}'")]
    MissingOption(&'static str),
    /// The schema option is not a valid mapping list.
    #[error("unparseable schema configuration: {0}")]
    Parse(#[source] serde_json::Error),
    /// No decoder is registered under the requested kind.
    #[error("unsupported decoder kind '{kind}' for column '{column}'")]
    UnsupportedDecoder {
        /// Kind named in the configuration.
        kind: String,
        /// Output column that asked for it.
        column: String,
    },
}

/// Failures that abort a running scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The wrapped source cursor failed.
    #[error("source cursor failed: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync>),
    /// A matched cell's value could not be decoded.
    #[error("decode failed for column '{column}': {source}")]
    Decode {
        /// Output column the cell maps to.
        column: String,
        /// Decoder failure.
        #[source]
        source: DecodeError,
    },
    /// A row output hook failed.
    #[error("row output failed: {0}")]
    Output(#[source] io::Error),
}

impl ScanError {
    /// Wrap a failure reported by a source cursor.
    pub fn from_source<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        ScanError::Source(err.into())
    }
}

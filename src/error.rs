//! Error types for rs-page-reader.
//!
//! Reading a page never fails on malformed markup. The only errors are
//! configuration problems detected before any work is done.

/// Error type for reader configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An option value is out of its accepted range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The page URL supplied in the options could not be parsed.
    #[error("Invalid page URL {url:?}: {source}")]
    InvalidUrl {
        /// The URL string as supplied.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, Error>;

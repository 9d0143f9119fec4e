//! Errors that can arise while building grids or running experiments.

use std::path::PathBuf;

/// Everything that can go wrong in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A size or count that must be positive was not, or some other
    /// parameter was unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An index fell outside the inclusive range `lo..=hi`.
    #[error("index {index} out of range {lo}..={hi}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Smallest valid index.
        lo: usize,
        /// Largest valid index.
        hi: usize,
    },
    /// We were asked to open a random blocked site, but every site is
    /// already open.
    #[error("every site is already open")]
    NoBlockedSites,
    /// Reading or writing a save file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A yaml save file could not be (de)serialized.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A json save file could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A cbor save file could not be (de)serialized.
    #[error("cbor error: {0}")]
    Cbor(#[from] serde_cbor::Error),
    /// We only know yaml, json and cbor.
    #[error("I don't know how to handle file {0:?}")]
    UnknownFormat(PathBuf),
    /// The rayon thread pool could not be configured.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A result with our [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that `index` lies in `lo..=hi`.
    pub fn check_range(index: usize, lo: usize, hi: usize) -> Result<usize> {
        if index < lo || index > hi {
            Err(Error::IndexOutOfRange { index, lo, hi })
        } else {
            Ok(index)
        }
    }
}

#[test]
fn range_check() {
    assert_eq!(Error::check_range(3, 1, 3).unwrap(), 3);
    assert!(matches!(Error::check_range(0, 1, 3),
                     Err(Error::IndexOutOfRange { index: 0, lo: 1, hi: 3 })));
    assert!(matches!(Error::check_range(4, 1, 3),
                     Err(Error::IndexOutOfRange { index: 4, .. })));
}

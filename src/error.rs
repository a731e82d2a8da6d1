//! Error types shared by every stage of a build

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::content::FrontMatterError;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a build. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A content file whose front-matter could not be used
    #[error("malformed content in {}: {}", .path.display(), .source)]
    MalformedContent {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    /// Missing or invalid process inputs, reported before touching the filesystem
    #[error("usage error: {0}")]
    Usage(String),

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {}", .path.display(), .source)]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Two content items resolve to the same output file
    #[error(
        "{} and {} both publish to {}",
        .first.display(),
        .second.display(),
        .output.display()
    )]
    DuplicateOutput {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

impl Error {
    /// Build a closure that wraps an `io::Error` with the path it happened on
    pub(crate) fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }

    pub(crate) fn malformed(path: impl AsRef<Path>) -> impl FnOnce(FrontMatterError) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Error::MalformedContent { path, source }
    }
}

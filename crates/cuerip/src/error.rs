use std::path::PathBuf;
use thiserror::Error;

// Custom error type for cue extraction runs
#[derive(Debug, Error)]
pub enum CueRipError {
    #[error("Invalid playlist URL: {0}")]
    InvalidInputUrl(String),

    #[error("Failed to create output directory {path:?}: {source}")]
    OutdirCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Playlist error: {0}")]
    PlaylistError(String),

    #[error("Segment fetch error for {url}: {detail}")]
    FetchFailed { url: String, detail: String },

    #[error("Key fetch error for {url}: {detail}")]
    KeyFetchFailed { url: String, detail: String },

    #[error("Failed to store {url} at {path:?}: {source}")]
    StoreFailed {
        url: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Concatenation failed: {0}")]
    ConcatFailed(String),
}

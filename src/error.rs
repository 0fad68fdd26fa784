//! Error types for the conversion pipeline.

use std::path::PathBuf;

/// Result type alias using the pipeline Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the conversion pipeline.
///
/// Every failure aborts the current operation and propagates; nothing is
/// swallowed. Session disposal is the caller's cleanup step and must run on
/// every exit path, not only the success path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file extension is not in the allowed set; nothing was allocated.
    #[error("file {name:?} is not allowed")]
    DisallowedFile { name: String },

    /// Metadata extraction failed.
    #[error("probe failed: {0}")]
    Probe(#[source] stickermill_av::Error),

    /// A transcode invocation failed.
    #[error("transcode failed: {0}")]
    Transcode(#[source] stickermill_av::Error),

    /// A corrupt or unreadable archive, or a failure writing the result
    /// archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The compression loop hit its pass limit with the file still above
    /// the template's size ceiling.
    #[error(
        "still above {limit_kb} KB after {passes} compression passes: {}",
        path.display()
    )]
    CompressionBudgetExceeded {
        path: PathBuf,
        passes: u32,
        limit_kb: u32,
    },

    /// Downloading the source file failed.
    #[error("download failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

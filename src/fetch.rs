//! Source file download.

use crate::Result;
use tracing::debug;

/// Download a source file into memory.
///
/// Non-success HTTP statuses are errors; the transport collaborator hands
/// us a short-lived direct file URL, so no retries are attempted here.
pub fn download(url: &str) -> Result<Vec<u8>> {
    debug!(url, "downloading source file");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}

//! Per-pass compression decisions.
//!
//! The iterative compression loop changes only bitrate: geometry, fps,
//! and duration were already chosen to satisfy the template. Each pass
//! re-probes the file and either stops (within the ceiling) or derives
//! the next bitrate from the probed one, never from stale metadata.

use crate::template::Spec;
use stickermill_av::ProbeResult;

/// Per-pass bitrate reduction factor.
const COMPRESSION_STEP: f64 = 0.8;

/// What the compression loop should do after probing the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionStep {
    /// The file fits the spec's size ceiling; leave it untouched.
    Done,
    /// Recompress at the given bitrate, a flat 20% below the probed one.
    Recompress { bitrate_kbps: u32 },
}

/// Decide the next step from freshly probed metadata.
pub fn next_compression_step(meta: &ProbeResult, spec: &Spec) -> CompressionStep {
    if meta.size_kb <= spec.max_size_kb as f64 {
        CompressionStep::Done
    } else {
        CompressionStep::Recompress {
            bitrate_kbps: (meta.bitrate_kbps * COMPRESSION_STEP).round() as u32,
        }
    }
}

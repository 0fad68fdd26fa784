//! Per-file conversion planning.
//!
//! Pure computation from probed source metadata and a template spec to the
//! geometry, timing, and speed parameters handed to the transcoder.

use crate::template::Spec;
use stickermill_av::ProbeResult;

/// The transcode parameters computed for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPlan {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: f64,
    /// Output duration in seconds; 0 for content with no timeline.
    pub duration: f64,
    /// Playback speed multiplier; 1 when the source fits the target
    /// duration. Time-compression keeps the whole clip instead of
    /// truncating it.
    pub speed: f64,
}

impl ConversionPlan {
    /// Compute the plan for a probed source under a spec.
    pub fn for_source(meta: &ProbeResult, spec: &Spec) -> Self {
        let (width, height) = fit_resolution(meta.width, meta.height, spec.resolution);

        // A reported 0 fps means no real timeline; clamp to the target in
        // that case and whenever the source exceeds it.
        let fps = if meta.fps == 0.0 || meta.fps > spec.fps {
            spec.fps
        } else {
            meta.fps
        };

        let (duration, speed) = if meta.duration > spec.duration {
            (spec.duration, meta.duration / spec.duration)
        } else {
            (meta.duration, 1.0)
        };

        Self {
            width,
            height,
            fps,
            duration,
            speed,
        }
    }
}

/// Scale dimensions down to fit within `resolution`, preserving aspect
/// ratio. Sources already within bounds keep their native dimensions;
/// nothing is ever upscaled.
fn fit_resolution(width: u32, height: u32, resolution: u32) -> (u32, u32) {
    if width <= resolution && height <= resolution {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;
    if width > height {
        (resolution, (resolution as f64 / ratio).round() as u32)
    } else {
        ((resolution as f64 * ratio).round() as u32, resolution)
    }
}

//! FFprobe-based media probing.
//!
//! Extracts the handful of fields the conversion planner needs: byte size,
//! pixel dimensions, duration, frame rate, and container bitrate. Only the
//! absence of a video/image stream is fatal; every numeric field falls back
//! to zero when the container does not report it.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Metadata extracted from a media file, in the units the planner works in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// File size in KB.
    pub size_kb: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Duration in seconds; 0 when the container reports none (still images).
    pub duration: f64,
    /// Frame rate; 0 when the content has no real timeline.
    pub fps: f64,
    /// Container bitrate in kbps; 0 when not reported.
    pub bitrate_kbps: f64,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    size: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Probe a media file using ffprobe.
///
/// # Errors
///
/// Fails when ffprobe is missing, exits non-zero, produces unparseable
/// output, or when the file contains no video/image stream.
pub fn probe(path: &Path) -> Result<ProbeResult> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found("ffprobe")
            } else {
                Error::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed("ffprobe", stderr.to_string()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

    let ff_output: FfprobeOutput = serde_json::from_str(&json_str)?;

    parse_ffprobe_output(path, ff_output)
}

fn parse_ffprobe_output(path: &Path, output: FfprobeOutput) -> Result<ProbeResult> {
    let video = output
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| Error::NoMediaStream {
            path: path.to_path_buf(),
        })?;

    let size_kb = output
        .format
        .size
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
        / 1024.0;

    let duration = output
        .format
        .duration
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    // A frame rate is only meaningful for content with a real timeline;
    // ffprobe reports a nominal rate even for still images.
    let fps = if duration > 0.0 {
        video
            .r_frame_rate
            .as_deref()
            .and_then(parse_frame_rate)
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let bitrate_kbps = output
        .format
        .bit_rate
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
        / 1024.0;

    Ok(ProbeResult {
        size_kb,
        width: video.width.unwrap_or(0),
        height: video.height.unwrap_or(0),
        duration,
        fps,
        bitrate_kbps,
    })
}

fn parse_frame_rate(rate_str: &str) -> Option<f64> {
    let parts: Vec<&str> = rate_str.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
    }
    rate_str.parse().ok()
}

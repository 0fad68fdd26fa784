//! FFmpeg-based transcoding.
//!
//! One invocation per call, against a fixed encoding profile suited for
//! alpha-channel sticker output: libvpx-vp9, yuva420p pixel format, crf 0,
//! no audio. Callers control fps, dimensions, duration cap, bitrate, and
//! playback speed per invocation.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Parameters for a single transcode invocation.
///
/// Optional fields are omitted from the command line entirely when `None`,
/// leaving the corresponding property of the source untouched.
#[derive(Debug, Clone)]
pub struct TranscodeParams<'a> {
    /// Source file.
    pub input: &'a Path,
    /// Destination file.
    pub output: &'a Path,
    /// Output container format (e.g. "webm").
    pub format: &'a str,
    /// Output frame rate.
    pub fps: Option<f64>,
    /// Output dimensions as (width, height).
    pub size: Option<(u32, u32)>,
    /// Cap on output duration in seconds.
    pub duration: Option<f64>,
    /// Target video bitrate in kbps.
    pub bitrate_kbps: Option<u32>,
    /// Playback speed multiplier. A value of `s` rescales timestamps by
    /// `1/s`, so trimming duration and altering speed compose: speed 2
    /// plays the same content twice as fast.
    pub speed: Option<f64>,
}

/// Run a single transcode.
///
/// # Errors
///
/// Fails when ffmpeg is missing or exits non-zero; the error carries
/// ffmpeg's stderr diagnostic.
pub fn transcode(params: &TranscodeParams<'_>) -> Result<()> {
    let args = build_args(params);
    debug!(input = %params.input.display(), output = %params.output.display(), "running ffmpeg");

    let output = Command::new("ffmpeg").args(&args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::tool_not_found("ffmpeg")
        } else {
            Error::Io(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed("ffmpeg", stderr.to_string()));
    }

    Ok(())
}

fn build_args(params: &TranscodeParams<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-v".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        params.input.into(),
    ];

    if let Some(speed) = params.speed {
        args.push("-filter:v".into());
        args.push(format!("setpts=PTS/{}", speed).into());
    }

    if let Some(fps) = params.fps {
        args.push("-r".into());
        args.push(format!("{}", fps).into());
    }

    if let Some((width, height)) = params.size {
        args.push("-s".into());
        args.push(format!("{}x{}", width, height).into());
    }

    if let Some(duration) = params.duration {
        args.push("-t".into());
        args.push(format!("{}", duration).into());
    }

    if let Some(bitrate) = params.bitrate_kbps {
        args.push("-b:v".into());
        args.push(format!("{}k", bitrate).into());
    }

    // Fixed profile: alpha-capable, lossless quality, no audio track.
    args.extend([
        OsString::from("-c:v"),
        "libvpx-vp9".into(),
        "-pix_fmt".into(),
        "yuva420p".into(),
        "-crf".into(),
        "0".into(),
        "-auto-alt-ref".into(),
        "0".into(),
        "-an".into(),
        "-f".into(),
        params.format.into(),
    ]);
    args.push(params.output.into());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_as_strings(params: &TranscodeParams<'_>) -> Vec<String> {
        build_args(params)
            .into_iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_full_conversion_args() {
        let input = PathBuf::from("in.gif");
        let output = PathBuf::from("out.webm");
        let args = args_as_strings(&TranscodeParams {
            input: &input,
            output: &output,
            format: "webm",
            fps: Some(24.0),
            size: Some((512, 384)),
            duration: Some(3.0),
            bitrate_kbps: Some(1024),
            speed: Some(2.0),
        });

        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-y",
                "-i",
                "in.gif",
                "-filter:v",
                "setpts=PTS/2",
                "-r",
                "24",
                "-s",
                "512x384",
                "-t",
                "3",
                "-b:v",
                "1024k",
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuva420p",
                "-crf",
                "0",
                "-auto-alt-ref",
                "0",
                "-an",
                "-f",
                "webm",
                "out.webm",
            ]
        );
    }

    #[test]
    fn test_bitrate_only_recompression_args() {
        let input = PathBuf::from("file.webm");
        let output = PathBuf::from("file.webm_");
        let args = args_as_strings(&TranscodeParams {
            input: &input,
            output: &output,
            format: "webm",
            fps: None,
            size: None,
            duration: None,
            bitrate_kbps: Some(320),
            speed: None,
        });

        assert!(args.contains(&"-b:v".to_string()));
        assert!(args.contains(&"320k".to_string()));
        assert!(!args.contains(&"-r".to_string()));
        assert!(!args.contains(&"-s".to_string()));
        assert!(!args.contains(&"-t".to_string()));
        assert!(!args.contains(&"-filter:v".to_string()));
    }
}

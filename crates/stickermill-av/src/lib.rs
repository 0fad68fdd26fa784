//! # stickermill-av
//!
//! Thin wrappers over the external media tools stickermill drives as
//! subprocesses:
//!
//! - Probing media files with ffprobe to extract the metadata the
//!   conversion planner needs (size, dimensions, duration, fps, bitrate)
//! - Running single transcode operations with ffmpeg against a fixed
//!   alpha-capable encoding profile
//! - Detecting which tools are installed
//!
//! ## Example
//!
//! ```no_run
//! use stickermill_av::probe;
//!
//! let meta = probe("/path/to/clip.gif".as_ref())?;
//! println!("{}x{} @ {} fps", meta.width, meta.height, meta.fps);
//! # Ok::<(), stickermill_av::Error>(())
//! ```

mod error;
pub mod probe;
pub mod tools;
pub mod transcode;

// Re-exports
pub use error::{Error, Result};
pub use probe::{probe, ProbeResult};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
pub use transcode::{transcode, TranscodeParams};

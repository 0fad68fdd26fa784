//! # stickermill
//!
//! Converts user-supplied media files (or archives of them) into sticker
//! packs that satisfy fixed output templates: bounded resolution, frame
//! rate, duration, and a hard byte-size ceiling.
//!
//! The pipeline is organized around [`ConversionSession`], which owns a
//! per-upload working directory: ingestion materializes the input
//! (unarchiving when needed), `convert` computes a per-file plan from
//! probed metadata and drives the transcoder plus the iterative
//! compression loop, and `pack` produces the result archive. External
//! tools (ffprobe/ffmpeg) are wrapped by the `stickermill-av` crate.

pub mod archive;
pub mod classify;
pub mod config;
mod error;
pub mod fetch;
pub mod session;
pub mod template;

// Re-exports
pub use classify::MediaKind;
pub use config::Config;
pub use error::{Error, Result};
pub use session::{ConversionPlan, ConversionSession, PackedArchive, SessionId};
pub use template::{Spec, Template, TemplateKey};

//! Conversion sessions.
//!
//! A session owns the working directory for one accepted upload: it
//! materializes the input (unarchiving when needed), converts every
//! convertible member file per template, drives the iterative compression
//! loop that forces outputs under each template's size ceiling, and packs
//! the results into a single archive. Disposal removes the whole working
//! directory and must run on every exit path.

mod compress;
mod plan;

pub use plan::ConversionPlan;

use compress::CompressionStep;

use crate::archive;
use crate::classify;
use crate::error::{Error, Result};
use crate::fetch;
use crate::template::{Template, TemplateKey};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use stickermill_av::{self as av, TranscodeParams};
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

/// Subfolder holding extracted archive members on the input side and the
/// to-be-packed tree on the output side.
const ARCHIVE_DIR: &str = "_archive";

/// Bitrate budget for the initial conversion pass, in kbps. The
/// compression loop refines from the probed result, not from this.
const INTERMEDIATE_BITRATE_KBPS: u32 = 1024;

/// Pass limit for the compression loop. Convergence is expected well
/// before this since bitrate shrinks geometrically; hitting the limit is
/// an error rather than an endless loop.
const MAX_COMPRESSION_PASSES: u32 = 10;

/// Unique identifier for a conversion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a packed result archive.
#[derive(Debug)]
pub struct PackedArchive {
    /// Location of the archive on disk; lives inside the session root, so
    /// it is gone after disposal.
    pub path: PathBuf,
    /// File name to present to the consumer.
    pub file_name: String,
}

impl PackedArchive {
    /// Open the archive for reading.
    pub fn open(&self) -> std::io::Result<File> {
        File::open(&self.path)
    }
}

/// The unit of work for one user-submitted file.
#[derive(Debug)]
pub struct ConversionSession {
    id: SessionId,
    input_file_name: String,
    output_file_name: String,
    root: PathBuf,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ConversionSession {
    /// Check whether a file name is allowed for ingestion.
    pub fn is_allowed(file_name: &str) -> bool {
        classify::is_allowed_file(Path::new(file_name))
    }

    /// Download a source file and ingest it.
    ///
    /// Rejects disallowed file names before downloading anything.
    pub fn ingest_url(files_root: &Path, url: &str, file_name: &str) -> Result<Self> {
        if !Self::is_allowed(file_name) {
            return Err(Error::DisallowedFile {
                name: file_name.to_string(),
            });
        }
        let bytes = fetch::download(url)?;
        Self::ingest_bytes(files_root, file_name, &bytes)
    }

    /// Ingest an already-downloaded source file.
    ///
    /// Writes the bytes under the session's input directory using the
    /// corrected file name, then extracts archive inputs into the
    /// `_archive` subfolder. Non-archive inputs are used as-is.
    pub fn ingest_bytes(files_root: &Path, file_name: &str, bytes: &[u8]) -> Result<Self> {
        if !Self::is_allowed(file_name) {
            return Err(Error::DisallowedFile {
                name: file_name.to_string(),
            });
        }

        let session = Self::allocate(files_root, file_name);
        fs::create_dir_all(&session.input_dir)?;

        let input_path = session.input_path();
        fs::write(&input_path, bytes)?;
        info!(
            id = %session.id,
            file = %session.input_file_name,
            "session ingested"
        );

        if classify::is_archive_file(Path::new(&session.input_file_name)) {
            archive::extract_zip(&input_path, &session.input_dir.join(ARCHIVE_DIR))?;
        }

        Ok(session)
    }

    fn allocate(files_root: &Path, file_name: &str) -> Self {
        let id = SessionId::new();
        let input_file_name = normalize_file_name(file_name);
        let output_file_name = set_extension(&input_file_name, "zip");
        let root = files_root.join(id.to_string());

        Self {
            id,
            input_dir: root.join("input"),
            output_dir: root.join("output"),
            input_file_name,
            output_file_name,
            root,
        }
    }

    /// The session's unique identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The corrected input file name.
    pub fn input_file_name(&self) -> &str {
        &self.input_file_name
    }

    /// The derived result archive name.
    pub fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    /// The session's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the materialized input file.
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_file_name)
    }

    /// Convert every convertible file in the input under one template.
    ///
    /// Archive inputs are walked recursively; each media member converts
    /// independently, in enumeration order, and non-media members are
    /// skipped without error. Conversions read from the input tree and
    /// write under the output tree only.
    pub fn convert(&self, key: TemplateKey) -> Result<()> {
        let template = key.template();
        info!(id = %self.id, template = %key, "converting");

        if classify::is_archive_file(Path::new(&self.input_file_name)) {
            let base = self.input_dir.join(ARCHIVE_DIR);
            for entry in WalkDir::new(&base).sort_by_file_name() {
                let entry = entry.map_err(std::io::Error::from)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel_path = match entry.path().strip_prefix(&base) {
                    Ok(p) => p.to_path_buf(),
                    Err(_) => continue,
                };
                self.convert_file(entry.path(), &rel_path, template)?;
            }
        } else {
            self.convert_file(
                &self.input_path(),
                Path::new(&self.input_file_name),
                template,
            )?;
        }

        Ok(())
    }

    fn convert_file(&self, input: &Path, rel_path: &Path, template: &Template) -> Result<()> {
        let kind = match classify::media_kind(rel_path) {
            Some(kind) => kind,
            None => return Ok(()),
        };
        let spec = template.spec(kind);

        let meta = av::probe(input).map_err(Error::Probe)?;
        let plan = ConversionPlan::for_source(&meta, spec);
        debug!(input = %input.display(), ?plan, "conversion plan");

        let output = self
            .output_dir
            .join(ARCHIVE_DIR)
            .join(template.name)
            .join(rel_path.with_extension(spec.format));
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }

        av::transcode(&TranscodeParams {
            input,
            output: &output,
            format: spec.format,
            fps: Some(plan.fps),
            size: Some((plan.width, plan.height)),
            duration: (plan.duration > 0.0).then_some(plan.duration),
            bitrate_kbps: Some(INTERMEDIATE_BITRATE_KBPS),
            speed: (plan.speed > 1.0).then_some(plan.speed),
        })
        .map_err(Error::Transcode)?;

        self.compress_to_budget(&output, template)
    }

    /// Recompress a converted file until it fits the spec's size ceiling.
    ///
    /// Bitrate is the only lever: each pass re-probes the file and asks
    /// [`compress::next_compression_step`] whether to stop or recompress
    /// 20% below the probed bitrate. The file is replaced through a
    /// write-to-temp, delete, rename sequence so a mid-transcode failure
    /// leaves the previous good file in place. The size check always runs
    /// against a fresh probe, so the pass limit only fires on a file that
    /// is genuinely still oversized after the last permitted transcode.
    fn compress_to_budget(&self, path: &Path, template: &Template) -> Result<()> {
        let kind = match classify::media_kind(path) {
            Some(kind) => kind,
            None => return Ok(()),
        };
        let spec = template.spec(kind);

        let mut passes = 0u32;
        loop {
            let meta = av::probe(path).map_err(Error::Probe)?;
            let bitrate = match compress::next_compression_step(&meta, spec) {
                CompressionStep::Done => {
                    if passes > 0 {
                        debug!(
                            path = %path.display(),
                            passes,
                            size_kb = meta.size_kb,
                            "within size budget"
                        );
                    }
                    return Ok(());
                }
                CompressionStep::Recompress { bitrate_kbps } => bitrate_kbps,
            };

            if passes == MAX_COMPRESSION_PASSES {
                return Err(Error::CompressionBudgetExceeded {
                    path: path.to_path_buf(),
                    passes,
                    limit_kb: spec.max_size_kb,
                });
            }
            passes += 1;

            debug!(
                path = %path.display(),
                pass = passes,
                size_kb = meta.size_kb,
                bitrate,
                "recompressing"
            );

            let temp = temp_sibling(path);
            av::transcode(&TranscodeParams {
                input: path,
                output: &temp,
                format: spec.format,
                fps: None,
                size: None,
                duration: None,
                bitrate_kbps: Some(bitrate),
                speed: None,
            })
            .map_err(Error::Transcode)?;

            // The original is only removed once the replacement fully
            // exists.
            fs::remove_file(path)?;
            fs::rename(&temp, path)?;
        }
    }

    /// Pack the output tree into the session's result archive.
    ///
    /// Must only be called after every requested conversion has completed.
    pub fn pack(&self) -> Result<PackedArchive> {
        let tree = self.output_dir.join(ARCHIVE_DIR);
        let archive_path = self.output_dir.join(&self.output_file_name);

        fs::create_dir_all(&self.output_dir)?;
        archive::write_zip(&tree, &archive_path)?;
        info!(id = %self.id, archive = %self.output_file_name, "result packed");

        Ok(PackedArchive {
            path: archive_path,
            file_name: self.output_file_name.clone(),
        })
    }

    /// Remove the session's entire working directory.
    ///
    /// Safe to call after partial failure; a root that is already gone is
    /// not an error.
    pub fn dispose(self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        debug!(id = %self.id, "session disposed");
        Ok(())
    }

    /// Remove every session directory left under the files root.
    ///
    /// Sessions are not tracked across restarts; this runs once at process
    /// startup to reclaim disk from unclean shutdowns. A missing files
    /// root is a no-op.
    pub fn sweep_stale(files_root: &Path) -> Result<()> {
        if !files_root.exists() {
            return Ok(());
        }

        let mut removed = 0usize;
        for entry in fs::read_dir(files_root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "swept stale session directories");
        }
        Ok(())
    }
}

/// Correct the incoming file name: a spurious `.gif.mp4` suffix collapses
/// to `.gif`, and the final extension is lowercased.
fn normalize_file_name(file_name: &str) -> String {
    let lower = file_name.to_ascii_lowercase();
    let corrected = if lower.ends_with(".gif.mp4") {
        format!("{}.gif", &file_name[..file_name.len() - ".gif.mp4".len()])
    } else {
        file_name.to_string()
    };

    match corrected.rfind('.') {
        Some(i) => format!("{}{}", &corrected[..i], corrected[i..].to_ascii_lowercase()),
        None => corrected,
    }
}

/// Replace a file name's extension.
fn set_extension(file_name: &str, extension: &str) -> String {
    match file_name.rfind('.') {
        Some(i) => format!("{}.{}", &file_name[..i], extension),
        None => format!("{}.{}", file_name, extension),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push("_");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_file_name_strips_gif_mp4_suffix() {
        assert_eq!(normalize_file_name("clip.gif.mp4"), "clip.gif");
        assert_eq!(normalize_file_name("CLIP.GIF.MP4"), "CLIP.gif");
        assert_eq!(normalize_file_name("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn test_normalize_file_name_lowercases_extension() {
        assert_eq!(normalize_file_name("PIC.PNG"), "PIC.png");
        assert_eq!(normalize_file_name("pack.ZIP"), "pack.zip");
        assert_eq!(normalize_file_name("plain"), "plain");
    }

    #[test]
    fn test_set_extension() {
        assert_eq!(set_extension("clip.gif", "zip"), "clip.zip");
        assert_eq!(set_extension("a.b.c", "zip"), "a.b.zip");
        assert_eq!(set_extension("plain", "zip"), "plain.zip");
    }

    #[test]
    fn test_temp_sibling() {
        assert_eq!(
            temp_sibling(Path::new("/out/clip.webm")),
            Path::new("/out/clip.webm_")
        );
    }
}

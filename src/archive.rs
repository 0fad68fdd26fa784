//! Zip extraction and creation.

use crate::Result;
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// Extract a zip archive into `dest`, preserving relative paths.
///
/// Entries whose names escape the destination are skipped.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    std::fs::create_dir_all(dest)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let rel_path = match entry.enclosed_name() {
            Some(p) => p,
            None => continue,
        };
        let dest_path = dest.join(rel_path);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&dest_path)?;
            io::copy(&mut entry, &mut out)?;
        }
    }

    Ok(())
}

/// Pack every file under `tree` into a zip at `archive_path`, preserving
/// relative paths.
///
/// A missing or empty tree produces a valid archive with zero entries.
pub fn write_zip(tree: &Path, archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    if tree.exists() {
        for entry in WalkDir::new(tree).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel_path = match entry.path().strip_prefix(tree) {
                Ok(p) => p,
                Err(_) => continue,
            };
            // Zip entry names use forward slashes regardless of platform.
            let name = rel_path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            zip.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            io::copy(&mut input, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pack_and_extract_preserves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("tree");
        std::fs::create_dir_all(tree.join("nested/deeper")).unwrap();
        std::fs::write(tree.join("top.txt"), b"top").unwrap();
        std::fs::write(tree.join("nested/deeper/leaf.txt"), b"leaf").unwrap();

        let archive_path = dir.path().join("out.zip");
        write_zip(&tree, &archive_path).unwrap();

        let dest = dir.path().join("extracted");
        extract_zip(&archive_path, &dest).unwrap();

        assert_eq!(std::fs::read(dest.join("top.txt")).unwrap(), b"top");
        assert_eq!(
            std::fs::read(dest.join("nested/deeper/leaf.txt")).unwrap(),
            b"leaf"
        );
    }

    #[test]
    fn test_missing_tree_packs_to_empty_archive() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("empty.zip");
        write_zip(&dir.path().join("does-not-exist"), &archive_path).unwrap();

        let file = File::open(&archive_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 0);
    }
}

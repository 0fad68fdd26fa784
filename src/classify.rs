//! File classification by extension.
//!
//! Three disjoint closed extension sets drive the pipeline: static media
//! (single-frame), dynamic media (video/animated), and archives. A file is
//! convertible when it is media of either kind, and allowed for ingestion
//! when it is media or an archive. A file with no recognized extension is
//! neither.

use std::path::Path;

/// Extensions classified as static (single-frame) media.
pub const STATIC_MEDIA_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Extensions classified as dynamic (video/animated) media.
pub const DYNAMIC_MEDIA_EXTENSIONS: &[&str] = &["gif", "mp4", "webm"];

/// Extensions classified as archives.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];

/// Whether a media file is single-frame or has a timeline.
///
/// Resolved once per file at classification time and carried through the
/// conversion plan; it selects which template spec applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Single-frame media (png, jpg).
    Static,
    /// Video or animated media (gif, mp4, webm).
    Dynamic,
}

/// Get a path's extension, lowercased.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Classify a path as static or dynamic media, or neither.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = extension_of(path)?;
    if STATIC_MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Static)
    } else if DYNAMIC_MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Dynamic)
    } else {
        None
    }
}

/// Check if a path is convertible media (static or dynamic).
pub fn is_media_file(path: &Path) -> bool {
    media_kind(path).is_some()
}

/// Check if a path is an archive.
pub fn is_archive_file(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a path is allowed for ingestion (media or archive).
pub fn is_allowed_file(path: &Path) -> bool {
    is_media_file(path) || is_archive_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind(Path::new("a.png")), Some(MediaKind::Static));
        assert_eq!(media_kind(Path::new("a.jpg")), Some(MediaKind::Static));
        assert_eq!(media_kind(Path::new("a.gif")), Some(MediaKind::Dynamic));
        assert_eq!(media_kind(Path::new("a.mp4")), Some(MediaKind::Dynamic));
        assert_eq!(media_kind(Path::new("a.webm")), Some(MediaKind::Dynamic));
        assert_eq!(media_kind(Path::new("a.zip")), None);
        assert_eq!(media_kind(Path::new("a.txt")), None);
        assert_eq!(media_kind(Path::new("no_extension")), None);
    }

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("sticker.png")));
        assert!(is_media_file(Path::new("clip.mp4")));

        // Case insensitive
        assert!(is_media_file(Path::new("sticker.PNG")));
        assert!(is_media_file(Path::new("clip.Mp4")));

        // With paths
        assert!(is_media_file(Path::new("/path/to/clip.gif")));
        assert!(is_media_file(Path::new("relative/path/clip.webm")));

        // Not media files
        assert!(!is_media_file(Path::new("bundle.zip")));
        assert!(!is_media_file(Path::new("document.txt")));
        assert!(!is_media_file(Path::new("no_extension")));
    }

    #[test]
    fn test_is_archive_file() {
        assert!(is_archive_file(Path::new("bundle.zip")));
        assert!(is_archive_file(Path::new("bundle.ZIP")));
        assert!(!is_archive_file(Path::new("clip.mp4")));
        assert!(!is_archive_file(Path::new("no_extension")));
    }

    #[test]
    fn test_is_allowed_file() {
        assert!(is_allowed_file(Path::new("sticker.png")));
        assert!(is_allowed_file(Path::new("sticker.jpg")));
        assert!(is_allowed_file(Path::new("clip.gif")));
        assert!(is_allowed_file(Path::new("clip.mp4")));
        assert!(is_allowed_file(Path::new("clip.webm")));
        assert!(is_allowed_file(Path::new("bundle.zip")));

        assert!(!is_allowed_file(Path::new("document.txt")));
        assert!(!is_allowed_file(Path::new("archive.tar.gz")));
        assert!(!is_allowed_file(Path::new("no_extension")));
        assert!(!is_allowed_file(Path::new("")));
    }

    #[test]
    fn test_edge_cases() {
        // Multiple dots classify by the last extension
        assert_eq!(
            media_kind(Path::new("clip.gif.mp4")),
            Some(MediaKind::Dynamic)
        );
        assert!(is_media_file(Path::new("photo.thumb.jpg")));

        // Hidden files
        assert!(is_media_file(Path::new(".hidden.png")));
    }
}

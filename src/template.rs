//! Sticker output templates.
//!
//! Read-only global configuration: each template maps to one spec for
//! static (single-frame) inputs and one for dynamic (video/animated)
//! inputs. The set of templates is closed and known at build time, so
//! lookup is infallible.

use crate::classify::MediaKind;
use clap::ValueEnum;

/// Fully defines one output target.
///
/// Immutable; never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spec {
    /// Output container format.
    pub format: &'static str,
    /// Target square resolution bound in pixels.
    pub resolution: u32,
    /// Target frame rate.
    pub fps: f64,
    /// Target duration in seconds.
    pub duration: f64,
    /// Starting-point bitrate in kbps. The compression loop derives its
    /// own bitrates from probed metadata; this is configuration only.
    pub bitrate_kbps: u32,
    /// Hard byte-size ceiling in KB.
    pub max_size_kb: u32,
}

/// A named output template with one spec per media kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    /// Display name; used to namespace output paths.
    pub name: &'static str,
    /// Spec applied to static media.
    pub static_spec: Spec,
    /// Spec applied to dynamic media.
    pub dynamic_spec: Spec,
}

impl Template {
    /// Select the spec matching a file's media kind.
    pub fn spec(&self, kind: MediaKind) -> &Spec {
        match kind {
            MediaKind::Static => &self.static_spec,
            MediaKind::Dynamic => &self.dynamic_spec,
        }
    }
}

/// The closed set of template keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TemplateKey {
    /// Telegram sticker pack (512px, 256 KB ceiling).
    TelegramSticker,
    /// Telegram custom emoji pack (100px, 64 KB ceiling).
    TelegramEmoji,
}

static TELEGRAM_STICKER: Template = Template {
    name: "Telegram Stickers",
    static_spec: Spec {
        format: "webm",
        resolution: 512,
        fps: 4.0,
        duration: 3.0,
        bitrate_kbps: 512,
        max_size_kb: 256,
    },
    dynamic_spec: Spec {
        format: "webm",
        resolution: 512,
        fps: 30.0,
        duration: 3.0,
        bitrate_kbps: 512,
        max_size_kb: 256,
    },
};

static TELEGRAM_EMOJI: Template = Template {
    name: "Telegram Emoji",
    static_spec: Spec {
        format: "webm",
        resolution: 100,
        fps: 4.0,
        duration: 3.0,
        bitrate_kbps: 128,
        max_size_kb: 64,
    },
    dynamic_spec: Spec {
        format: "webm",
        resolution: 100,
        fps: 30.0,
        duration: 3.0,
        bitrate_kbps: 128,
        max_size_kb: 64,
    },
};

impl TemplateKey {
    /// All defined templates.
    pub const ALL: [TemplateKey; 2] = [TemplateKey::TelegramSticker, TemplateKey::TelegramEmoji];

    /// Look up the template for this key.
    pub fn template(self) -> &'static Template {
        match self {
            TemplateKey::TelegramSticker => &TELEGRAM_STICKER,
            TemplateKey::TelegramEmoji => &TELEGRAM_EMOJI,
        }
    }

    /// The key's canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKey::TelegramSticker => "telegram-sticker",
            TemplateKey::TelegramEmoji => "telegram-emoji",
        }
    }
}

impl std::fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticker_template() {
        let template = TemplateKey::TelegramSticker.template();
        assert_eq!(template.name, "Telegram Stickers");

        let spec = template.spec(MediaKind::Dynamic);
        assert_eq!(spec.format, "webm");
        assert_eq!(spec.resolution, 512);
        assert_eq!(spec.fps, 30.0);
        assert_eq!(spec.duration, 3.0);
        assert_eq!(spec.max_size_kb, 256);

        // Static variant differs only in frame rate
        assert_eq!(template.spec(MediaKind::Static).fps, 4.0);
        assert_eq!(template.spec(MediaKind::Static).resolution, 512);
    }

    #[test]
    fn test_emoji_template() {
        let template = TemplateKey::TelegramEmoji.template();
        assert_eq!(template.name, "Telegram Emoji");
        assert_eq!(template.spec(MediaKind::Dynamic).resolution, 100);
        assert_eq!(template.spec(MediaKind::Dynamic).max_size_kb, 64);
        assert_eq!(template.spec(MediaKind::Static).fps, 4.0);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TemplateKey::TelegramSticker.to_string(), "telegram-sticker");
        assert_eq!(TemplateKey::TelegramEmoji.to_string(), "telegram-emoji");
    }
}

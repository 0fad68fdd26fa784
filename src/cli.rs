use clap::Parser;
use std::path::PathBuf;
use stickermill::TemplateKey;

#[derive(Parser)]
#[command(name = "stickermill")]
#[command(author, version, about = "Convert media files into sticker packs")]
pub struct Cli {
    /// Input media file or archive: a local path or an http(s) URL
    #[arg(required = true)]
    pub input: String,

    /// Templates to convert to (defaults to all)
    #[arg(short, long, value_enum)]
    pub template: Vec<TemplateKey>,

    /// Root directory for session working directories
    #[arg(long)]
    pub files_root: Option<PathBuf>,

    /// Directory to place the result archive in (defaults to the current
    /// directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

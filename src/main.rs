mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::path::Path;
use stickermill::{Config, ConversionSession, TemplateKey};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    // Fail fast on a missing transcoder or prober, before any session
    // directory is allocated.
    stickermill_av::require_tool("ffmpeg")?;
    stickermill_av::require_tool("ffprobe")?;

    let mut config = Config::from_env();
    if let Some(root) = cli.files_root {
        config.files_root = root;
    }

    // Recover disk from sessions a previous crash left behind.
    ConversionSession::sweep_stale(&config.files_root)?;

    let file_name = file_name_of(&cli.input)?;
    let session = if is_url(&cli.input) {
        ConversionSession::ingest_url(&config.files_root, &cli.input, &file_name)?
    } else {
        let bytes = std::fs::read(&cli.input)
            .with_context(|| format!("failed to read {}", cli.input))?;
        ConversionSession::ingest_bytes(&config.files_root, &file_name, &bytes)?
    };

    let templates = if cli.template.is_empty() {
        TemplateKey::ALL.to_vec()
    } else {
        cli.template
    };

    let result = run(&session, &templates, cli.out.as_deref());

    // Disposal runs on success and failure alike.
    if let Err(e) = session.dispose() {
        tracing::warn!("failed to remove session directory: {e}");
    }

    result
}

fn run(session: &ConversionSession, templates: &[TemplateKey], out: Option<&Path>) -> Result<()> {
    for key in templates {
        session.convert(*key)?;
    }

    let packed = session.pack()?;
    let dest = out.unwrap_or(Path::new(".")).join(&packed.file_name);
    std::fs::copy(&packed.path, &dest)
        .with_context(|| format!("failed to write {}", dest.display()))?;

    println!("{}", dest.display());
    Ok(())
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn file_name_of(input: &str) -> Result<String> {
    if is_url(input) {
        let path_part = input
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or(input);
        path_part
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .context("URL has no file name")
    } else {
        Path::new(input)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .context("input path has no file name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("dir/clip.gif").unwrap(), "clip.gif");
        assert_eq!(
            file_name_of("https://host/files/clip.gif?token=1").unwrap(),
            "clip.gif"
        );
        assert!(file_name_of("https://host/").is_err());
    }
}

mod cli;
mod document;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use fence_highlight::{render_markdown, CodeBlockHighlighter, SyntectEngine};
use fence_highlight_config::AppConfig;
use std::io::{self, Read, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    cli.apply(&mut config);

    if cli.list_themes || cli.list_languages {
        let engine = SyntectEngine::from_options(&config.highlight)
            .context("Failed to load syntax assets")?;
        let names = if cli.list_themes {
            engine.available_themes()
        } else {
            engine.available_languages()
        };
        let mut stdout = io::stdout().lock();
        for name in names {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    }

    let (markdown, title) = read_input(cli.input_path().map(|p| p.as_path()))?;
    log::debug!("Read {} bytes of markdown from {}", markdown.len(), title);

    let highlighter = CodeBlockHighlighter::new(config.highlight.clone())
        .context("Failed to start highlighter")?;
    let body = render_markdown(&highlighter, &markdown).context("Failed to render markdown")?;

    let output = if config.standalone {
        document::wrap(&body, &title, &config.highlight.class_names)
    } else {
        body
    };

    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}

/// Read markdown from `path`, or stdin when `None`. Also returns a display
/// name used as the document title.
fn read_input(path: Option<&Path>) -> Result<(String, String)> {
    match path {
        Some(path) => {
            let markdown = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((markdown, title))
        }
        None => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("Failed to read stdin")?;
            Ok((markdown, "stdin".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes\n").unwrap();

        let (markdown, title) = read_input(Some(&path)).unwrap();
        assert_eq!(markdown, "# Notes\n");
        assert_eq!(title, "notes");
    }

    #[test]
    fn test_read_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.md"))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }
}

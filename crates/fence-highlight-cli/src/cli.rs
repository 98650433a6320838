//! Command line arguments

use clap::Parser;
use fence_highlight::ThemeSpec;
use fence_highlight_config::AppConfig;
use std::path::PathBuf;

/// Render markdown to HTML with highlighted, diff-annotated code fences.
#[derive(Debug, Parser)]
#[command(name = "fence-highlight", version, about)]
pub struct Cli {
    /// Markdown file to render; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Config file to use instead of the discovered one
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Single theme for all code blocks
    #[arg(short, long, conflicts_with_all = ["dark", "light"])]
    pub theme: Option<String>,

    /// Dark theme of a dual-theme pair
    #[arg(long, requires = "light")]
    pub dark: Option<String>,

    /// Light theme of a dual-theme pair
    #[arg(long, requires = "dark")]
    pub light: Option<String>,

    /// Wrap the output in a complete HTML document
    #[arg(long)]
    pub standalone: bool,

    /// Print the available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Print the available languages and exit
    #[arg(long)]
    pub list_languages: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Theme selection given on the command line, if any.
    pub fn theme_override(&self) -> Option<ThemeSpec> {
        match (&self.theme, &self.dark, &self.light) {
            (Some(theme), _, _) => Some(ThemeSpec::Single(theme.clone())),
            (None, Some(dark), Some(light)) => Some(ThemeSpec::Dual {
                dark: dark.clone(),
                light: light.clone(),
            }),
            _ => None,
        }
    }

    /// Apply command line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(theme) = self.theme_override() {
            log::debug!("Theme overridden on command line: {:?}", theme);
            config.highlight.theme = theme;
        }
        if self.standalone {
            config.standalone = true;
        }
    }

    /// Input path, `None` meaning stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

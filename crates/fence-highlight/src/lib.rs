//! # fence-highlight
//!
//! Syntax highlighting for markdown code fences, with line highlighting
//! and diff annotations.
//!
//! A fence like
//!
//! ````markdown
//! ```rust {2}
//! let a = 1;
//! let b = 2; // [!code --]
//! let b = 3; // [!code ++]
//! ```
//! ````
//!
//! is rendered with line 2 carrying the highlighted-line classes and the
//! diff markers stripped from the code and turned into line classes.
//!
//! ## Architecture
//!
//! - [`fence_lines`] builds and merges the per-line class lists
//! - [`CodeBlockHighlighter`] runs one block through scanning, merging,
//!   rendering and class post-processing
//! - a [`HighlightEngine`] does the coloring; [`SyntectEngine`] is the
//!   default, hosted on a [`HighlightWorker`] thread
//! - [`render_markdown`] plugs the highlighter into pulldown-cmark
//!
//! ## Themes
//!
//! With [`ThemeSpec::Dual`] every block is rendered twice, once per theme,
//! and both renderings are wrapped in one container element so a stylesheet
//! can show whichever matches the reader's color scheme.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fence_highlight::{render_markdown, CodeBlockHighlighter, HighlightOptions, ThemeSpec};
//!
//! let options = HighlightOptions::default().with_theme(ThemeSpec::Dual {
//!     dark: "base16-ocean.dark".into(),
//!     light: "InspiredGitHub".into(),
//! });
//! let highlighter = CodeBlockHighlighter::new(options)?;
//!
//! let html = render_markdown(&highlighter, "```js {1}\nconst x = 1\n```\n")?;
//! # Ok::<(), fence_highlight::HighlightError>(())
//! ```

pub mod engine;
pub mod error;
pub mod highlighter;
pub mod markdown;
pub mod options;
pub mod worker;

// Re-export commonly used types
pub use engine::{HighlightEngine, RenderRequest, SyntectEngine};
pub use error::HighlightError;
pub use fence_lines;
pub use highlighter::CodeBlockHighlighter;
pub use markdown::{render_markdown, split_info_string};
pub use options::{
    ClassList, ClassNameConfig, ClassRole, HighlightOptions, ModeClasses, ThemeMode, ThemeSpec,
};
pub use worker::{EngineFactory, HighlightWorker};

//! Highlighting engine seam.
//!
//! The orchestrator never colors code itself; it hands marker-stripped code
//! plus the merged line tags to a [`HighlightEngine`] and post-processes the
//! markup that comes back.

mod syntect_engine;

pub use syntect_engine::SyntectEngine;

use crate::error::HighlightError;
use fence_lines::LineTagList;

/// Class every engine puts first on its `<pre>` element.
///
/// Output must start with `<pre class="highlight` and contain a bare
/// `<code>` tag; the orchestrator rewrites both.
pub const PRE_CLASS: &str = "highlight";

/// One rendering of one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub code: String,
    pub lang: String,
    pub theme: String,
    pub line_tags: LineTagList,
}

/// A syntax highlighter that renders code to HTML.
///
/// Languages and themes are loaded on demand; [`render`] loads whatever a
/// request needs before rendering.
pub trait HighlightEngine: Send {
    /// Make `lang` available for rendering.
    fn load_language(&mut self, lang: &str) -> Result<(), HighlightError>;

    /// Make `theme` available for rendering.
    fn load_theme(&mut self, theme: &str) -> Result<(), HighlightError>;

    fn is_language_loaded(&self, lang: &str) -> bool;

    fn is_theme_loaded(&self, theme: &str) -> bool;

    /// Names of all loaded languages.
    fn loaded_languages(&self) -> Vec<String>;

    /// Names of all loaded themes.
    fn loaded_themes(&self) -> Vec<String>;

    /// Render `code` as `<pre class="highlight" ...><code>...</code></pre>`,
    /// one `<span class="line ...">` per line carrying the line's tag classes.
    fn code_to_html(
        &self,
        code: &str,
        lang: &str,
        theme: &str,
        line_tags: &LineTagList,
    ) -> Result<String, HighlightError>;
}

/// Load the language and theme of a request if the engine does not have them yet.
pub fn ensure_loaded(
    engine: &mut dyn HighlightEngine,
    lang: &str,
    theme: &str,
) -> Result<(), HighlightError> {
    if !engine.is_language_loaded(lang) {
        log::debug!("Loading language '{}'", lang);
        engine.load_language(lang)?;
    }

    if !engine.is_theme_loaded(theme) {
        log::debug!("Loading theme '{}'", theme);
        engine.load_theme(theme)?;
    }

    Ok(())
}

/// Load what `request` needs and render it.
pub fn render(
    engine: &mut dyn HighlightEngine,
    request: &RenderRequest,
) -> Result<String, HighlightError> {
    ensure_loaded(engine, &request.lang, &request.theme)?;
    engine.code_to_html(
        &request.code,
        &request.lang,
        &request.theme,
        &request.line_tags,
    )
}

/// Load a list of languages and themes up front.
pub fn preload(
    engine: &mut dyn HighlightEngine,
    langs: &[String],
    themes: &[String],
) -> Result<(), HighlightError> {
    for lang in langs {
        if !engine.is_language_loaded(lang) {
            engine.load_language(lang)?;
        }
    }

    for theme in themes {
        if !engine.is_theme_loaded(theme) {
            engine.load_theme(theme)?;
        }
    }

    Ok(())
}

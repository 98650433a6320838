//! Highlighting engine backed by syntect.

use super::{HighlightEngine, PRE_CLASS};
use crate::error::HighlightError;
use crate::options::HighlightOptions;
use fence_lines::LineTagList;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Style, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Renders code blocks to HTML with syntect grammars and themes.
///
/// The syntax and theme sets are the catalog; a language or theme becomes
/// usable once it has been resolved against the catalog and loaded.
pub struct SyntectEngine {
    /// All known grammars.
    syntax_set: SyntaxSet,
    /// All known themes, by name.
    theme_catalog: ThemeSet,
    /// Loaded languages: requested name -> index into `syntax_set`.
    languages: HashMap<String, usize>,
    /// Loaded themes, by requested name.
    themes: BTreeMap<String, Theme>,
}

impl std::fmt::Debug for SyntectEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntectEngine")
            .field("syntaxes", &self.syntax_set.syntaxes().len())
            .field("loaded_languages", &self.languages.len())
            .field("loaded_themes", &self.themes.len())
            .finish()
    }
}

impl Default for SyntectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectEngine {
    /// Create an engine with syntect's bundled grammars and themes.
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_catalog: ThemeSet::load_defaults(),
            languages: HashMap::new(),
            themes: BTreeMap::new(),
        }
    }

    /// Create an engine with the bundled assets plus extra folders.
    pub fn with_folders(
        syntax_dirs: &[PathBuf],
        theme_dirs: &[PathBuf],
    ) -> Result<Self, HighlightError> {
        let syntax_set = if syntax_dirs.is_empty() {
            SyntaxSet::load_defaults_newlines()
        } else {
            let mut builder = SyntaxSet::load_defaults_newlines().into_builder();
            for dir in syntax_dirs {
                log::debug!("Loading syntaxes from {}", dir.display());
                builder.add_from_folder(dir, true).map_err(|e| {
                    HighlightError::Assets(format!("{}: {}", dir.display(), e))
                })?;
            }
            builder.build()
        };

        let mut theme_catalog = ThemeSet::load_defaults();
        for dir in theme_dirs {
            log::debug!("Loading themes from {}", dir.display());
            theme_catalog
                .add_from_folder(dir)
                .map_err(|e| HighlightError::Assets(format!("{}: {}", dir.display(), e)))?;
        }

        Ok(Self {
            syntax_set,
            theme_catalog,
            languages: HashMap::new(),
            themes: BTreeMap::new(),
        })
    }

    /// Create an engine for the asset folders named in `options`.
    pub fn from_options(options: &HighlightOptions) -> Result<Self, HighlightError> {
        Self::with_folders(&options.syntax_dirs, &options.theme_dirs)
    }

    /// Names of all themes in the catalog.
    pub fn available_themes(&self) -> Vec<String> {
        self.theme_catalog.themes.keys().cloned().collect()
    }

    /// Names of all grammars in the catalog.
    pub fn available_languages(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .syntax_set
            .syntaxes()
            .iter()
            .map(|syntax| syntax.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Find the grammar for a fence language tag.
    fn resolve_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.trim();
        if lang.is_empty() {
            return None;
        }

        let lower = lang.to_ascii_lowercase();
        if matches!(lower.as_str(), "text" | "txt" | "plain" | "plaintext") {
            return Some(self.syntax_set.find_syntax_plain_text());
        }

        self.find_syntax(lang).or_else(|| {
            language_aliases(&lower)
                .iter()
                .find_map(|candidate| self.find_syntax(candidate))
        })
    }

    fn find_syntax(&self, candidate: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_name(candidate)
            .or_else(|| self.syntax_set.find_syntax_by_extension(candidate))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.eq_ignore_ascii_case(candidate))
            })
            .or_else(|| {
                self.syntax_set.syntaxes().iter().find(|syntax| {
                    syntax
                        .file_extensions
                        .iter()
                        .any(|ext| ext.eq_ignore_ascii_case(candidate))
                })
            })
    }

    fn syntax_for(&self, lang: &str) -> Result<&SyntaxReference, HighlightError> {
        self.languages
            .get(&language_key(lang))
            .and_then(|idx| self.syntax_set.syntaxes().get(*idx))
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))
    }
}

impl HighlightEngine for SyntectEngine {
    fn load_language(&mut self, lang: &str) -> Result<(), HighlightError> {
        let syntax = self
            .resolve_syntax(lang)
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

        let idx = self
            .syntax_set
            .syntaxes()
            .iter()
            .position(|s| s.name == syntax.name)
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

        log::debug!(
            "Language '{}' resolved to '{}'",
            lang,
            self.syntax_set.syntaxes()[idx].name
        );
        self.languages.insert(language_key(lang), idx);
        Ok(())
    }

    fn load_theme(&mut self, theme: &str) -> Result<(), HighlightError> {
        let loaded = match self.theme_catalog.themes.get(theme) {
            Some(found) => found.clone(),
            None if theme.ends_with(".tmTheme") => ThemeSet::get_theme(Path::new(theme))
                .map_err(|e| HighlightError::UnknownTheme(format!("{}: {}", theme, e)))?,
            None => return Err(HighlightError::UnknownTheme(theme.to_string())),
        };

        self.themes.insert(theme.to_string(), loaded);
        Ok(())
    }

    fn is_language_loaded(&self, lang: &str) -> bool {
        self.languages.contains_key(&language_key(lang))
    }

    fn is_theme_loaded(&self, theme: &str) -> bool {
        self.themes.contains_key(theme)
    }

    fn loaded_languages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.languages.keys().cloned().collect();
        names.sort();
        names
    }

    fn loaded_themes(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }

    fn code_to_html(
        &self,
        code: &str,
        lang: &str,
        theme: &str,
        line_tags: &LineTagList,
    ) -> Result<String, HighlightError> {
        let syntax = self.syntax_for(lang)?;
        let theme_def = self
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::UnknownTheme(theme.to_string()))?;

        let background = theme_def.settings.background.unwrap_or(Color::WHITE);
        let mut html = format!(
            "<pre class=\"{}\" style=\"background-color: {}\"><code>",
            PRE_CLASS,
            css_color(background)
        );

        let mut highlighter = HighlightLines::new(syntax, theme_def);
        let body = code.strip_suffix('\n').unwrap_or(code);

        for (idx, line) in body.split('\n').enumerate() {
            if idx > 0 {
                html.push('\n');
            }

            // grammars are loaded in newline mode and expect the terminator
            let source = format!("{}\n", line.strip_suffix('\r').unwrap_or(line));
            let regions = highlighter
                .highlight_line(&source, &self.syntax_set)
                .map_err(|e| HighlightError::Render(e.to_string()))?;
            let regions: Vec<(Style, &str)> = regions
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches('\n')))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            let spans = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                .map_err(|e| HighlightError::Render(e.to_string()))?;

            html.push_str("<span class=\"line");
            if let Some(classes) = line_tags.classes_for(idx as u32 + 1) {
                for class in classes {
                    html.push(' ');
                    html.push_str(class);
                }
            }
            html.push_str("\">");
            html.push_str(&spans);
            html.push_str("</span>");
        }

        html.push_str("</code></pre>");
        Ok(html)
    }
}

fn language_key(lang: &str) -> String {
    lang.trim().to_ascii_lowercase()
}

/// Grammar names to try when a fence tag matches nothing directly.
fn language_aliases(lower: &str) -> &'static [&'static str] {
    match lower {
        "shell" | "zsh" | "console" | "shellscript" => &["Bourne Again Shell (bash)", "sh"],
        "ts" | "typescript" | "tsx" | "jsx" | "mjs" | "cjs" => &["JavaScript", "js"],
        "c#" | "csharp" | "cs" => &["C#"],
        "c++" | "cpp" => &["C++"],
        "objc" | "objectivec" => &["Objective-C"],
        "make" | "makefile" => &["Makefile"],
        "latex" => &["LaTeX"],
        "py" | "python3" => &["Python"],
        "golang" => &["Go"],
        "yml" => &["YAML"],
        _ => &[],
    }
}

fn css_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render;
    use crate::engine::RenderRequest;
    use fence_lines::LineTag;

    fn request(code: &str, lang: &str, line_tags: LineTagList) -> RenderRequest {
        RenderRequest {
            code: code.to_string(),
            lang: lang.to_string(),
            theme: "base16-ocean.dark".to_string(),
            line_tags,
        }
    }

    #[test]
    fn test_render_rust_code() {
        let mut engine = SyntectEngine::new();
        let html = render(
            &mut engine,
            &request("fn main() {}\n", "rust", LineTagList::new()),
        )
        .unwrap();

        assert!(html.starts_with("<pre class=\"highlight\" style=\"background-color: #"));
        assert!(html.contains("<code><span class=\"line\">"));
        assert!(html.ends_with("</span></code></pre>"));
        assert!(html.contains("main"));
        // trailing newline does not produce an extra line
        assert_eq!(html.matches("<span class=\"line").count(), 1);
    }

    #[test]
    fn test_line_tags_become_line_classes() {
        let mut engine = SyntectEngine::new();
        let tags = LineTagList::from_tags([
            LineTag::new(2, vec!["highlighted".to_string()]),
            LineTag::new(3, vec!["diff remove".to_string(), "x".to_string()]),
        ]);
        let code = "let a = 1;\nlet b = 2;\nlet c = 3;";
        let html = render(&mut engine, &request(code, "rs", tags)).unwrap();

        let lines: Vec<&str> = html.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("<span class=\"line\">"));
        assert!(lines[1].starts_with("<span class=\"line highlighted\">"));
        assert!(lines[2].starts_with("<span class=\"line diff remove x\">"));
    }

    #[test]
    fn test_html_is_escaped() {
        let mut engine = SyntectEngine::new();
        let html = render(
            &mut engine,
            &request("<div>&</div>", "text", LineTagList::new()),
        )
        .unwrap();

        assert!(html.contains("&lt;div&gt;&amp;&lt;/div&gt;"));
        assert!(!html.contains("<div>"));
    }

    #[test]
    fn test_languages_load_on_demand() {
        let mut engine = SyntectEngine::new();
        assert!(engine.loaded_languages().is_empty());

        render(&mut engine, &request("x = 1", "Python", LineTagList::new())).unwrap();
        assert!(engine.is_language_loaded("python"));
        assert_eq!(engine.loaded_themes(), vec!["base16-ocean.dark".to_string()]);
    }

    #[test]
    fn test_aliases_resolve() {
        let mut engine = SyntectEngine::new();
        assert!(engine.load_language("js").is_ok());
        assert!(engine.load_language("javascript").is_ok());
        assert!(engine.load_language("typescript").is_ok());
        assert!(engine.load_language("shell").is_ok());
        assert!(engine.load_language("plaintext").is_ok());
    }

    #[test]
    fn test_unknown_language_and_theme() {
        let mut engine = SyntectEngine::new();

        assert_eq!(
            engine.load_language("definitely-not-a-language"),
            Err(HighlightError::UnknownLanguage(
                "definitely-not-a-language".to_string()
            ))
        );
        assert_eq!(
            engine.load_theme("no-such-theme"),
            Err(HighlightError::UnknownTheme("no-such-theme".to_string()))
        );
    }

    #[test]
    fn test_code_to_html_requires_loaded_assets() {
        let engine = SyntectEngine::new();
        let result = engine.code_to_html("x", "rust", "base16-ocean.dark", &LineTagList::new());
        assert_eq!(result, Err(HighlightError::UnknownLanguage("rust".to_string())));
    }

    #[test]
    fn test_available_catalog() {
        let engine = SyntectEngine::new();
        assert!(engine.available_themes().contains(&"InspiredGitHub".to_string()));
        assert!(engine.available_languages().contains(&"Rust".to_string()));
    }

    #[test]
    fn test_missing_asset_folder_fails() {
        let result = SyntectEngine::with_folders(&[], &[PathBuf::from("/nonexistent/themes")]);
        assert!(matches!(result, Err(HighlightError::Assets(_))));
    }
}

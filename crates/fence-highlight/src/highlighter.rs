//! Code block orchestration: line tags in, decorated HTML out.

use crate::engine::{self, HighlightEngine, RenderRequest, SyntectEngine, PRE_CLASS};
use crate::error::HighlightError;
use crate::options::{ClassNameConfig, ClassRole, HighlightOptions, ThemeMode, ThemeSpec};
use crate::worker::HighlightWorker;
use fence_lines::{
    extract_range_expression, line_tags_from_ranges, scan_diff_markers, DiffScan, LineTagList,
};
use std::sync::Mutex;

/// Where rendering requests go.
enum Backend {
    /// Default: the engine lives on a worker thread.
    Worker(HighlightWorker),
    /// Caller-supplied engine, called directly.
    Direct(Mutex<Box<dyn HighlightEngine>>),
}

impl Backend {
    fn render(&self, request: RenderRequest) -> Result<String, HighlightError> {
        match self {
            Backend::Worker(worker) => worker.render(request),
            Backend::Direct(engine) => {
                let mut engine = engine.lock().map_err(|_| {
                    HighlightError::WorkerUnavailable("highlight engine lock poisoned".to_string())
                })?;
                engine::render(&mut **engine, &request)
            }
        }
    }
}

/// Renders fenced code blocks to themed, line-decorated HTML.
///
/// `highlight` is synchronous; with the default backend the call blocks
/// until the worker thread has rendered the block.
///
/// # Example
///
/// ```no_run
/// use fence_highlight::{CodeBlockHighlighter, HighlightOptions};
///
/// let highlighter = CodeBlockHighlighter::new(HighlightOptions::default())?;
/// let html = highlighter.highlight("let x = 1; // [!code ++]\n", "rust", "{1}")?;
/// assert!(html.contains("diff add"));
/// # Ok::<(), fence_highlight::HighlightError>(())
/// ```
pub struct CodeBlockHighlighter {
    options: HighlightOptions,
    backend: Backend,
}

impl std::fmt::Debug for CodeBlockHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::Worker(_) => "worker",
            Backend::Direct(_) => "direct",
        };
        f.debug_struct("CodeBlockHighlighter")
            .field("options", &self.options)
            .field("backend", &backend)
            .finish()
    }
}

impl CodeBlockHighlighter {
    /// Create a highlighter backed by a [`SyntectEngine`] on a worker thread.
    ///
    /// The configured themes and `langs` are loaded right away, so a
    /// misspelled theme fails here rather than on the first block.
    pub fn new(options: HighlightOptions) -> Result<Self, HighlightError> {
        let engine_options = options.clone();
        let worker = HighlightWorker::spawn(Box::new(move || {
            let engine = SyntectEngine::from_options(&engine_options)?;
            Ok(Box::new(engine) as Box<dyn HighlightEngine>)
        }))?;

        worker.preload(options.langs.clone(), options.theme.names())?;

        Ok(Self {
            options,
            backend: Backend::Worker(worker),
        })
    }

    /// Create a highlighter that calls `engine` directly instead of
    /// spawning a worker.
    pub fn with_engine(options: HighlightOptions, engine: impl HighlightEngine + 'static) -> Self {
        Self {
            options,
            backend: Backend::Direct(Mutex::new(Box::new(engine))),
        }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Render one fenced code block.
    ///
    /// `attrs` is the rest of the fence info string after the language; a
    /// `{...}` range expression in it selects lines to highlight.
    pub fn highlight(
        &self,
        code: &str,
        lang: &str,
        attrs: &str,
    ) -> Result<String, HighlightError> {
        let lang = match lang.trim() {
            "" => self.options.default_language.as_str(),
            lang => lang,
        };

        let ranges = extract_range_expression(attrs);
        let scan = scan_diff_markers(code, self.options.diff_scan);
        let class_names = &self.options.class_names;

        match &self.options.theme {
            ThemeSpec::Single(theme) => {
                let html = self.render(&scan, lang, theme, ranges, ThemeMode::Single)?;
                Ok(decorate_single(html, lang, &class_names.classname.joined()))
            }
            ThemeSpec::Dual { dark, light } => {
                let mut inner = String::new();
                for (mode, theme) in [(ThemeMode::Dark, dark), (ThemeMode::Light, light)] {
                    let html = self.render(&scan, lang, theme, ranges, mode)?;
                    inner.push_str(&replace_pre_class(&html, &dual_pre_classes(class_names, mode)));
                }

                Ok(format!(
                    "<div class=\"{} language-{}\">{}</div>",
                    class_names.container_classname.joined(),
                    escape_attr(lang),
                    inner
                ))
            }
        }
    }

    /// Merged line tags for one rendering: range tags first, then diff tags.
    pub fn line_tags(
        &self,
        ranges: Option<&str>,
        scan: &DiffScan,
        mode: ThemeMode,
    ) -> LineTagList {
        let names = &self.options.class_names;

        let highlighted = ranges
            .map(|expression| {
                line_tags_from_ranges(
                    expression,
                    names.classes(ClassRole::HighlightedLine, mode).labels(),
                    scan.line_count(),
                )
            })
            .unwrap_or_default();

        let diff = scan.tags(
            names.classes(ClassRole::DiffRemove, mode).labels(),
            names.classes(ClassRole::DiffAdd, mode).labels(),
        );

        highlighted.merge(diff)
    }

    fn render(
        &self,
        scan: &DiffScan,
        lang: &str,
        theme: &str,
        ranges: Option<&str>,
        mode: ThemeMode,
    ) -> Result<String, HighlightError> {
        let line_tags = self.line_tags(ranges, scan, mode);
        log::debug!(
            "Highlighting {} block ({:?}, {} tagged line(s))",
            lang,
            mode,
            line_tags.len()
        );

        self.backend.render(RenderRequest {
            code: scan.code.clone(),
            lang: lang.to_string(),
            theme: theme.to_string(),
            line_tags,
        })
    }
}

fn decorate_single(html: String, lang: &str, classname: &str) -> String {
    let html = html.replacen(
        "<code>",
        &format!("<code class=\"language-{}\">", escape_attr(lang)),
        1,
    );

    if classname == PRE_CLASS {
        html
    } else {
        replace_pre_class(&html, classname)
    }
}

/// Shared `<pre>` classes plus the mode's own, unless the mode has none of
/// its own and falls back to the shared ones.
fn dual_pre_classes(class_names: &ClassNameConfig, mode: ThemeMode) -> String {
    let shared = &class_names.classname;
    let mode_classes = class_names.classes(ClassRole::Container, mode);

    if mode_classes == shared {
        shared.joined()
    } else {
        format!("{} {}", shared.joined(), mode_classes.joined())
    }
}

fn replace_pre_class(html: &str, classes: &str) -> String {
    html.replacen(
        &format!("<pre class=\"{}", PRE_CLASS),
        &format!("<pre class=\"{}", classes),
        1,
    )
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::options::{ClassList, ModeClasses};
    use fence_lines::DiffScanMode;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    /// Deterministic engine: one `<span class="line ...">` per line, no colors.
    #[derive(Default)]
    pub(crate) struct PlainEngine {
        languages: BTreeSet<String>,
        themes: BTreeSet<String>,
    }

    impl HighlightEngine for PlainEngine {
        fn load_language(&mut self, lang: &str) -> Result<(), HighlightError> {
            if lang == "unknown" {
                return Err(HighlightError::UnknownLanguage(lang.to_string()));
            }
            self.languages.insert(lang.to_string());
            Ok(())
        }

        fn load_theme(&mut self, theme: &str) -> Result<(), HighlightError> {
            self.themes.insert(theme.to_string());
            Ok(())
        }

        fn is_language_loaded(&self, lang: &str) -> bool {
            self.languages.contains(lang)
        }

        fn is_theme_loaded(&self, theme: &str) -> bool {
            self.themes.contains(theme)
        }

        fn loaded_languages(&self) -> Vec<String> {
            self.languages.iter().cloned().collect()
        }

        fn loaded_themes(&self) -> Vec<String> {
            self.themes.iter().cloned().collect()
        }

        fn code_to_html(
            &self,
            code: &str,
            _lang: &str,
            theme: &str,
            line_tags: &LineTagList,
        ) -> Result<String, HighlightError> {
            let lines: Vec<String> = code
                .strip_suffix('\n')
                .unwrap_or(code)
                .split('\n')
                .enumerate()
                .map(|(idx, line)| {
                    let mut classes = vec!["line".to_string()];
                    if let Some(extra) = line_tags.classes_for(idx as u32 + 1) {
                        classes.extend(extra.iter().cloned());
                    }
                    format!("<span class=\"{}\">{}</span>", classes.join(" "), line)
                })
                .collect();

            Ok(format!(
                "<pre class=\"highlight\" data-theme=\"{}\"><code>{}</code></pre>",
                theme,
                lines.join("\n")
            ))
        }
    }

    fn single() -> CodeBlockHighlighter {
        CodeBlockHighlighter::with_engine(HighlightOptions::default(), PlainEngine::default())
    }

    fn dual() -> CodeBlockHighlighter {
        let options = HighlightOptions::default().with_theme(ThemeSpec::Dual {
            dark: "X".to_string(),
            light: "Y".to_string(),
        });
        CodeBlockHighlighter::with_engine(options, PlainEngine::default())
    }

    #[test]
    fn test_single_theme_output() {
        let html = single().highlight("let a = 1;\nlet b = 2;\n", "rust", "{2}").unwrap();

        assert_eq!(
            html,
            "<pre class=\"highlight\" data-theme=\"base16-ocean.dark\">\
             <code class=\"language-rust\"><span class=\"line\">let a = 1;</span>\n\
             <span class=\"line highlighted\">let b = 2;</span></code></pre>"
        );
    }

    #[test]
    fn test_removal_marker_is_stripped_and_classed() {
        let html = single()
            .highlight("keep();\ndrop(); // [!code --]\n", "js", "")
            .unwrap();

        assert!(!html.contains("[!code"));
        assert!(html.contains("<span class=\"line diff remove\">drop(); </span>"));
    }

    #[test]
    fn test_addition_only_block() {
        let html = single()
            .highlight("a // [!code ++]\nb // [!code ++]", "js", "")
            .unwrap();

        assert_eq!(html.matches("line diff add").count(), 2);
        assert!(!html.contains("remove"));
    }

    #[test]
    fn test_exclusive_scan_never_mixes_add_and_remove() {
        let html = single()
            .highlight("a // [!code --]\nb // [!code ++]", "js", "")
            .unwrap();

        assert!(html.contains("line diff remove"));
        assert!(!html.contains("diff add"));
    }

    #[test]
    fn test_independent_scan_tags_both() {
        let options = HighlightOptions::default().with_diff_scan(DiffScanMode::Independent);
        let highlighter = CodeBlockHighlighter::with_engine(options, PlainEngine::default());
        let html = highlighter
            .highlight("a // [!code --]\nb // [!code ++]", "js", "")
            .unwrap();

        assert!(html.contains("<span class=\"line diff remove\">a </span>"));
        assert!(html.contains("<span class=\"line diff add\">b </span>"));
    }

    #[test]
    fn test_range_and_diff_classes_merge_on_same_line() {
        let html = single()
            .highlight("a\nb // [!code --]\nc", "js", "{1-2}")
            .unwrap();

        assert!(html.contains("<span class=\"line highlighted\">a</span>"));
        assert!(html.contains("<span class=\"line highlighted diff remove\">b </span>"));
        assert!(html.contains("<span class=\"line\">c</span>"));
    }

    #[test]
    fn test_dual_theme_output() {
        let html = dual().highlight("const x = 1", "javascript", "").unwrap();

        assert!(html.starts_with("<div class=\"highlight-container language-javascript\">"));
        assert!(html.ends_with("</div>"));
        assert_eq!(html.matches("<pre ").count(), 2);
        assert!(html.contains("<pre class=\"highlight highlight-dark\" data-theme=\"X\">"));
        assert!(html.contains("<pre class=\"highlight highlight-light\" data-theme=\"Y\">"));
        // language sits on the wrapper only
        assert!(!html.contains("<code class="));
    }

    #[test]
    fn test_dual_theme_uses_mode_line_classes() {
        let html = dual()
            .highlight("a\nb // [!code ++]", "js", "{1}")
            .unwrap();

        assert!(html.contains("line highlighted-dark"));
        assert!(html.contains("line highlighted-light"));
        assert!(html.contains("line diff-dark add"));
        assert!(html.contains("line diff-light add"));
        assert!(!html.contains("line highlighted\""));
        assert!(!html.contains("line diff add"));
    }

    #[test]
    fn test_custom_container_class() {
        let class_names = ClassNameConfig {
            classname: ClassList::from(vec!["code".to_string(), "block".to_string()]),
            ..ClassNameConfig::default()
        };
        let options = HighlightOptions::default().with_class_names(class_names);
        let highlighter = CodeBlockHighlighter::with_engine(options, PlainEngine::default());

        let html = highlighter.highlight("x", "py", "").unwrap();
        assert!(html.starts_with("<pre class=\"code block\" data-theme="));
    }

    #[test]
    fn test_missing_language_uses_default() {
        let html = single().highlight("plain", "  ", "").unwrap();
        assert!(html.contains("<code class=\"language-text\">"));
    }

    #[test]
    fn test_language_is_escaped_in_attributes() {
        let html = single().highlight("x", "a\"b", "").unwrap();
        assert!(html.contains("language-a&quot;b"));
    }

    #[test]
    fn test_engine_errors_propagate() {
        let err = single().highlight("x", "unknown", "").unwrap_err();
        assert_eq!(err, HighlightError::UnknownLanguage("unknown".to_string()));
    }

    #[test]
    fn test_line_tags_per_mode() {
        let highlighter = dual();
        let scan = scan_diff_markers("a // [!code --]\nb", DiffScanMode::Exclusive);

        let dark = highlighter.line_tags(Some("2"), &scan, ThemeMode::Dark);
        assert_eq!(dark.lines(), vec![1, 2]);
        assert_eq!(
            dark.classes_for(1),
            Some(&["diff-dark remove".to_string()][..])
        );
        assert_eq!(
            dark.classes_for(2),
            Some(&["highlighted-dark".to_string()][..])
        );
    }

    #[test]
    fn test_range_tags_limited_to_block_length() {
        let highlighter = single();
        let scan = scan_diff_markers("x\n", DiffScanMode::Exclusive);

        let tags = highlighter.line_tags(Some("1-4294967295"), &scan, ThemeMode::Single);
        assert_eq!(tags.lines(), vec![1]);

        let html = highlighter.highlight("x\n", "js", "{1-4294967295}").unwrap();
        assert_eq!(html.matches("line highlighted").count(), 1);
    }

    #[test]
    fn test_dual_theme_without_mode_classes() {
        let class_names = ClassNameConfig {
            dark_mode_classname: ModeClasses::default(),
            ..ClassNameConfig::default()
        };
        let options = HighlightOptions::default()
            .with_theme(ThemeSpec::Dual {
                dark: "X".to_string(),
                light: "Y".to_string(),
            })
            .with_class_names(class_names);
        let highlighter = CodeBlockHighlighter::with_engine(options, PlainEngine::default());

        let html = highlighter.highlight("x", "js", "").unwrap();
        assert_eq!(html.matches("<pre class=\"highlight\" data-theme=").count(), 2);
        assert!(!html.contains("highlight highlight"));
    }

    #[test]
    fn test_worker_backed_highlighter() {
        let highlighter = CodeBlockHighlighter::new(HighlightOptions::default()).unwrap();
        let html = highlighter
            .highlight("fn main() {}\nlet x = 1; // [!code ++]\n", "rust", "{1}")
            .unwrap();

        assert!(html.starts_with("<pre class=\"highlight\" style=\"background-color: #"));
        assert!(html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("<span class=\"line highlighted\">"));
        assert!(html.contains("<span class=\"line diff add\">"));
        assert!(!html.contains("[!code"));
    }

    #[test]
    fn test_worker_backed_dual_theme() {
        let options = HighlightOptions::default().with_theme(ThemeSpec::Dual {
            dark: "base16-ocean.dark".to_string(),
            light: "InspiredGitHub".to_string(),
        });
        let highlighter = CodeBlockHighlighter::new(options).unwrap();
        let html = highlighter.highlight("const x = 1", "javascript", "").unwrap();

        assert_eq!(html.matches("<pre class=\"highlight highlight-dark\"").count(), 1);
        assert_eq!(html.matches("<pre class=\"highlight highlight-light\"").count(), 1);
    }

    #[test]
    fn test_unknown_theme_fails_at_construction() {
        let options = HighlightOptions::default().with_theme(ThemeSpec::Single("nope".to_string()));
        let err = CodeBlockHighlighter::new(options).unwrap_err();
        assert_eq!(err, HighlightError::UnknownTheme("nope".to_string()));
    }
}

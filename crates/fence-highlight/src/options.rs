//! Highlighter options
//!
//! Everything here is supplied once when the highlighter is built and is
//! read-only afterwards. Every field has a default, so a partial (or empty)
//! configuration table is always valid.

use fence_lines::DiffScanMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One or more CSS class strings.
///
/// Deserializes from either `"a b"` or `["a", "b"]`. Each entry is kept as
/// one label, so `"diff remove"` stays a single label that renders as two
/// classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClassListRepr", into = "ClassListRepr")]
pub struct ClassList(Vec<String>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ClassListRepr {
    One(String),
    Many(Vec<String>),
}

impl From<ClassListRepr> for ClassList {
    fn from(repr: ClassListRepr) -> Self {
        match repr {
            ClassListRepr::One(class) => Self(vec![class]),
            ClassListRepr::Many(classes) => Self(classes),
        }
    }
}

impl From<ClassList> for ClassListRepr {
    fn from(list: ClassList) -> Self {
        let mut classes = list.0;
        if classes.len() == 1 {
            ClassListRepr::One(classes.remove(0))
        } else {
            ClassListRepr::Many(classes)
        }
    }
}

impl ClassList {
    pub fn new(class: impl Into<String>) -> Self {
        Self(vec![class.into()])
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// All labels joined into one `class` attribute value.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }

    /// Individual class names, with space-separated labels split apart.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|label| label.split_whitespace())
    }
}

impl From<&str> for ClassList {
    fn from(class: &str) -> Self {
        Self::new(class)
    }
}

impl From<Vec<String>> for ClassList {
    fn from(classes: Vec<String>) -> Self {
        Self(classes)
    }
}

/// Theme selection: one theme, or a dark/light pair rendered side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSpec {
    Single(String),
    Dual { dark: String, light: String },
}

impl Default for ThemeSpec {
    fn default() -> Self {
        ThemeSpec::Single("base16-ocean.dark".to_string())
    }
}

impl ThemeSpec {
    pub fn is_dual(&self) -> bool {
        matches!(self, ThemeSpec::Dual { .. })
    }

    /// Theme names in rendering order.
    pub fn names(&self) -> Vec<String> {
        self.renderings()
            .into_iter()
            .map(|(_, theme)| theme.to_string())
            .collect()
    }

    /// `(mode, theme)` for each rendering of a code block.
    pub fn renderings(&self) -> Vec<(ThemeMode, &str)> {
        match self {
            ThemeSpec::Single(theme) => vec![(ThemeMode::Single, theme.as_str())],
            ThemeSpec::Dual { dark, light } => vec![
                (ThemeMode::Dark, dark.as_str()),
                (ThemeMode::Light, light.as_str()),
            ],
        }
    }
}

/// The mode one rendering is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Single,
    Dark,
    Light,
}

/// Semantic role a class list is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassRole {
    /// The `<pre>` element of a rendering.
    Container,
    /// Lines selected by the `{...}` range expression.
    HighlightedLine,
    /// Lines carrying an addition marker.
    DiffAdd,
    /// Lines carrying a removal marker.
    DiffRemove,
}

/// Dark/light pair of class lists.
///
/// A missing side falls back to the single-theme classes of the same role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeClasses {
    pub dark: Option<ClassList>,
    pub light: Option<ClassList>,
}

impl ModeClasses {
    pub fn new(dark: impl Into<ClassList>, light: impl Into<ClassList>) -> Self {
        Self {
            dark: Some(dark.into()),
            light: Some(light.into()),
        }
    }
}

/// Classes for removed (`minus`) and added (`plus`) lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffClassNames {
    pub minus: ClassList,
    pub plus: ClassList,
}

impl Default for DiffClassNames {
    fn default() -> Self {
        Self {
            minus: "diff remove".into(),
            plus: "diff add".into(),
        }
    }
}

/// Dark/light classes for removed and added lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkModeDiffClassNames {
    pub minus: ModeClasses,
    pub plus: ModeClasses,
}

impl Default for DarkModeDiffClassNames {
    fn default() -> Self {
        Self {
            minus: ModeClasses::new("diff-dark remove", "diff-light remove"),
            plus: ModeClasses::new("diff-dark add", "diff-light add"),
        }
    }
}

/// CSS class names per role and mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNameConfig {
    /// Class(es) of each rendering's `<pre>` element.
    pub classname: ClassList,
    /// Extra `<pre>` class(es) per mode in dual-theme rendering.
    pub dark_mode_classname: ModeClasses,
    /// Class(es) of the element wrapping both dual-theme renderings.
    pub container_classname: ClassList,
    /// Class(es) for lines selected by `{...}`.
    pub highlighted_classname: ClassList,
    pub dark_mode_highlighted_classname: ModeClasses,
    pub diff_lines_classname: DiffClassNames,
    pub dark_mode_diff_lines_classname: DarkModeDiffClassNames,
}

impl Default for ClassNameConfig {
    fn default() -> Self {
        Self {
            classname: "highlight".into(),
            dark_mode_classname: ModeClasses::new("highlight-dark", "highlight-light"),
            container_classname: "highlight-container".into(),
            highlighted_classname: "highlighted".into(),
            dark_mode_highlighted_classname: ModeClasses::new(
                "highlighted-dark",
                "highlighted-light",
            ),
            diff_lines_classname: DiffClassNames::default(),
            dark_mode_diff_lines_classname: DarkModeDiffClassNames::default(),
        }
    }
}

impl ClassNameConfig {
    /// Classes for `role` when rendering in `mode`.
    ///
    /// For [`ClassRole::Container`] in dark/light mode this is the per-mode
    /// class only; the shared `classname` is added by the caller.
    pub fn classes(&self, role: ClassRole, mode: ThemeMode) -> &ClassList {
        let (single, pair) = match role {
            ClassRole::Container => (&self.classname, &self.dark_mode_classname),
            ClassRole::HighlightedLine => (
                &self.highlighted_classname,
                &self.dark_mode_highlighted_classname,
            ),
            ClassRole::DiffRemove => (
                &self.diff_lines_classname.minus,
                &self.dark_mode_diff_lines_classname.minus,
            ),
            ClassRole::DiffAdd => (
                &self.diff_lines_classname.plus,
                &self.dark_mode_diff_lines_classname.plus,
            ),
        };

        match mode {
            ThemeMode::Single => single,
            ThemeMode::Dark => pair.dark.as_ref().unwrap_or(single),
            ThemeMode::Light => pair.light.as_ref().unwrap_or(single),
        }
    }
}

/// Options for [`crate::CodeBlockHighlighter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// Theme name, or a `{ dark, light }` pair for dual-theme output.
    pub theme: ThemeSpec,

    #[serde(flatten)]
    pub class_names: ClassNameConfig,

    /// Languages loaded up front instead of on first use.
    pub langs: Vec<String>,

    /// Folders with additional `.sublime-syntax` grammars.
    pub syntax_dirs: Vec<PathBuf>,

    /// Folders with additional `.tmTheme` themes.
    pub theme_dirs: Vec<PathBuf>,

    /// How removal and addition markers interact.
    pub diff_scan: DiffScanMode,

    /// Language used for fences without a language tag.
    pub default_language: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            theme: ThemeSpec::default(),
            class_names: ClassNameConfig::default(),
            langs: Vec::new(),
            syntax_dirs: Vec::new(),
            theme_dirs: Vec::new(),
            diff_scan: DiffScanMode::default(),
            default_language: "text".to_string(),
        }
    }
}

impl HighlightOptions {
    pub fn with_theme(mut self, theme: ThemeSpec) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_class_names(mut self, class_names: ClassNameConfig) -> Self {
        self.class_names = class_names;
        self
    }

    pub fn with_langs(mut self, langs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.langs = langs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_diff_scan(mut self, mode: DiffScanMode) -> Self {
        self.diff_scan = mode;
        self
    }
}

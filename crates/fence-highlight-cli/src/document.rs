//! Standalone HTML document output
//!
//! Wraps rendered markdown in a minimal page whose stylesheet shows the
//! dark or light rendering of each dual-theme block according to the
//! reader's `prefers-color-scheme`, and tints highlighted and diff lines.

use fence_highlight::{ClassList, ClassNameConfig, ClassRole, ThemeMode};
use std::fmt::Write;

const LINE_CLASS: &str = "line";

const HIGHLIGHTED_BACKGROUND: &str = "rgba(142, 150, 170, 0.2)";
const REMOVED_BACKGROUND: &str = "rgba(244, 63, 94, 0.16)";
const ADDED_BACKGROUND: &str = "rgba(16, 185, 129, 0.16)";

/// Wrap an HTML fragment in a complete document.
pub fn wrap(body: &str, title: &str, class_names: &ClassNameConfig) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{}</style>\n</head>\n\
         <body>\n{}</body>\n</html>\n",
        escape_text(title),
        stylesheet(class_names),
        body
    )
}

/// CSS for the configured class names.
pub fn stylesheet(class_names: &ClassNameConfig) -> String {
    let mut css = String::new();
    let pre = selector(&class_names.classname);
    let container = selector(&class_names.container_classname);
    let dark = selector(class_names.classes(ClassRole::Container, ThemeMode::Dark));
    let light = selector(class_names.classes(ClassRole::Container, ThemeMode::Light));

    if !pre.is_empty() {
        let _ = writeln!(css, "pre{pre} {{ padding: 1em; overflow-x: auto; }}");
    }
    let _ = writeln!(css, ".{LINE_CLASS} {{ display: inline-block; width: 100%; }}");

    let line_rules = [
        (ClassRole::HighlightedLine, HIGHLIGHTED_BACKGROUND),
        (ClassRole::DiffRemove, REMOVED_BACKGROUND),
        (ClassRole::DiffAdd, ADDED_BACKGROUND),
    ];
    let mut emitted = Vec::new();
    for (role, background) in line_rules {
        for mode in [ThemeMode::Single, ThemeMode::Dark, ThemeMode::Light] {
            let classes = selector(class_names.classes(role, mode));
            if classes.is_empty() || emitted.contains(&classes) {
                continue;
            }
            let _ = writeln!(css, ".{LINE_CLASS}{classes} {{ background-color: {background}; }}");
            emitted.push(classes);
        }
    }

    // Without distinct per-mode classes there is nothing to toggle.
    if container.is_empty() || dark.is_empty() || light.is_empty() || dark == light {
        return css;
    }

    let _ = writeln!(css, "{container} {light} {{ display: none; }}");
    let _ = writeln!(css, "@media (prefers-color-scheme: light) {{");
    let _ = writeln!(css, "  {container} {dark} {{ display: none; }}");
    let _ = writeln!(css, "  {container} {light} {{ display: block; }}");
    let _ = writeln!(css, "}}");
    css
}

/// Compound class selector, e.g. `.diff.remove`.
fn selector(classes: &ClassList) -> String {
    classes
        .class_names()
        .map(|class| format!(".{class}"))
        .collect()
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

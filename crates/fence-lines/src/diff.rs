//! Inline diff markers (`// [!code --]`, `// [!code ++]`)
//!
//! A marker flags its line as removed or added. Markers are stripped from
//! the code before it is highlighted; the line itself is kept.

use crate::types::LineTagList;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn removal_marker() -> &'static Regex {
    static REMOVAL_MARKER: OnceLock<Regex> = OnceLock::new();
    REMOVAL_MARKER.get_or_init(|| Regex::new(r"// \[!code +--\]").unwrap())
}

fn addition_marker() -> &'static Regex {
    static ADDITION_MARKER: OnceLock<Regex> = OnceLock::new();
    ADDITION_MARKER.get_or_init(|| Regex::new(r"// \[!code +\+\+\]").unwrap())
}

/// How removal and addition markers interact within one code block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffScanMode {
    /// Removal markers win: addition markers are only looked for (and
    /// stripped) when the block has no removal marker at all.
    #[default]
    Exclusive,
    /// Both marker kinds are tagged and stripped.
    Independent,
}

/// Result of scanning a code block for diff markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffScan {
    /// Code with the recognized markers removed.
    pub code: String,
    /// 1-based lines carrying a removal marker.
    pub removed: Vec<u32>,
    /// 1-based lines carrying an addition marker.
    pub added: Vec<u32>,
}

impl DiffScan {
    pub fn has_markers(&self) -> bool {
        !self.removed.is_empty() || !self.added.is_empty()
    }

    /// Number of lines in the stripped code. One trailing newline does not
    /// start another line.
    pub fn line_count(&self) -> u32 {
        let body = self.code.strip_suffix('\n').unwrap_or(&self.code);
        let count = body.split('\n').count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Tag the marked lines with the given role classes.
    ///
    /// The scan is class-agnostic so one scan can serve several class sets
    /// (e.g. dark and light renderings of the same block).
    pub fn tags(&self, remove_classes: &[String], add_classes: &[String]) -> LineTagList {
        let removed = LineTagList::tagged(self.removed.iter().copied(), remove_classes);
        let added = LineTagList::tagged(self.added.iter().copied(), add_classes);
        removed.merge(added)
    }
}

/// Find diff markers in `code` and strip them.
///
/// Lines are numbered from 1 over `code.split('\n')`.
pub fn scan_diff_markers(code: &str, mode: DiffScanMode) -> DiffScan {
    let removed = marked_lines(code, removal_marker());

    let added = if removed.is_empty() || mode == DiffScanMode::Independent {
        marked_lines(code, addition_marker())
    } else {
        Vec::new()
    };

    let mut stripped = code.to_string();
    if !removed.is_empty() {
        stripped = removal_marker().replace_all(&stripped, "").into_owned();
    }
    if !added.is_empty() {
        stripped = addition_marker().replace_all(&stripped, "").into_owned();
    }

    if !removed.is_empty() || !added.is_empty() {
        log::debug!(
            "Diff markers: {} removed, {} added line(s)",
            removed.len(),
            added.len()
        );
    }

    DiffScan {
        code: stripped,
        removed,
        added,
    }
}

fn marked_lines(code: &str, marker: &Regex) -> Vec<u32> {
    code.split('\n')
        .enumerate()
        .filter(|(_, line)| marker.is_match(line))
        .map(|(idx, _)| idx as u32 + 1)
        .collect()
}

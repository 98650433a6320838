//! Fence Lines
//!
//! Per-line CSS decorations for highlighted code fences. Two independent
//! sources describe which lines get which classes:
//!
//! - the `{1,3-5}` range expression in a fence's attribute string
//! - inline diff markers (`// [!code --]`, `// [!code ++]`) in the code itself
//!
//! Both produce a [`LineTagList`]; [`merge_line_tags`] combines them into the
//! single sorted list a highlighting engine consumes.
//!
//! # Example
//!
//! ```
//! use fence_lines::{line_tags_from_ranges, scan_diff_markers, DiffScanMode};
//!
//! let code = "let a = 1;\nlet b = 2; // [!code --]\nlet c = 3;";
//! let scan = scan_diff_markers(code, DiffScanMode::Exclusive);
//!
//! let highlighted = line_tags_from_ranges("1-2", &["highlighted".to_string()], scan.line_count());
//! let diff = scan.tags(&["diff remove".to_string()], &["diff add".to_string()]);
//! let merged = highlighted.merge(diff);
//!
//! assert_eq!(
//!     merged.classes_for(2),
//!     Some(&["highlighted".to_string(), "diff remove".to_string()][..])
//! );
//! assert!(!scan.code.contains("[!code"));
//! ```

mod diff;
mod merge;
mod ranges;
mod types;

pub use diff::{scan_diff_markers, DiffScan, DiffScanMode};
pub use merge::merge_line_tags;
pub use ranges::{extract_range_expression, line_tags_from_ranges, parse_line_numbers};
pub use types::{LineTag, LineTagList};

//! Merging of line tag lists

use crate::types::LineTagList;

/// Merge `target` into `source`.
///
/// The result is sorted by line with one entry per line. A line tagged by
/// both lists keeps `source`'s classes first, followed by `target`'s.
pub fn merge_line_tags(source: LineTagList, target: LineTagList) -> LineTagList {
    let mut merged = source.into_vec();
    merged.reserve(target.len());

    for tag in target {
        match merged.binary_search_by_key(&tag.line, |existing| existing.line) {
            Ok(idx) => merged[idx].classes.extend(tag.classes),
            Err(idx) => merged.insert(idx, tag),
        }
    }

    LineTagList::from_sorted_unchecked(merged)
}

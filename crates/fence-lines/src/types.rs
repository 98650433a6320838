//! Line tag data structures

/// CSS classes to apply to one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTag {
    /// 1-based line number.
    pub line: u32,
    /// Class labels in application order.
    pub classes: Vec<String>,
}

impl LineTag {
    pub fn new(line: u32, classes: Vec<String>) -> Self {
        Self { line, classes }
    }
}

/// Line tags sorted ascending by line number, at most one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTagList {
    tags: Vec<LineTag>,
}

impl LineTagList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every line in `lines` with the same `classes`.
    ///
    /// Lines may arrive unordered or repeated; the result is sorted and unique.
    pub fn tagged(lines: impl IntoIterator<Item = u32>, classes: &[String]) -> Self {
        let mut lines: Vec<u32> = lines.into_iter().collect();
        lines.sort_unstable();
        lines.dedup();

        Self {
            tags: lines
                .into_iter()
                .map(|line| LineTag::new(line, classes.to_vec()))
                .collect(),
        }
    }

    /// Build a list from arbitrary tags.
    ///
    /// Tags sharing a line are grouped into one entry, their classes
    /// concatenated in the order the tags were given.
    pub fn from_tags(tags: impl IntoIterator<Item = LineTag>) -> Self {
        let mut tags: Vec<LineTag> = tags.into_iter().collect();
        // stable, so per-line encounter order survives
        tags.sort_by_key(|tag| tag.line);

        let mut grouped: Vec<LineTag> = Vec::with_capacity(tags.len());
        for tag in tags {
            match grouped.last_mut() {
                Some(last) if last.line == tag.line => last.classes.extend(tag.classes),
                _ => grouped.push(tag),
            }
        }

        Self { tags: grouped }
    }

    /// Wrap a vector that already upholds the sorted/unique invariant.
    pub(crate) fn from_sorted_unchecked(tags: Vec<LineTag>) -> Self {
        debug_assert!(tags.windows(2).all(|pair| pair[0].line < pair[1].line));
        Self { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineTag> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[LineTag] {
        &self.tags
    }

    pub fn into_vec(self) -> Vec<LineTag> {
        self.tags
    }

    /// Line numbers present in the list, ascending.
    pub fn lines(&self) -> Vec<u32> {
        self.tags.iter().map(|tag| tag.line).collect()
    }

    /// Classes attached to `line`, if any.
    pub fn classes_for(&self, line: u32) -> Option<&[String]> {
        self.tags
            .binary_search_by_key(&line, |tag| tag.line)
            .ok()
            .map(|idx| self.tags[idx].classes.as_slice())
    }

    /// Merge `other` into this list; see [`crate::merge_line_tags`].
    pub fn merge(self, other: LineTagList) -> LineTagList {
        crate::merge::merge_line_tags(self, other)
    }
}

impl IntoIterator for LineTagList {
    type Item = LineTag;
    type IntoIter = std::vec::IntoIter<LineTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a LineTagList {
    type Item = &'a LineTag;
    type IntoIter = std::slice::Iter<'a, LineTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

//! Line range syntax (`1,3-5,9`) used in fence attribute strings

use crate::types::LineTagList;
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Extract the body of a `{...}` range expression from a fence attribute string.
///
/// The match is greedy: `{1,3} title="{x}"` yields `1,3} title="{x`, the same
/// as taking everything between the first `{` and the last `}`.
pub fn extract_range_expression(attrs: &str) -> Option<&str> {
    static RANGE_EXPRESSION: OnceLock<Regex> = OnceLock::new();

    let re = RANGE_EXPRESSION.get_or_init(|| Regex::new(r"\{(.+)\}").unwrap());

    re.captures(attrs)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str())
}

/// Parse a comma-separated list of line numbers and inclusive ranges.
///
/// Returns the referenced lines in ascending order without duplicates,
/// limited to `1..=max_line`. Tokens that are not a positive number or range
/// are skipped; a range whose end does not parse is treated as its start
/// alone, and a reversed range covers no lines.
pub fn parse_line_numbers(expression: &str, max_line: u32) -> Vec<u32> {
    let mut lines = BTreeSet::new();

    for token in expression.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match parse_token(token) {
            Some(range) => {
                let end = (*range.end()).min(max_line);
                lines.extend(*range.start()..=end);
            }
            None => log::warn!("Ignoring malformed line range '{}'", token),
        }
    }

    lines.into_iter().collect()
}

/// Tag every line up to `max_line` referenced by `expression` with `classes`.
pub fn line_tags_from_ranges(expression: &str, classes: &[String], max_line: u32) -> LineTagList {
    LineTagList::tagged(parse_line_numbers(expression, max_line), classes)
}

fn parse_token(token: &str) -> Option<RangeInclusive<u32>> {
    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (token, None),
    };

    let start = parse_line(start)?;
    let end = end.and_then(parse_line).unwrap_or(start);

    Some(start..=end)
}

fn parse_line(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|line| *line > 0)
}

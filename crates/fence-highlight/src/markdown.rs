//! Markdown rendering with highlighted code fences.

use crate::error::HighlightError;
use crate::highlighter::CodeBlockHighlighter;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Render `markdown` to HTML, replacing every fenced code block with the
/// highlighter's output.
///
/// Indented code blocks are left to pulldown-cmark. The first block that
/// fails to highlight fails the whole render.
pub fn render_markdown(
    highlighter: &CodeBlockHighlighter,
    markdown: &str,
) -> Result<String, HighlightError> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut fence: Option<PendingFence> = None;
    let mut blocks = 0usize;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                fence = Some(PendingFence::new(&info));
            }
            Event::Text(text) if fence.is_some() => {
                if let Some(pending) = fence.as_mut() {
                    pending.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) if fence.is_some() => {
                if let Some(pending) = fence.take() {
                    let html = highlighter.highlight(&pending.code, &pending.lang, &pending.attrs)?;
                    events.push(Event::Html(CowStr::from(html)));
                    blocks += 1;
                }
            }
            event => events.push(event),
        }
    }

    log::debug!("Rendered markdown with {} highlighted block(s)", blocks);

    let mut output = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut output, events.into_iter());
    Ok(output)
}

/// A fenced block whose content is still being collected.
struct PendingFence {
    lang: String,
    attrs: String,
    code: String,
}

impl PendingFence {
    fn new(info: &str) -> Self {
        let (lang, attrs) = split_info_string(info);
        Self {
            lang: lang.to_string(),
            attrs: attrs.to_string(),
            code: String::new(),
        }
    }
}

/// Split a fence info string into language and attributes.
///
/// The language is the first word; a `{` directly attached to it starts the
/// attributes (`js{1,3}` is `js` with `{1,3}`).
pub fn split_info_string(info: &str) -> (&str, &str) {
    let info = info.trim();
    let word_end = info.find(char::is_whitespace).unwrap_or(info.len());
    let split_at = info[..word_end].find('{').unwrap_or(word_end);

    (&info[..split_at], info[split_at..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::tests::PlainEngine;
    use crate::options::HighlightOptions;
    use pretty_assertions::assert_eq;

    fn highlighter() -> CodeBlockHighlighter {
        CodeBlockHighlighter::with_engine(HighlightOptions::default(), PlainEngine::default())
    }

    #[test]
    fn test_split_info_string() {
        assert_eq!(split_info_string("rust"), ("rust", ""));
        assert_eq!(split_info_string("rust {1,3}"), ("rust", "{1,3}"));
        assert_eq!(split_info_string("js{2-4} title=\"a b\""), ("js", "{2-4} title=\"a b\""));
        assert_eq!(split_info_string("  "), ("", ""));
        assert_eq!(split_info_string("{1}"), ("", "{1}"));
    }

    #[test]
    fn test_fenced_blocks_are_highlighted() {
        let markdown = "# Title\n\n```js {2}\nlet a = 1\nlet b = 2 // [!code --]\n```\n\nAfter.\n";
        let html = render_markdown(&highlighter(), markdown).unwrap();

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<code class=\"language-js\">"));
        assert!(html.contains("<span class=\"line highlighted diff remove\">let b = 2 </span>"));
        assert!(html.contains("<p>After.</p>"));
        assert!(!html.contains("[!code"));
    }

    #[test]
    fn test_fence_without_language_uses_default() {
        let html = render_markdown(&highlighter(), "```\nplain\n```\n").unwrap();
        assert!(html.contains("<code class=\"language-text\">"));
    }

    #[test]
    fn test_indented_code_is_left_alone() {
        let html = render_markdown(&highlighter(), "    indented code\n").unwrap();
        assert_eq!(html, "<pre><code>indented code\n</code></pre>\n");
    }

    #[test]
    fn test_failing_block_fails_render() {
        let err = render_markdown(&highlighter(), "```unknown\nx\n```\n").unwrap_err();
        assert_eq!(err, HighlightError::UnknownLanguage("unknown".to_string()));
    }
}

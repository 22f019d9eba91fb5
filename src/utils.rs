//! Text normalization: entity decoding, tag stripping and snippets

use html_escape::decode_html_entities;

use crate::dom::{parse_html, MarkdownWriter};

pub const DEFAULT_SNIPPET_LENGTH: usize = 150;

const ELLIPSIS: &str = "...";

/// Decode HTML character entities (`&#39;`, `&quot;`, `&amp;`, ...)
pub fn decode_entities(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// Replace every `<...>` run with a single space.
///
/// This is a plain bracket scan, not a parser: a `<` starts a tag only if a
/// `>` follows it with at least one character in between. A stray `<` with
/// no closing bracket is kept as text.
pub fn strip_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => {
                result.push(' ');
                rest = &after[close + 1..];
            }
            _ => {
                result.push('<');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Collapse all whitespace runs (newlines included) into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a markup fragment to a single line of plain text.
///
/// Entities are decoded before tags are stripped, so encoded markup such as
/// `&lt;b&gt;` is removed as well.
pub fn clean_text(text: &str) -> String {
    collapse_whitespace(&strip_tags(&decode_entities(text)))
}

/// Plain-text preview of a fragment, cut to `max_length` characters.
///
/// # Arguments
/// * `text` - Raw snippet, possibly holding tags and entities
/// * `max_length` - Character count kept before the ellipsis
///
/// # Returns
/// The cleaned single-line text. `...` is appended only when the cleaned
/// text is longer than `max_length`; whitespace left at the cut is dropped.
pub fn snippet(text: &str, max_length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let cleaned = clean_text(text);
    if cleaned.chars().count() <= max_length {
        return cleaned;
    }
    let cut: String = cleaned.chars().take(max_length).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Convert an HTML fragment to markdown-flavored plain text.
///
/// Images are dropped, links keep their target, non-ASCII text is left
/// alone and lines are never wrapped. Empty input gives an empty string.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let document = parse_html(html);
    let mut writer = MarkdownWriter::new();
    writer.write_node(&document);
    tidy_markdown(&writer.finish())
}

/// Strip trailing spaces from every line and squeeze blank-line runs to one.
/// Lines inside ``` fences are left exactly as written.
fn tidy_markdown(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for raw in text.lines() {
        if in_fence && raw.trim_end() != "```" {
            lines.push(raw);
            continue;
        }
        let line = raw.trim_end();
        if line.starts_with("```") {
            in_fence = !in_fence;
        }
        if line.is_empty() && lines.last().is_some_and(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

//! DOM parsing and traversal helpers

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute};
use markup5ever_rcdom as rcdom;
use rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML fragment into a document tree
pub fn parse_html(html: &str) -> Handle {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    dom.document
}

pub fn get_attr_value(attrs: &[Attribute], attr_name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.name.local.as_ref() == attr_name)
        .map(|attr| attr.value.as_ref().to_string())
}

/// Format a link as Markdown, adding spacing if needed
/// - If link text equals URL, uses angle bracket syntax: <URL>
/// - Otherwise uses full Markdown syntax: [text](URL)
/// - Adds space before link only when it would otherwise be glued to a
///   letter or digit
pub fn format_markdown_link(text: &mut String, href: &str, link_text: &str) {
    if text.ends_with(char::is_alphanumeric) {
        text.push(' ');
    }
    if link_text == href || link_text.is_empty() {
        text.push('<');
        text.push_str(href);
        text.push('>');
    } else {
        text.push('[');
        text.push_str(link_text);
        text.push_str("](");
        text.push_str(href);
        text.push(')');
    }
}

/// Walks a parsed tree and writes markdown into a buffer.
///
/// Inline whitespace is collapsed the way a browser would; `<pre>` content
/// is copied verbatim. Nothing is ever wrapped.
#[derive(Debug, Default)]
pub struct MarkdownWriter {
    out: String,
    preformatted: bool,
    list_depth: usize,
}

impl MarkdownWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_node(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Text { ref contents } => {
                self.push_text(&contents.borrow());
            }
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag_name: &str = &name.local;
                match tag_name {
                    "img" | "head" | "script" | "style" | "template" | "noscript" => {}
                    "br" => self.line_break(),
                    "hr" => {
                        self.block_break(2);
                        self.out.push_str("* * *");
                        self.block_break(2);
                    }
                    "p" => {
                        self.block_break(2);
                        self.write_children(node);
                        self.block_break(2);
                    }
                    "div" | "section" | "article" | "tr" | "table" => {
                        self.block_break(1);
                        self.write_children(node);
                        self.block_break(1);
                    }
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                        let level = tag_name[1..].parse::<usize>().unwrap_or(1);
                        self.block_break(2);
                        self.out.push_str(&"#".repeat(level));
                        self.out.push(' ');
                        self.write_children(node);
                        self.block_break(2);
                    }
                    "strong" | "b" => self.write_wrapped(node, "**"),
                    "em" | "i" => self.write_wrapped(node, "_"),
                    "code" if !self.preformatted => self.write_wrapped(node, "`"),
                    "pre" => self.write_preformatted(node),
                    "a" => {
                        let href = get_attr_value(&attrs.borrow(), "href");
                        match href {
                            Some(href) if !href.is_empty() => {
                                let link_text = self.render_inner(node, self.list_depth);
                                format_markdown_link(&mut self.out, &href, &link_text);
                            }
                            _ => self.write_children(node),
                        }
                    }
                    "ul" => self.write_list(node, false),
                    "ol" => self.write_list(node, true),
                    "li" => {
                        // list item outside of a list
                        self.block_break(1);
                        let item = self.render_inner(node, self.list_depth + 1);
                        self.push_item("* ", &item);
                    }
                    "blockquote" => self.write_blockquote(node),
                    _ => self.write_children(node),
                }
            }
            _ => self.write_children(node),
        }
    }

    fn write_children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.write_node(child);
        }
    }

    /// Render the children of `node` into a fresh buffer and return it trimmed
    fn render_inner(&self, node: &Handle, list_depth: usize) -> String {
        let mut inner = MarkdownWriter {
            out: String::new(),
            preformatted: self.preformatted,
            list_depth,
        };
        inner.write_children(node);
        inner.out.trim().to_string()
    }

    fn push_text(&mut self, text: &str) {
        if self.preformatted {
            self.out.push_str(text);
            return;
        }
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.out.is_empty() && !self.out.ends_with(char::is_whitespace) {
                    self.out.push(' ');
                }
            } else {
                self.out.push(c);
            }
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
    }

    fn line_break(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    /// Make sure the buffer ends with at least `newlines` line feeds.
    /// No-op on an empty buffer.
    fn block_break(&mut self, newlines: usize) {
        self.trim_trailing_spaces();
        if self.out.is_empty() {
            return;
        }
        let have = self.out.len() - self.out.trim_end_matches('\n').len();
        for _ in have..newlines {
            self.out.push('\n');
        }
    }

    /// Wrap the children of `node` in `marker`. Whitespace at either edge of
    /// the span is moved outside the markers; an empty span writes nothing.
    fn write_wrapped(&mut self, node: &Handle, marker: &str) {
        let mut start = self.out.len();
        self.out.push_str(marker);
        let mut opened = self.out.len();
        self.write_children(node);

        if self.out[opened..].starts_with(' ') {
            self.out.remove(opened);
            if start > 0 && !self.out[..start].ends_with(char::is_whitespace) {
                self.out.insert(start, ' ');
                start += 1;
                opened += 1;
            }
        }

        let trailing_space = self.out.len() > opened && self.out.ends_with(' ');
        self.trim_trailing_spaces();
        if self.out.len() <= opened {
            self.out.truncate(start);
        } else {
            self.out.push_str(marker);
            if trailing_space {
                self.out.push(' ');
            }
        }
    }

    fn write_preformatted(&mut self, node: &Handle) {
        self.block_break(2);
        self.out.push_str("```\n");
        let was_preformatted = self.preformatted;
        self.preformatted = true;
        self.write_children(node);
        self.preformatted = was_preformatted;
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str("```");
        self.block_break(2);
    }

    fn write_list(&mut self, node: &Handle, ordered: bool) {
        let separation = if self.list_depth > 0 { 1 } else { 2 };
        self.block_break(separation);

        let mut number = 0;
        for child in node.children.borrow().iter() {
            let is_item = matches!(
                &child.data,
                NodeData::Element { ref name, .. } if &*name.local == "li"
            );
            if !is_item {
                if !matches!(child.data, NodeData::Text { .. }) {
                    self.write_node(child);
                }
                continue;
            }

            let item = self.render_inner(child, self.list_depth + 1);
            if item.is_empty() {
                continue;
            }
            number += 1;
            let marker = if ordered {
                format!("{number}. ")
            } else {
                String::from("* ")
            };
            self.push_item(&marker, &item);
        }

        self.block_break(separation);
    }

    /// Write one list item, indenting continuation lines under the marker
    fn push_item(&mut self, marker: &str, item: &str) {
        let indent = " ".repeat(marker.len());
        for (i, line) in item.lines().enumerate() {
            if i == 0 {
                self.out.push_str(marker);
            } else if !line.is_empty() {
                self.out.push_str(&indent);
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    fn write_blockquote(&mut self, node: &Handle) {
        let quoted = self.render_inner(node, 0);
        if quoted.is_empty() {
            return;
        }
        self.block_break(2);
        for line in quoted.lines() {
            if line.is_empty() {
                self.out.push('>');
            } else {
                self.out.push_str("> ");
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
        self.block_break(2);
    }
}

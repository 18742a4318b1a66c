//! Markdown → display tree → styled HTML.
//!
//! The normalised itinerary is parsed once with `pulldown-cmark` into a small
//! tree of [`Block`]s. That tree is the single source for every output: the
//! styled HTML fragment, the plain-text terminal view and the PDF layout in
//! [`crate::pipeline::layout`].
//!
//! Only the constructs the model is asked to produce get dedicated styling
//! (headings, paragraphs, bullet lists, bold, italics). Tables, code and
//! strikethrough still render, with neutral styling. Raw HTML in the model
//! output is never passed through: it is kept as literal, escaped text.

use crate::pipeline::postprocess::normalize;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::debug;

/// Heading shown above every rendered itinerary.
pub const ITINERARY_TITLE: &str = "Your Personalized Itinerary";

/// A run of inline text sharing one style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Span {
    fn same_style(&self, other: &Span) -> bool {
        self.strong == other.strong
            && self.emphasis == other.emphasis
            && self.strikethrough == other.strikethrough
            && self.code == other.code
            && self.link == other.link
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `level` is 1–6 as written in the Markdown.
    Heading { level: u8, content: Vec<Span> },
    Paragraph(Vec<Span>),
    /// `start` is `Some(n)` for ordered lists.
    List { start: Option<u64>, items: Vec<ListItem> },
    Table {
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    CodeBlock { text: String },
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// The itinerary region: title plus rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItinerary {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl RenderedItinerary {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Styled HTML fragment for embedding in a page.
    pub fn to_html(&self, styles: &StyleSheet) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"itinerary\" style=\"{}\"><h1 style=\"{}\">{}</h1><div class=\"prose\">",
            escape_html(styles.get(Element::Container)),
            escape_html(styles.get(Element::Title)),
            escape_html(&self.title)
        );
        for block in &self.blocks {
            write_block(&mut out, block, styles);
        }
        out.push_str("</div></div>");
        out
    }

    /// Standalone HTML document wrapping [`to_html`](Self::to_html).
    pub fn to_html_document(&self, styles: &StyleSheet) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n</head>\n<body style=\"{}\">\n{}\n</body>\n</html>\n",
            escape_html(&self.title),
            escape_html(styles.get(Element::Body)),
            self.to_html(styles)
        )
    }

    /// Terminal-friendly text: headings underlined, bullets as `•`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push_str("\n\n");
        for block in &self.blocks {
            write_plain_block(&mut out, block, 0);
        }
        out.trim_end().to_string()
    }
}

/// Normalise stored itinerary Markdown and render it.
///
/// Returns `None` when there is nothing to show.
pub fn render_itinerary(markdown: &str) -> Option<RenderedItinerary> {
    let cleaned = normalize(markdown);
    debug!("Raw itinerary markdown:\n{}", markdown);
    debug!("Normalized itinerary markdown:\n{}", cleaned);
    render_markdown(&cleaned)
}

/// Render Markdown as-is (no normalisation).
pub fn render_markdown(markdown: &str) -> Option<RenderedItinerary> {
    if markdown.trim().is_empty() {
        return None;
    }
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.handle(event);
    }
    Some(RenderedItinerary {
        title: ITINERARY_TITLE.to_string(),
        blocks: builder.finish(),
    })
}

// ── Tree construction ───────────────────────────────────────────────────────

#[derive(Default)]
struct TableBuilder {
    header: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
    row: Vec<Vec<Span>>,
}

struct TreeBuilder {
    /// One container per open list item; index 0 is the document.
    containers: Vec<Vec<Block>>,
    lists: Vec<(Option<u64>, Vec<ListItem>)>,
    inline: Option<Vec<Span>>,
    heading: Option<u8>,
    table: Option<TableBuilder>,
    code: Option<String>,
    strong: u32,
    emphasis: u32,
    strikethrough: u32,
    link: Option<String>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            containers: vec![Vec::new()],
            lists: Vec::new(),
            inline: None,
            heading: None,
            table: None,
            code: None,
            strong: 0,
            emphasis: 0,
            strikethrough: 0,
            link: None,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush_inline();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, false)
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_inline();
                self.inline = Some(Vec::new());
            }
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.heading = Some(heading_level(level));
                self.inline = Some(Vec::new());
            }
            Tag::List(start) => {
                self.flush_inline();
                self.lists.push((start, Vec::new()));
            }
            Tag::Item => {
                self.flush_inline();
                self.containers.push(Vec::new());
            }
            Tag::CodeBlock(_) => {
                self.flush_inline();
                self.code = Some(String::new());
            }
            Tag::Table(_) => {
                self.flush_inline();
                self.table = Some(TableBuilder::default());
            }
            Tag::TableCell => self.inline = Some(Vec::new()),
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let spans = self.inline.take().unwrap_or_default();
                if !spans.is_empty() {
                    self.push_block(Block::Paragraph(spans));
                }
            }
            TagEnd::Heading(_) => {
                let content = self.inline.take().unwrap_or_default();
                let level = self.heading.take().unwrap_or(1);
                self.push_block(Block::Heading { level, content });
            }
            TagEnd::List(_) => {
                self.flush_inline();
                if let Some((start, items)) = self.lists.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            TagEnd::Item => {
                self.flush_inline();
                if self.containers.len() > 1 {
                    let blocks = self.containers.pop().unwrap_or_default();
                    if let Some((_, items)) = self.lists.last_mut() {
                        items.push(ListItem { blocks });
                    }
                }
            }
            TagEnd::CodeBlock => {
                let text = self.code.take().unwrap_or_default();
                self.push_block(Block::CodeBlock {
                    text: text.trim_end_matches('\n').to_string(),
                });
            }
            TagEnd::TableCell => {
                let cell = self.inline.take().unwrap_or_default();
                if let Some(table) = self.table.as_mut() {
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_block(Block::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        let span = Span {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
            link: self.link.clone(),
        };
        // Tight list items carry text with no enclosing paragraph.
        let spans = self.inline.get_or_insert_with(Vec::new);
        match spans.last_mut() {
            Some(last) if last.same_style(&span) => last.text.push_str(&span.text),
            _ => spans.push(span),
        }
    }

    fn flush_inline(&mut self) {
        if self.heading.is_some() || self.table.is_some() {
            return;
        }
        if let Some(spans) = self.inline.take() {
            if !spans.is_empty() {
                self.push_block(Block::Paragraph(spans));
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        if let Some(container) = self.containers.last_mut() {
            container.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inline();
        // Unbalanced input cannot come out of pulldown-cmark, but fold any
        // dangling items back in rather than dropping text.
        while self.containers.len() > 1 {
            let blocks = self.containers.pop().unwrap_or_default();
            if let Some(parent) = self.containers.last_mut() {
                parent.extend(blocks);
            }
        }
        self.containers.pop().unwrap_or_default()
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ── Styling ─────────────────────────────────────────────────────────────────

/// Elements that receive inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Body,
    Container,
    Title,
    Heading1,
    Heading2,
    /// Level 3 and deeper.
    Heading3,
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Strong,
    Emphasis,
    Code,
    Table,
    TableCell,
    Link,
}

/// Inline CSS per [`Element`]. The default is the dark teal theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    rules: HashMap<Element, String>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let rules = [
            (Element::Body, "background:#000;color:#fff;margin:0;padding:2rem;font-family:system-ui,sans-serif"),
            (Element::Container, "background:rgba(31,41,55,0.5);border-radius:0.75rem;padding:1.5rem;color:#d1d5db"),
            (Element::Title, "font-size:1.875rem;font-weight:700;color:#5eead4;margin-bottom:2rem"),
            (Element::Heading1, "font-size:1.5rem;font-weight:700;color:#5eead4;margin:2rem 0 1rem"),
            (Element::Heading2, "font-size:1.5rem;font-weight:700;color:#5eead4;margin:2rem 0 1rem;border-bottom:1px solid #115e59;padding-bottom:0.5rem"),
            (Element::Heading3, "font-size:1.125rem;font-weight:600;color:#99f6e4;margin:1.5rem 0 0.75rem"),
            (Element::Paragraph, "color:#d1d5db;margin-bottom:1rem;line-height:1.625"),
            (Element::UnorderedList, "list-style-type:disc;margin:0 0 1.5rem 1.5rem;color:#d1d5db"),
            (Element::OrderedList, "list-style-type:decimal;margin:0 0 1.5rem 1.5rem;color:#d1d5db"),
            (Element::ListItem, "color:#d1d5db;line-height:1.625;margin-bottom:0.5rem"),
            (Element::Strong, "color:#99f6e4;font-weight:600"),
            (Element::Emphasis, "color:#d1d5db;font-style:italic"),
            (Element::Code, "font-family:monospace;background:#111827;padding:0 0.25rem"),
            (Element::Table, "border-collapse:collapse;margin-bottom:1.5rem"),
            (Element::TableCell, "border:1px solid #374151;padding:0.25rem 0.5rem"),
            (Element::Link, "color:#5eead4;text-decoration:underline"),
        ]
        .into_iter()
        .map(|(element, css)| (element, css.to_string()))
        .collect();
        Self { rules }
    }
}

impl StyleSheet {
    /// A stylesheet with no rules: plain semantic HTML.
    pub fn unstyled() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with(mut self, element: Element, css: impl Into<String>) -> Self {
        self.rules.insert(element, css.into());
        self
    }

    pub fn get(&self, element: Element) -> &str {
        self.rules.get(&element).map(String::as_str).unwrap_or("")
    }
}

fn open_tag(out: &mut String, tag: &str, styles: &StyleSheet, element: Element) {
    let css = styles.get(element);
    if css.is_empty() {
        let _ = write!(out, "<{tag}>");
    } else {
        let _ = write!(out, "<{tag} style=\"{}\">", escape_html(css));
    }
}

fn write_block(out: &mut String, block: &Block, styles: &StyleSheet) {
    match block {
        Block::Heading { level, content } => {
            let (tag, element) = match level {
                1 => ("h1", Element::Heading1),
                2 => ("h2", Element::Heading2),
                3 => ("h3", Element::Heading3),
                4 => ("h4", Element::Heading3),
                5 => ("h5", Element::Heading3),
                _ => ("h6", Element::Heading3),
            };
            open_tag(out, tag, styles, element);
            write_spans(out, content, styles);
            let _ = write!(out, "</{tag}>");
        }
        Block::Paragraph(spans) => {
            open_tag(out, "p", styles, Element::Paragraph);
            write_spans(out, spans, styles);
            out.push_str("</p>");
        }
        Block::List { start, items } => {
            let tag = match start {
                Some(n) => {
                    let css = styles.get(Element::OrderedList);
                    if *n == 1 {
                        open_tag(out, "ol", styles, Element::OrderedList);
                    } else {
                        let _ = write!(out, "<ol start=\"{n}\" style=\"{}\">", escape_html(css));
                    }
                    "ol"
                }
                None => {
                    open_tag(out, "ul", styles, Element::UnorderedList);
                    "ul"
                }
            };
            for item in items {
                open_tag(out, "li", styles, Element::ListItem);
                // A single paragraph renders inline, like a tight list.
                match item.blocks.as_slice() {
                    [Block::Paragraph(spans)] => write_spans(out, spans, styles),
                    blocks => {
                        for b in blocks {
                            write_block(out, b, styles);
                        }
                    }
                }
                out.push_str("</li>");
            }
            let _ = write!(out, "</{tag}>");
        }
        Block::Table { header, rows } => {
            open_tag(out, "table", styles, Element::Table);
            if !header.is_empty() {
                out.push_str("<thead><tr>");
                for cell in header {
                    open_tag(out, "th", styles, Element::TableCell);
                    write_spans(out, cell, styles);
                    out.push_str("</th>");
                }
                out.push_str("</tr></thead>");
            }
            out.push_str("<tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    open_tag(out, "td", styles, Element::TableCell);
                    write_spans(out, cell, styles);
                    out.push_str("</td>");
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table>");
        }
        Block::CodeBlock { text } => {
            out.push_str("<pre>");
            open_tag(out, "code", styles, Element::Code);
            out.push_str(&escape_html(text));
            out.push_str("</code></pre>");
        }
        Block::Rule => out.push_str("<hr>"),
    }
}

fn write_spans(out: &mut String, spans: &[Span], styles: &StyleSheet) {
    for span in spans {
        let mut close = Vec::new();
        if let Some(href) = &span.link {
            let _ = write!(
                out,
                "<a href=\"{}\" style=\"{}\">",
                escape_html(href),
                escape_html(styles.get(Element::Link))
            );
            close.push("</a>");
        }
        if span.strong {
            open_tag(out, "strong", styles, Element::Strong);
            close.push("</strong>");
        }
        if span.emphasis {
            open_tag(out, "em", styles, Element::Emphasis);
            close.push("</em>");
        }
        if span.strikethrough {
            out.push_str("<del>");
            close.push("</del>");
        }
        if span.code {
            open_tag(out, "code", styles, Element::Code);
            close.push("</code>");
        }
        out.push_str(&escape_html(&span.text).replace('\n', "<br>"));
        for tag in close.iter().rev() {
            out.push_str(tag);
        }
    }
}

fn write_plain_block(out: &mut String, block: &Block, depth: usize) {
    let indent = "  ".repeat(depth);
    match block {
        Block::Heading { level, content } => {
            let text = spans_text(content);
            out.push_str(&text);
            out.push('\n');
            if *level <= 2 {
                let ch = if *level == 1 { "=" } else { "-" };
                out.push_str(&ch.repeat(text.chars().count()));
                out.push('\n');
            }
            out.push('\n');
        }
        Block::Paragraph(spans) => {
            let _ = writeln!(out, "{indent}{}", spans_text(spans));
            if depth == 0 {
                out.push('\n');
            }
        }
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match start {
                    Some(n) => format!("{}.", n + i as u64),
                    None => "•".to_string(),
                };
                let mut first = true;
                for b in &item.blocks {
                    match b {
                        Block::Paragraph(spans) if first => {
                            let _ = writeln!(out, "{indent}{marker} {}", spans_text(spans));
                        }
                        other => write_plain_block(out, other, depth + 1),
                    }
                    first = false;
                }
                if item.blocks.is_empty() {
                    let _ = writeln!(out, "{indent}{marker}");
                }
            }
            if depth == 0 {
                out.push('\n');
            }
        }
        Block::Table { header, rows } => {
            if !header.is_empty() {
                let cells: Vec<String> = header.iter().map(|c| spans_text(c)).collect();
                let _ = writeln!(out, "{indent}{}", cells.join(" | "));
            }
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| spans_text(c)).collect();
                let _ = writeln!(out, "{indent}{}", cells.join(" | "));
            }
            out.push('\n');
        }
        Block::CodeBlock { text } => {
            for line in text.lines() {
                let _ = writeln!(out, "{indent}    {line}");
            }
            out.push('\n');
        }
        Block::Rule => out.push_str("----\n\n"),
    }
}

/// Concatenated text of a span run, styling dropped.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Span {
        Span {
            text: s.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_input_renders_nothing() {
        assert!(render_markdown("").is_none());
        assert!(render_markdown("  \n\t ").is_none());
        assert!(render_itinerary("\n\n").is_none());
    }

    #[test]
    fn day_structure_becomes_headings_and_list() {
        let md = "# Day 1\n\n## Morning (9:00 AM - 12:00 PM)\n- Senso-ji - Asakusa - **Free**\n- Coffee - Kissa\n";
        let r = render_markdown(md).unwrap();
        assert_eq!(r.title, ITINERARY_TITLE);
        assert_eq!(
            r.blocks[0],
            Block::Heading {
                level: 1,
                content: vec![text("Day 1")]
            }
        );
        assert!(matches!(&r.blocks[1], Block::Heading { level: 2, .. }));
        let Block::List { start, items } = &r.blocks[2] else {
            panic!("expected list, got {:?}", r.blocks[2]);
        };
        assert_eq!(*start, None);
        assert_eq!(items.len(), 2);
        let Block::Paragraph(spans) = &items[0].blocks[0] else {
            panic!("tight item should hold a paragraph");
        };
        assert_eq!(spans_text(spans), "Senso-ji - Asakusa - Free");
        assert!(spans.last().unwrap().strong);
    }

    #[test]
    fn nested_lists_are_kept() {
        let md = "- outer\n  - inner\n";
        let r = render_markdown(md).unwrap();
        let Block::List { items, .. } = &r.blocks[0] else {
            panic!()
        };
        assert_eq!(items[0].blocks.len(), 2);
        assert!(matches!(items[0].blocks[1], Block::List { .. }));
    }

    #[test]
    fn tables_and_strikethrough_render() {
        let md = "| Item | Cost |\n|---|---|\n| Ramen | ~~¥1,500~~ ¥1,200 |\n";
        let r = render_markdown(md).unwrap();
        let Block::Table { header, rows } = &r.blocks[0] else {
            panic!("expected table, got {:?}", r.blocks)
        };
        assert_eq!(spans_text(&header[1]), "Cost");
        assert!(rows[0][1][0].strikethrough);
        let html = r.to_html(&StyleSheet::unstyled());
        assert!(html.contains("<del>¥1,500</del>"));
        assert!(html.contains("<th>Item</th>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let r = render_markdown("Hello <script>alert(1)</script>").unwrap();
        let html = r.to_html(&StyleSheet::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn default_styles_apply_theme() {
        let r = render_markdown("## Morning\n\nSome *quiet* time").unwrap();
        let html = r.to_html(&StyleSheet::default());
        assert!(html.contains("<h2 style=\"font-size:1.5rem"));
        assert!(html.contains("border-bottom:1px solid #115e59"));
        assert!(html.contains("font-style:italic\">quiet</em>"));
        assert!(html.contains("Your Personalized Itinerary</h1>"));
    }

    #[test]
    fn stylesheet_overrides() {
        let styles = StyleSheet::unstyled().with(Element::Strong, "color:red");
        let r = render_markdown("**hot**").unwrap();
        let html = r.to_html(&styles);
        assert!(html.contains("<strong style=\"color:red\">hot</strong>"));
        assert!(html.contains("<p>"));
    }

    #[test]
    fn render_itinerary_normalizes_first() {
        let r = render_itinerary("\n\n# ## Day 1\n\n\n\n* # Tip: cash").unwrap();
        assert_eq!(
            r.blocks[0],
            Block::Heading {
                level: 2,
                content: vec![text("Day 1")]
            }
        );
        let Block::List { items, .. } = &r.blocks[1] else {
            panic!()
        };
        assert_eq!(items[0].blocks, vec![Block::Paragraph(vec![text("Tip: cash")])]);
    }

    #[test]
    fn plain_text_view() {
        let r = render_markdown("# Day 1\n\n- Temple\n- Lunch\n").unwrap();
        let plain = r.plain_text();
        assert!(plain.starts_with("Your Personalized Itinerary\n==="));
        assert!(plain.contains("Day 1\n=====\n"));
        assert!(plain.contains("• Temple\n• Lunch"));
    }

    #[test]
    fn html_document_wraps_fragment() {
        let r = render_markdown("# Day 1").unwrap();
        let doc = r.to_html_document(&StyleSheet::default());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Your Personalized Itinerary</title>"));
        assert!(doc.contains("<div class=\"itinerary\""));
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(escape_html("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&#39;");
    }
}

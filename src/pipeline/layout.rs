//! Page layout: display tree → positioned text lines, split into pages.
//!
//! Pure geometry, no pdfium: the writer in [`crate::pipeline::pdf`] only
//! draws what this module positions, which keeps pagination testable.
//!
//! Coordinates are PDF points (1/72 in). `y` is the baseline measured from
//! the *top* of the page; the writer flips it. Text widths are estimated
//! from an average glyph width per face, which is good enough for word
//! wrapping with the standard Helvetica and Courier faces.

use crate::config::ExportOptions;
use crate::pipeline::render::{Block, RenderedItinerary, Span};

pub const PT_PER_MM: f32 = 72.0 / 25.4;

const TITLE_SIZE: f32 = 22.0;
const BODY_SIZE: f32 = 11.0;
const CODE_SIZE: f32 = 10.0;
const LINE_SPACING: f32 = 1.4;
const BLOCK_GAP: f32 = 6.0;
const BULLET: &str = "•";
/// Left indent per list nesting level.
const LIST_INDENT_PT: f32 = 6.0 * PT_PER_MM;
/// Gap between a bullet and its text.
const BULLET_GAP_PT: f32 = 12.0;

/// Standard PDF base fonts used by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
    Courier,
}

impl FontFace {
    /// Average advance per character, as a fraction of the font size.
    fn width_factor(self) -> f32 {
        match self {
            FontFace::Regular | FontFace::Oblique => 0.52,
            FontFace::Bold | FontFace::BoldOblique => 0.56,
            FontFace::Courier => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const TEXT: Rgb = Rgb(31, 41, 55);
    pub const HEADING: Rgb = Rgb(15, 118, 110);
    pub const ACCENT: Rgb = Rgb(17, 94, 89);
}

/// A run of same-styled text starting at `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub text: String,
    pub font: FontFace,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Baseline, in points from the top edge.
    pub y: f32,
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Top and bottom margin.
    pub margin_y: f32,
    /// Left and right margin.
    pub margin_x: f32,
}

impl PageGeometry {
    pub fn from_options(options: &ExportOptions) -> Self {
        let (w, h) = options.page_size_mm();
        let (my, mx) = options.margins_mm();
        Self {
            width: w * PT_PER_MM,
            height: h * PT_PER_MM,
            margin_y: my * PT_PER_MM,
            margin_x: mx * PT_PER_MM,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    fn content_bottom(&self) -> f32 {
        self.height - self.margin_y
    }
}

/// Estimated advance of `text` in `font` at `size` points.
pub fn text_width(text: &str, font: FontFace, size: f32) -> f32 {
    text.chars().count() as f32 * size * font.width_factor()
}

/// Lay the itinerary out onto as many pages as it needs.
pub fn layout_pages(doc: &RenderedItinerary, geometry: &PageGeometry) -> Vec<PageLayout> {
    let mut cursor = Cursor::new(geometry);

    let title = Span {
        text: doc.title.clone(),
        ..Default::default()
    };
    cursor.paragraph(
        std::slice::from_ref(&title),
        0.0,
        TITLE_SIZE,
        FontFace::Bold,
        Rgb::HEADING,
    );
    cursor.gap(BLOCK_GAP * 2.0);

    for block in &doc.blocks {
        cursor.block(block, 0);
    }
    cursor.finish()
}

struct Cursor<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: PageLayout::default(),
            y: geometry.margin_y,
        }
    }

    fn block(&mut self, block: &Block, depth: usize) {
        let indent = depth as f32 * LIST_INDENT_PT;
        match block {
            Block::Heading { level, content } => {
                let (size, before) = match level {
                    1 => (20.0, 14.0),
                    2 => (16.0, 12.0),
                    _ => (13.0, 8.0),
                };
                self.gap(before);
                self.paragraph(content, indent, size, FontFace::Bold, Rgb::HEADING);
                self.gap(BLOCK_GAP);
            }
            Block::Paragraph(spans) => {
                self.paragraph(spans, indent, BODY_SIZE, FontFace::Regular, Rgb::TEXT);
                self.gap(BLOCK_GAP);
            }
            Block::List { start, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = match start {
                        Some(n) => format!("{}.", n + i as u64),
                        None => BULLET.to_string(),
                    };
                    self.list_item(&marker, &item.blocks, depth);
                }
                if depth == 0 {
                    self.gap(BLOCK_GAP);
                }
            }
            Block::Table { header, rows } => {
                if !header.is_empty() {
                    let mut spans = join_cells(header);
                    for span in &mut spans {
                        span.strong = true;
                    }
                    self.paragraph(&spans, indent, BODY_SIZE, FontFace::Regular, Rgb::TEXT);
                }
                for row in rows {
                    let spans = join_cells(row);
                    self.paragraph(&spans, indent, BODY_SIZE, FontFace::Regular, Rgb::TEXT);
                }
                self.gap(BLOCK_GAP);
            }
            Block::CodeBlock { text } => {
                let max = self.geometry.content_width() - indent;
                for line in text.lines() {
                    for chunk in split_to_width(line, FontFace::Courier, CODE_SIZE, max) {
                        let run = TextRun {
                            x: self.geometry.margin_x + indent,
                            text: chunk,
                            font: FontFace::Courier,
                            size: CODE_SIZE,
                            color: Rgb::TEXT,
                        };
                        self.line(vec![run], CODE_SIZE);
                    }
                }
                self.gap(BLOCK_GAP);
            }
            Block::Rule => self.gap(BLOCK_GAP * 2.0),
        }
    }

    fn list_item(&mut self, marker: &str, blocks: &[Block], depth: usize) {
        let left = self.geometry.margin_x + depth as f32 * LIST_INDENT_PT;
        let max = self.geometry.content_width() - depth as f32 * LIST_INDENT_PT - BULLET_GAP_PT;
        let bullet = TextRun {
            x: left,
            text: marker.to_string(),
            font: FontFace::Regular,
            size: BODY_SIZE,
            color: Rgb::ACCENT,
        };
        let mut bullet = Some(bullet);

        for block in blocks {
            let Block::Paragraph(spans) = block else {
                self.block(block, depth + 1);
                continue;
            };
            for mut runs in wrap(spans, max, BODY_SIZE, FontFace::Regular, Rgb::TEXT) {
                for run in &mut runs {
                    run.x += left + BULLET_GAP_PT;
                }
                if let Some(b) = bullet.take() {
                    runs.insert(0, b);
                }
                self.line(runs, BODY_SIZE);
            }
        }
        // Empty item: still show the bullet.
        if let Some(b) = bullet {
            self.line(vec![b], BODY_SIZE);
        }
    }

    fn paragraph(&mut self, spans: &[Span], indent: f32, size: f32, base: FontFace, color: Rgb) {
        let max = self.geometry.content_width() - indent;
        for mut runs in wrap(spans, max, size, base, color) {
            for run in &mut runs {
                run.x += self.geometry.margin_x + indent;
            }
            self.line(runs, size);
        }
    }

    fn line(&mut self, runs: Vec<TextRun>, size: f32) {
        let height = size * LINE_SPACING;
        if self.y + height > self.geometry.content_bottom() && !self.current.lines.is_empty() {
            self.new_page();
        }
        let baseline = self.y + size;
        self.current.lines.push(TextLine { y: baseline, runs });
        self.y += height;
    }

    /// Vertical space; swallowed at the top of a page.
    fn gap(&mut self, pt: f32) {
        if self.current.lines.is_empty() {
            return;
        }
        self.y += pt;
        if self.y > self.geometry.content_bottom() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = self.geometry.margin_y;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.lines.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn join_cells(cells: &[Vec<Span>]) -> Vec<Span> {
    let mut out = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(Span {
                text: " | ".to_string(),
                ..Default::default()
            });
        }
        out.extend(cell.iter().cloned());
    }
    out
}

struct Word {
    text: String,
    font: FontFace,
    color: Rgb,
    space_before: bool,
}

fn span_style(span: &Span, base: FontFace, color: Rgb) -> (FontFace, Rgb) {
    let bold = span.strong || base == FontFace::Bold;
    let font = if span.code {
        FontFace::Courier
    } else {
        match (bold, span.emphasis) {
            (true, true) => FontFace::BoldOblique,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Oblique,
            (false, false) => FontFace::Regular,
        }
    };
    let color = if (span.strong || span.link.is_some()) && color == Rgb::TEXT {
        Rgb::ACCENT
    } else {
        color
    };
    (font, color)
}

fn words(spans: &[Span], base: FontFace, color: Rgb) -> Vec<Word> {
    let mut out = Vec::new();
    let mut space = false;
    for span in spans {
        let (font, color) = span_style(span, base, color);
        let mut word = String::new();
        for ch in span.text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    out.push(Word {
                        text: std::mem::take(&mut word),
                        font,
                        color,
                        space_before: space,
                    });
                }
                space = true;
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            out.push(Word {
                text: word,
                font,
                color,
                space_before: space,
            });
            space = false;
        }
    }
    out
}

/// Greedy word wrap. Run `x` values are relative to the line start.
fn wrap(spans: &[Span], max_width: f32, size: f32, base: FontFace, color: Rgb) -> Vec<Vec<TextRun>> {
    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut x = 0.0_f32;

    for word in words(spans, base, color) {
        let mut gap = if word.space_before && !runs.is_empty() {
            text_width(" ", word.font, size)
        } else {
            0.0
        };
        let width = text_width(&word.text, word.font, size);

        if !runs.is_empty() && x + gap + width > max_width {
            lines.push(std::mem::take(&mut runs));
            x = 0.0;
            gap = 0.0;
        }

        let pieces = if width > max_width {
            split_to_width(&word.text, word.font, size, max_width)
        } else {
            vec![word.text]
        };
        let last = pieces.len().saturating_sub(1);
        for (i, piece) in pieces.into_iter().enumerate() {
            let piece_width = text_width(&piece, word.font, size);
            match runs.last_mut() {
                Some(run) if run.font == word.font && run.color == word.color => {
                    if gap > 0.0 {
                        run.text.push(' ');
                    }
                    run.text.push_str(&piece);
                }
                _ => runs.push(TextRun {
                    x: x + gap,
                    text: piece,
                    font: word.font,
                    size,
                    color: word.color,
                }),
            }
            x += gap + piece_width;
            gap = 0.0;
            if i < last {
                lines.push(std::mem::take(&mut runs));
                x = 0.0;
            }
        }
    }
    if !runs.is_empty() {
        lines.push(runs);
    }
    lines
}

/// Hard-split `text` into chunks no wider than `max_width`.
fn split_to_width(text: &str, font: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let per_char = size * font.width_factor();
    let per_line = ((max_width / per_char).floor() as usize).max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(per_line)
        .map(|c| c.iter().collect())
        .collect()
}

/// Plain text of every line on a page, for logs and tests.
pub fn page_text(page: &PageLayout) -> String {
    page.lines
        .iter()
        .map(|l| {
            l.runs
                .iter()
                .map(|r| r.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

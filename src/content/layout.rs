//! Laying portfolio content out into terminal rows.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Block, Portfolio, Section};
use crate::nav::{NAV_HEIGHT, Region, RegionRegistry};

/// Blank rows above and below every section.
const SECTION_PADDING: usize = 2;

/// What a rendered row represents, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Hero,
    Headline,
    SectionTitle,
    Rule,
    Heading,
    Meta,
    Paragraph,
    Bullet,
    Label,
    Tags,
    Link,
    FormHint,
}

/// A single row of the laid-out document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    text: String,
    kind: LineKind,
}

impl RenderedLine {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    const fn blank() -> Self {
        Self {
            text: String::new(),
            kind: LineKind::Blank,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn kind(&self) -> LineKind {
        self.kind
    }
}

/// Where a section landed in the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub id: String,
    pub title: Option<String>,
    /// First row, padding included
    pub top: usize,
    /// Rows spanned, padding included
    pub height: usize,
    /// First content row below the top padding
    pub body_top: usize,
    /// Content rows, padding excluded
    pub body_height: usize,
}

impl SectionSpan {
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.top && line < self.top + self.height
    }
}

/// Portfolio content laid out at a fixed width.
///
/// Geometry is only valid for the width it was laid out at; a resize or a
/// content reload produces a new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<RenderedLine>,
    sections: Vec<SectionSpan>,
    width: u16,
}

impl Document {
    /// Lay out `portfolio` for a content area `width` columns wide.
    pub fn layout(portfolio: &Portfolio, width: u16) -> Self {
        let wrap_width = usize::from(width.max(1));
        let mut lines = Vec::new();
        let mut sections = Vec::with_capacity(portfolio.sections.len());

        for (idx, section) in portfolio.sections.iter().enumerate() {
            let top = lines.len();
            // Leave room under the fixed nav bar above the first section.
            let padding = if idx == 0 {
                SECTION_PADDING + usize::from(NAV_HEIGHT)
            } else {
                SECTION_PADDING
            };
            lines.extend(std::iter::repeat_with(RenderedLine::blank).take(padding));
            let body_top = lines.len();
            layout_section(portfolio, section, wrap_width, &mut lines);
            let body_height = lines.len() - body_top;
            lines.extend(std::iter::repeat_with(RenderedLine::blank).take(SECTION_PADDING));
            sections.push(SectionSpan {
                id: section.id.clone(),
                title: section.title.clone(),
                top,
                height: lines.len() - top,
                body_top,
                body_height,
            });
        }

        Self {
            lines,
            sections,
            width,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Rows starting at `offset`, at most `count` of them.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = start.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionSpan> {
        self.sections.iter().find(|span| span.id == id)
    }

    /// Append blank rows so the last section can be scrolled up to just
    /// below the nav bar in a viewport `height` rows tall.
    ///
    /// Without them every section near the end of the page would clamp to
    /// the bottom and settle on whichever section sits there.
    pub fn pad_for_viewport(&mut self, height: u16) {
        let Some(last) = self.sections.last() else {
            return;
        };
        let wanted = last.body_top.saturating_sub(usize::from(NAV_HEIGHT)) + usize::from(height);
        if self.lines.len() < wanted {
            self.lines.resize_with(wanted, RenderedLine::blank);
        }
    }

    /// Section that owns a given row.
    pub fn section_at(&self, line: usize) -> Option<&SectionSpan> {
        self.sections.iter().find(|span| span.contains_line(line))
    }
}

/// Regions cover section bodies only. The padding between two bodies is
/// wider than the nav bar, so adjacent activation windows never overlap and
/// a section scrolled to just below the bar resolves to itself.
///
/// The first region also takes in its top padding so the top of the page
/// resolves to the first section.
impl RegionRegistry for Document {
    fn snapshot(&self) -> Vec<Region> {
        self.sections
            .iter()
            .enumerate()
            .map(|(idx, span)| {
                let top = if idx == 0 && span.body_height > 0 {
                    span.top
                } else {
                    span.body_top
                };
                let height = span.body_top + span.body_height - top;
                Region::new(
                    span.id.clone(),
                    i64::try_from(top).unwrap_or(i64::MAX),
                    i64::try_from(height).unwrap_or(i64::MAX),
                )
            })
            .collect()
    }
}

fn layout_section(
    portfolio: &Portfolio,
    section: &Section,
    width: usize,
    out: &mut Vec<RenderedLine>,
) {
    if let Some(title) = section.title.as_deref() {
        push_wrapped(out, title, width, LineKind::SectionTitle);
        let rule_width = UnicodeWidthStr::width(title).clamp(1, width);
        out.push(RenderedLine::new("─".repeat(rule_width), LineKind::Rule));
        out.push(RenderedLine::blank());
    }

    for (idx, block) in section.blocks.iter().enumerate() {
        if idx > 0 && needs_gap(&section.blocks[idx - 1], block) {
            out.push(RenderedLine::blank());
        }
        layout_block(portfolio, block, width, out);
    }
}

/// Consecutive links and headings followed by their meta line stay together.
const fn needs_gap(prev: &Block, next: &Block) -> bool {
    !matches!(
        (prev, next),
        (Block::Link { .. }, Block::Link { .. })
            | (Block::Heading { .. }, Block::Meta { .. } | Block::Bullets { .. })
            | (Block::Meta { .. }, Block::Meta { .. })
            | (Block::Tags { .. }, Block::Tags { .. })
    )
}

fn layout_block(portfolio: &Portfolio, block: &Block, width: usize, out: &mut Vec<RenderedLine>) {
    match block {
        Block::Hero => {
            push_wrapped(out, &format!("Hi, I'm {}", portfolio.owner), width, LineKind::Hero);
            if !portfolio.headline.is_empty() {
                push_wrapped(out, &portfolio.headline, width, LineKind::Headline);
            }
        }
        Block::Paragraph { text } => push_wrapped(out, text, width, LineKind::Paragraph),
        Block::Heading { text } => push_wrapped(out, text, width, LineKind::Heading),
        Block::Meta { text } => push_wrapped(out, text, width, LineKind::Meta),
        Block::Bullets { items } => push_bullets(out, items, width),
        Block::Tags { label, items } => {
            if let Some(label) = label {
                push_wrapped(out, label, width, LineKind::Label);
            }
            push_tags(out, items, width);
        }
        Block::Entry {
            title,
            meta,
            text,
            tags,
            bullets,
        } => {
            push_wrapped(out, title, width, LineKind::Heading);
            if let Some(meta) = meta {
                push_wrapped(out, meta, width, LineKind::Meta);
            }
            if let Some(text) = text {
                push_wrapped(out, text, width, LineKind::Paragraph);
            }
            if !tags.is_empty() {
                push_tags(out, tags, width);
            }
            push_bullets(out, bullets, width);
        }
        Block::Link { label, url } => {
            let text = format!("{label}  <{url}>");
            for line in wrap_text(&text, width, "→ ", "  ") {
                out.push(RenderedLine::new(line, LineKind::Link));
            }
        }
        Block::ContactForm => {
            for line in wrap_text("Press c to send a message", width, "✉ ", "  ") {
                out.push(RenderedLine::new(line, LineKind::FormHint));
            }
        }
    }
}

fn push_wrapped(out: &mut Vec<RenderedLine>, text: &str, width: usize, kind: LineKind) {
    for line in wrap_text(text, width, "", "") {
        out.push(RenderedLine::new(line, kind));
    }
}

fn push_bullets(out: &mut Vec<RenderedLine>, items: &[String], width: usize) {
    for item in items {
        for line in wrap_text(item, width, "• ", "  ") {
            out.push(RenderedLine::new(line, LineKind::Bullet));
        }
    }
}

fn push_tags(out: &mut Vec<RenderedLine>, items: &[String], width: usize) {
    let chips: Vec<String> = items.iter().map(|tag| format!("[{tag}]")).collect();
    for line in wrap_words(chips.iter().map(String::as_str), width, "", "") {
        out.push(RenderedLine::new(line, LineKind::Tags));
    }
}

/// Word-wrap `text` to `width` display columns.
///
/// The first row starts with `first_prefix` and continuation rows with
/// `rest_prefix`. Words wider than a row are split by character.
pub fn wrap_text(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> Vec<String> {
    wrap_words(text.split_whitespace(), width, first_prefix, rest_prefix)
}

/// Wrap pre-split units, keeping each unit on one row where it fits.
pub fn wrap_words<'a>(
    words: impl IntoIterator<Item = &'a str>,
    width: usize,
    first_prefix: &str,
    rest_prefix: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = first_prefix.to_string();
    let mut current_width = UnicodeWidthStr::width(first_prefix);
    let rest_width = UnicodeWidthStr::width(rest_prefix);
    let mut has_content = false;

    for word in words {
        let word_width = UnicodeWidthStr::width(word);
        if has_content && current_width + 1 + word_width > width {
            lines.push(current.trim_end().to_string());
            current = rest_prefix.to_string();
            current_width = rest_width;
            has_content = false;
        }
        if has_content {
            current.push(' ');
            current_width += 1;
        }
        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
        } else {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if has_content && current_width + ch_width > width {
                    lines.push(current.trim_end().to_string());
                    current = rest_prefix.to_string();
                    current_width = rest_width;
                }
                current.push(ch);
                current_width += ch_width;
                has_content = true;
            }
        }
        has_content = true;
    }

    if has_content || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

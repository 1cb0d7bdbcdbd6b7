// src/layout/flow.rs
//! Typesetting and pagination.
//!
//! Blocks are broken into fixed-height items, then poured into the page
//! frames: left frame, right frame, next page. A column break jumps to the
//! next frame. Gaps are dropped at the top of a frame.

use super::blocks::{Block, Paragraph, Picture, RatingGlyph, RatingLine, Segment};
use super::geometry::{Frame, PageGeometry};
use super::style::{text_width, Color, Emphasis, FontFace, PillStyle};

/// Advance of one rating glyph, relative to the font size
pub const GLYPH_ADVANCE: f32 = 0.9;
pub const PILL_LINE_FACTOR: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub face: FontFace,
    /// Offset from the start of the line
    pub x: f32,
}

#[derive(Debug, Clone)]
pub enum Item {
    Line {
        spans: Vec<Span>,
        size: f32,
        color: Color,
        height: f32,
    },
    Pill {
        lines: Vec<String>,
        style: PillStyle,
        width: f32,
        height: f32,
    },
    Rating {
        lead: Option<Span>,
        glyph: RatingGlyph,
        count: usize,
        glyph_x: f32,
        trail: Option<Span>,
        size: f32,
        color: Color,
        height: f32,
    },
    Picture {
        picture: Picture,
    },
    Gap(f32),
    ColumnBreak,
}

impl Item {
    pub fn height(&self) -> f32 {
        match self {
            Item::Line { height, .. } | Item::Pill { height, .. } | Item::Rating { height, .. } => {
                *height
            }
            Item::Picture { picture } => picture.height,
            Item::Gap(height) => *height,
            Item::ColumnBreak => 0.0,
        }
    }
}

/// Item positioned on a page
#[derive(Debug, Clone)]
pub struct Placed {
    pub item: Item,
    pub frame: usize,
    pub x: f32,
    pub top: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub placed: Vec<Placed>,
}

/// Greedy word wrap of styled segments into lines of spans
fn wrap_segments(
    segments: &[(String, FontFace)],
    breaks_after: &[usize],
    size: f32,
    max_width: f32,
) -> Vec<Vec<Span>> {
    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut line: Vec<Span> = Vec::new();
    let mut cursor = 0.0_f32;

    for (index, (text, face)) in segments.iter().enumerate() {
        for piece in text.split_inclusive(' ') {
            let visible = text_width(piece.trim_end(), *face, size);
            let piece = if !line.is_empty() && cursor + visible > max_width {
                lines.push(std::mem::take(&mut line));
                cursor = 0.0;
                piece.trim_start()
            } else {
                piece
            };
            if piece.is_empty() {
                continue;
            }

            match line.last_mut() {
                Some(last) if last.face == *face => last.text.push_str(piece),
                _ => line.push(Span {
                    text: piece.to_string(),
                    face: *face,
                    x: cursor,
                }),
            }
            cursor += text_width(piece, *face, size);
        }

        if breaks_after.contains(&index) {
            lines.push(std::mem::take(&mut line));
            cursor = 0.0;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn paragraph_items(paragraph: &Paragraph, width: f32, items: &mut Vec<Item>) {
    let style = paragraph.style.style();

    // Flatten to (text, face) runs, remembering where explicit breaks fall
    let mut runs: Vec<(String, FontFace)> = Vec::new();
    let mut breaks_after: Vec<usize> = Vec::new();
    for segment in &paragraph.segments {
        match segment {
            Segment::Text(text, emphasis) => {
                let emphasis = match emphasis {
                    Emphasis::Regular => style.base,
                    other => *other,
                };
                runs.push((text.clone(), style.family.face(emphasis)));
            }
            Segment::Break => {
                // A break before any text still needs an anchor run
                if runs.is_empty() || breaks_after.last() == Some(&(runs.len() - 1)) {
                    runs.push((String::new(), style.family.face(style.base)));
                }
                breaks_after.push(runs.len() - 1);
            }
        }
    }

    for spans in wrap_segments(&runs, &breaks_after, style.size, width) {
        items.push(Item::Line {
            spans,
            size: style.size,
            color: style.color,
            height: style.line_height(),
        });
    }
    if style.space_after > 0.0 {
        items.push(Item::Gap(style.space_after));
    }
}

fn pill_items(text: &str, style: PillStyle, width: f32, items: &mut Vec<Item>) {
    let inner = width - 2.0 * style.padding;
    let lines: Vec<String> = wrap_segments(&[(text.to_string(), style.face)], &[], style.size, inner)
        .into_iter()
        .map(|spans| spans.into_iter().map(|s| s.text).collect::<String>())
        .collect();
    let height = lines.len().max(1) as f32 * style.size * PILL_LINE_FACTOR + 2.0 * style.padding;

    items.push(Item::Pill {
        lines,
        style,
        width,
        height,
    });
    items.push(Item::Gap(style.space_after));
}

fn rating_items(line: &RatingLine, items: &mut Vec<Item>) {
    let style = line.style.style();
    let face = style.family.face(style.base);
    let lead_width = text_width(&line.lead, face, style.size);
    let glyphs_width = line.count as f32 * style.size * GLYPH_ADVANCE;

    let lead = (!line.lead.is_empty()).then(|| Span {
        text: line.lead.clone(),
        face,
        x: 0.0,
    });
    let trail = (!line.trail.is_empty()).then(|| Span {
        text: line.trail.clone(),
        face,
        x: lead_width + glyphs_width,
    });

    items.push(Item::Rating {
        lead,
        glyph: line.glyph,
        count: line.count,
        glyph_x: lead_width,
        trail,
        size: style.size,
        color: style.color,
        height: style.line_height(),
    });
    if style.space_after > 0.0 {
        items.push(Item::Gap(style.space_after));
    }
}

/// Break blocks into items for a frame of the given content width
pub fn typeset(blocks: &[Block], width: f32) -> Vec<Item> {
    let mut items = Vec::new();
    for block in blocks {
        match block {
            Block::Picture(picture) => items.push(Item::Picture {
                picture: picture.clone(),
            }),
            Block::Paragraph(paragraph) => paragraph_items(paragraph, width, &mut items),
            Block::Pill { kind, text } => pill_items(text, kind.style(), width, &mut items),
            Block::Rating(line) => rating_items(line, &mut items),
            Block::Spacer(height) => items.push(Item::Gap(*height)),
            Block::ColumnBreak => items.push(Item::ColumnBreak),
        }
    }
    items
}

struct Cursor {
    pages: Vec<PageLayout>,
    frame: usize,
    top: f32,
    fresh: bool,
}

impl Cursor {
    fn advance(&mut self, frames: &[Frame; 2]) {
        self.frame += 1;
        if self.frame == frames.len() {
            self.frame = 0;
            self.pages.push(PageLayout::default());
        }
        self.top = frames[self.frame].content_top();
        self.fresh = true;
    }
}

/// Pour items into frames. Always returns at least one page.
pub fn paginate(items: Vec<Item>, geometry: &PageGeometry) -> Vec<PageLayout> {
    let frames = geometry.frames();
    let mut cursor = Cursor {
        pages: vec![PageLayout::default()],
        frame: 0,
        top: frames[0].content_top(),
        fresh: true,
    };

    for item in items {
        match item {
            Item::ColumnBreak => cursor.advance(&frames),
            Item::Gap(height) => {
                if !cursor.fresh {
                    cursor.top -= height;
                }
            }
            item => {
                let height = item.height();
                let frame = frames[cursor.frame];
                if !cursor.fresh && cursor.top - height < frame.content_bottom() {
                    cursor.advance(&frames);
                }
                let frame = frames[cursor.frame];
                let placed = Placed {
                    item,
                    frame: cursor.frame,
                    x: frame.content_x(),
                    top: cursor.top,
                    width: frame.content_width(),
                };
                if let Some(page) = cursor.pages.last_mut() {
                    page.placed.push(placed);
                }
                cursor.top -= height;
                cursor.fresh = false;
            }
        }
    }

    cursor.pages
}

/// Content width shared by both frames
pub fn frame_width(geometry: &PageGeometry) -> f32 {
    geometry.left_frame().content_width()
}

/// Plain-text view of a laid-out line, for diagnostics
pub fn line_text(item: &Item) -> Option<String> {
    match item {
        Item::Line { spans, .. } => Some(spans.iter().map(|s| s.text.as_str()).collect()),
        Item::Rating {
            lead, glyph, count, trail, ..
        } => Some(format!(
            "{}{}{}",
            lead.as_ref().map(|s| s.text.as_str()).unwrap_or(""),
            super::blocks::glyph_run(*glyph, *count as i64),
            trail.as_ref().map(|s| s.text.as_str()).unwrap_or("")
        )),
        _ => None,
    }
}

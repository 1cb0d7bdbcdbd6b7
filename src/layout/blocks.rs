// src/layout/blocks.rs
//! Section composition: turns a profile record into an ordered list of blocks.

use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

use super::style::{Emphasis, PillKind, StyleKind};
use crate::types::profile::ProfileRecord;

/// 0.1 inch
pub const SECTION_SPACER: f32 = 7.2;

const SKILL_LEGEND: [(usize, &str); 5] = [
    (1, "Junior"),
    (2, "Intermediate"),
    (3, "Senior"),
    (4, "Expert"),
    (5, "Master"),
];
const LANGUAGE_LEGEND: [(usize, &str); 2] = [(1, "A1"), (5, "C1")];

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String, Emphasis),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: StyleKind,
    pub segments: Vec<Segment>,
}

impl Paragraph {
    pub fn new(style: StyleKind) -> Self {
        Self {
            style,
            segments: Vec::new(),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into(), Emphasis::Regular));
        self
    }

    pub fn bold(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into(), Emphasis::Bold));
        self
    }

    pub fn italic(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into(), Emphasis::Italic));
        self
    }

    pub fn line_break(mut self) -> Self {
        self.segments.push(Segment::Break);
        self
    }

    /// Text content with breaks as newlines
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text, _) => text.as_str(),
                Segment::Break => "\n",
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingGlyph {
    Dot,
    Star,
}

impl RatingGlyph {
    pub fn symbol(self) -> char {
        match self {
            RatingGlyph::Dot => '●',
            RatingGlyph::Star => '★',
        }
    }
}

/// `level` copies of the glyph; zero or negative levels give an empty run
pub fn glyph_run(glyph: RatingGlyph, level: i64) -> String {
    let count = usize::try_from(level).unwrap_or(0);
    std::iter::repeat(glyph.symbol()).take(count).collect()
}

/// A line made of a text lead, a glyph run and a text trail
#[derive(Debug, Clone, PartialEq)]
pub struct RatingLine {
    pub style: StyleKind,
    pub lead: String,
    pub glyph: RatingGlyph,
    pub count: usize,
    pub trail: String,
}

impl RatingLine {
    pub fn new(style: StyleKind, lead: impl Into<String>, glyph: RatingGlyph, level: i64) -> Self {
        Self {
            style,
            lead: lead.into(),
            glyph,
            count: usize::try_from(level).unwrap_or(0),
            trail: String::new(),
        }
    }

    pub fn with_trail(mut self, trail: impl Into<String>) -> Self {
        self.trail = trail.into();
        self
    }
}

impl fmt::Display for RatingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyphs = glyph_run(self.glyph, self.count as i64);
        write!(f, "{}{}{}", self.lead, glyphs, self.trail)
    }
}

/// Raster placed in the flow, sized in points
#[derive(Debug, Clone)]
pub struct Picture {
    pub image: Arc<DynamicImage>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub enum Block {
    Picture(Picture),
    Paragraph(Paragraph),
    Pill { kind: PillKind, text: String },
    Rating(RatingLine),
    Spacer(f32),
    ColumnBreak,
}

fn section_header(title: &str) -> Block {
    Block::Paragraph(Paragraph::new(StyleKind::Header).line_break().text(title))
}

/// Lay out every section in its fixed order. Empty sections are omitted.
pub fn compose(profile: &ProfileRecord, avatar: Option<Picture>) -> Vec<Block> {
    let mut blocks = Vec::new();

    if let Some(picture) = avatar {
        blocks.push(Block::Picture(picture));
        blocks.push(Block::Spacer(SECTION_SPACER));
    }

    blocks.push(Block::Paragraph(
        Paragraph::new(StyleKind::Name).text(&profile.name),
    ));
    blocks.push(Block::Paragraph(
        Paragraph::new(StyleKind::Title).text(&profile.title),
    ));

    let contact = &profile.contact;
    blocks.push(Block::Paragraph(
        Paragraph::new(StyleKind::Detail)
            .bold("Address:")
            .text(format!(" {}", contact.address))
            .line_break()
            .bold("Phone:")
            .text(format!(" {}", contact.phone))
            .line_break()
            .bold("Email:")
            .text(format!(" {}", contact.email))
            .line_break()
            .bold("LinkedIn:")
            .text(format!(" {}", contact.linkedin))
            .line_break()
            .bold("GitHub:")
            .text(format!(" {}", contact.github)),
    ));

    if !profile.about.is_empty() {
        blocks.push(section_header("ABOUT ME"));
        blocks.push(Block::Paragraph(
            Paragraph::new(StyleKind::Normal).text(profile.about.join(" ")),
        ));
    }

    if !profile.experience.is_empty() {
        blocks.push(section_header("EXPERIENCE"));
        for item in &profile.experience {
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Detail)
                    .bold(format!("{} at {}'s", item.title, item.company))
                    .text(format!(" {} Team", item.team))
                    .line_break(),
            ));
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Minimal).text(&item.date),
            ));
            if !item.sectors.is_empty() {
                blocks.push(Block::Pill {
                    kind: PillKind::Sectors,
                    text: item.sectors.join(" | "),
                });
            }
            if !item.technologies.is_empty() {
                blocks.push(Block::Pill {
                    kind: PillKind::Technologies,
                    text: item.technologies.join(" | "),
                });
            }
            blocks.push(Block::Spacer(SECTION_SPACER));
        }
    }

    blocks.push(Block::ColumnBreak);

    if !profile.education.is_empty() {
        blocks.push(section_header("EDUCATION"));
        for education in &profile.education {
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Normal)
                    .bold(&education.degree)
                    .text(format!(" from {} ", education.institution))
                    .italic(format!("({})", education.date)),
            ));
            blocks.push(Block::Spacer(SECTION_SPACER));
        }
    }

    if !profile.certificates.is_empty() {
        blocks.push(section_header("CERTIFICATES"));
        for certificate in &profile.certificates {
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Normal)
                    .bold(&certificate.name)
                    .text(format!(" by {}", certificate.authority)),
            ));
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Minimal).text(&certificate.date),
            ));
        }
    }

    if !profile.projects.is_empty() {
        blocks.push(section_header("PROJECTS"));
        for project in &profile.projects {
            let mut paragraph = Paragraph::new(StyleKind::Bullet)
                .bold(&project.title)
                .line_break();
            for (index, line) in project.description.lines().into_iter().enumerate() {
                if index > 0 {
                    paragraph = paragraph.line_break();
                }
                paragraph = paragraph.text(format!(" • {}", line));
            }
            blocks.push(Block::Paragraph(paragraph));
        }
    }

    if !profile.skills.is_empty() {
        blocks.push(section_header("SKILLS"));
        for (level, label) in SKILL_LEGEND {
            blocks.push(Block::Rating(
                RatingLine::new(StyleKind::Minimal, "", RatingGlyph::Dot, level as i64)
                    .with_trail(format!(" = {}", label)),
            ));
        }
        for (category, skills) in profile.skills.iter() {
            blocks.push(Block::Paragraph(
                Paragraph::new(StyleKind::Header).text(format!("{} Skills", category)),
            ));
            for (skill, level) in skills.iter() {
                blocks.push(Block::Rating(RatingLine::new(
                    StyleKind::Detail,
                    format!("{}: ", skill),
                    RatingGlyph::Dot,
                    *level,
                )));
            }
            blocks.push(Block::Spacer(SECTION_SPACER));
        }
    }

    if !profile.languages.is_empty() {
        blocks.push(section_header("LANGUAGES"));
        for (level, label) in LANGUAGE_LEGEND {
            blocks.push(Block::Rating(
                RatingLine::new(StyleKind::Minimal, "", RatingGlyph::Star, level as i64)
                    .with_trail(format!(" = {}", label)),
            ));
        }
        for (language, level) in profile.languages.iter() {
            blocks.push(Block::Rating(RatingLine::new(
                StyleKind::Detail,
                format!("{}: ", language),
                RatingGlyph::Star,
                *level,
            )));
        }
        blocks.push(Block::Spacer(SECTION_SPACER));
    }

    blocks
}

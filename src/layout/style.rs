// src/layout/style.rs
//! Paragraph styles and approximate text metrics for the built-in PDF fonts.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const BAND: Color = Color::rgb(0.91, 0.91, 0.91);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// #333333
pub const INK: Color = Color::rgb(0.2, 0.2, 0.2);
/// #666666
pub const MUTED: Color = Color::rgb(0.4, 0.4, 0.4);
/// #00686E
pub const ACCENT: Color = Color::rgb(0.0, 0.408, 0.431);
/// #D6EAF8
pub const PALE_BLUE: Color = Color::rgb(0.839, 0.918, 0.973);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Helvetica,
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Times,
    TimesBold,
    TimesItalic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Regular,
    Bold,
    Italic,
}

impl Family {
    pub fn face(self, emphasis: Emphasis) -> FontFace {
        match (self, emphasis) {
            (Family::Helvetica, Emphasis::Regular) => FontFace::Helvetica,
            (Family::Helvetica, Emphasis::Bold) => FontFace::HelveticaBold,
            (Family::Helvetica, Emphasis::Italic) => FontFace::HelveticaOblique,
            (Family::Times, Emphasis::Regular) => FontFace::Times,
            (Family::Times, Emphasis::Bold) => FontFace::TimesBold,
            (Family::Times, Emphasis::Italic) => FontFace::TimesItalic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub leading: f32,
    pub space_after: f32,
    pub color: Color,
    pub family: Family,
    /// Emphasis used for unmarked text
    pub base: Emphasis,
}

impl TextStyle {
    /// Height of one line; never less than the font size
    pub fn line_height(&self) -> f32 {
        self.leading.max(self.size)
    }
}

/// Named paragraph styles used by the résumé sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Name,
    Title,
    Header,
    Normal,
    Bullet,
    Detail,
    Minimal,
}

impl StyleKind {
    pub fn style(self) -> TextStyle {
        match self {
            StyleKind::Name => TextStyle {
                size: 18.0,
                leading: 10.0,
                space_after: 10.0,
                color: INK,
                family: Family::Helvetica,
                base: Emphasis::Bold,
            },
            StyleKind::Title => TextStyle {
                size: 14.0,
                leading: 18.0,
                space_after: 8.0,
                color: MUTED,
                family: Family::Helvetica,
                base: Emphasis::Bold,
            },
            StyleKind::Header => TextStyle {
                size: 12.0,
                leading: 7.0,
                space_after: 7.0,
                color: ACCENT,
                family: Family::Helvetica,
                base: Emphasis::Bold,
            },
            StyleKind::Normal => TextStyle {
                size: 10.0,
                leading: 10.0,
                space_after: 0.0,
                color: INK,
                family: Family::Helvetica,
                base: Emphasis::Regular,
            },
            StyleKind::Bullet => TextStyle {
                size: 9.0,
                leading: 10.0,
                space_after: 10.0,
                color: INK,
                family: Family::Helvetica,
                base: Emphasis::Regular,
            },
            StyleKind::Detail => TextStyle {
                size: 10.0,
                leading: 10.0,
                space_after: 0.0,
                color: INK,
                family: Family::Times,
                base: Emphasis::Regular,
            },
            StyleKind::Minimal => TextStyle {
                size: 8.0,
                leading: 7.0,
                space_after: 10.0,
                color: INK,
                family: Family::Times,
                base: Emphasis::Regular,
            },
        }
    }
}

/// Filled label rows under each experience entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillKind {
    Sectors,
    Technologies,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillStyle {
    pub size: f32,
    pub padding: f32,
    pub space_after: f32,
    pub text: Color,
    pub fill: Color,
    pub face: FontFace,
}

impl PillKind {
    pub fn style(self) -> PillStyle {
        let (text, fill) = match self {
            PillKind::Sectors => (Color::WHITE, ACCENT),
            PillKind::Technologies => (Color::BLACK, PALE_BLUE),
        };
        PillStyle {
            size: 8.0,
            padding: 6.0,
            space_after: 5.0,
            text,
            fill,
            face: FontFace::HelveticaBold,
        }
    }
}

/// Approximate advance width of one character in em units
fn char_em(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | 'I' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' => 0.36,
        'm' | 'w' | 'M' | 'W' | '@' => 0.83,
        '0'..='9' => 0.556,
        'A'..='Z' => 0.68,
        'a'..='z' => 0.52,
        _ => 0.6,
    }
}

/// Estimated width of `text` in points
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let factor = match face {
        FontFace::Helvetica | FontFace::HelveticaOblique => 1.0,
        FontFace::HelveticaBold => 1.06,
        FontFace::Times | FontFace::TimesItalic => 0.9,
        FontFace::TimesBold => 0.95,
    };
    text.chars().map(char_em).sum::<f32>() * size * factor
}

// src/layout/pdf.rs
//! Draws paginated layouts with printpdf.
//!
//! Coordinates stay in points until the last moment; printpdf takes `Mm`.

use anyhow::{anyhow, Result};
use image::DynamicImage;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

use super::blocks::RatingGlyph;
use super::flow::{Item, PageLayout, Placed, Span, GLYPH_ADVANCE, PILL_LINE_FACTOR};
use super::geometry::{Circle, PageGeometry, Rect};
use super::style::{Color, FontFace};

const CIRCLE_SEGMENTS: usize = 64;
const STAR_INNER_RATIO: f32 = 0.4;

/// Logo drawn behind the content of every page
pub struct Watermark {
    pub image: DynamicImage,
    pub rect: Rect,
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn point(x: f32, y: f32) -> Point {
    Point::new(mm(x), mm(y))
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

fn fill_polygon(layer: &PdfLayerReference, points: Vec<(f32, f32)>, color: Color) {
    layer.set_fill_color(pdf_color(color));
    layer.add_polygon(Polygon {
        rings: vec![points.into_iter().map(|(x, y)| (point(x, y), false)).collect()],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn fill_rect(layer: &PdfLayerReference, rect: Rect, color: Color) {
    fill_polygon(
        layer,
        vec![
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.top()),
            (rect.x, rect.top()),
        ],
        color,
    );
}

fn fill_circle(layer: &PdfLayerReference, circle: Circle, color: Color) {
    let points = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            (
                circle.cx + circle.radius * angle.cos(),
                circle.cy + circle.radius * angle.sin(),
            )
        })
        .collect();
    fill_polygon(layer, points, color);
}

/// Five-pointed star with its top point straight up
fn fill_star(layer: &PdfLayerReference, cx: f32, cy: f32, radius: f32, color: Color) {
    let points = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 {
                radius
            } else {
                radius * STAR_INNER_RATIO
            };
            let angle = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    fill_polygon(layer, points, color);
}

fn draw_image(layer: &PdfLayerReference, image: &DynamicImage, rect: Rect) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    // At 72 dpi one pixel is one point
    Image::from_dynamic_image(image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(rect.x)),
            translate_y: Some(mm(rect.y)),
            scale_x: Some(rect.width / image.width() as f32),
            scale_y: Some(rect.height / image.height() as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

struct Fonts(HashMap<FontFace, IndirectFontRef>);

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let faces = [
            (FontFace::Helvetica, BuiltinFont::Helvetica),
            (FontFace::HelveticaBold, BuiltinFont::HelveticaBold),
            (FontFace::HelveticaOblique, BuiltinFont::HelveticaOblique),
            (FontFace::Times, BuiltinFont::TimesRoman),
            (FontFace::TimesBold, BuiltinFont::TimesBold),
            (FontFace::TimesItalic, BuiltinFont::TimesItalic),
        ];
        let mut fonts = HashMap::new();
        for (face, builtin) in faces {
            let font = doc
                .add_builtin_font(builtin)
                .map_err(|e| anyhow!("PDF font error: {}", e))?;
            fonts.insert(face, font);
        }
        Ok(Self(fonts))
    }

    fn get(&self, face: FontFace) -> Result<&IndirectFontRef> {
        self.0
            .get(&face)
            .ok_or_else(|| anyhow!("Font not loaded: {:?}", face))
    }
}

fn draw_spans(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    spans: &[&Span],
    x: f32,
    baseline: f32,
    size: f32,
    color: Color,
) -> Result<()> {
    layer.set_fill_color(pdf_color(color));
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        let font = fonts.get(span.face)?;
        layer.use_text(span.text.as_str(), size, mm(x + span.x), mm(baseline), font);
    }
    Ok(())
}

pub struct PdfRenderer {
    geometry: PageGeometry,
    title: String,
}

impl PdfRenderer {
    pub fn new(geometry: PageGeometry, title: impl Into<String>) -> Self {
        Self {
            geometry,
            title: title.into(),
        }
    }

    /// Draw every page and write the document into `output`
    pub fn render(
        &self,
        pages: &[PageLayout],
        watermark: Option<&Watermark>,
        output: File,
    ) -> Result<()> {
        let width = mm(self.geometry.page_width);
        let height = mm(self.geometry.page_height);
        let (doc, first_page, first_layer) = PdfDocument::new(&self.title, width, height, "Layer 1");
        let fonts = Fonts::load(&doc)?;

        for (index, page) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = doc.add_page(width, height, "Layer 1");
                doc.get_page(page_index).get_layer(layer_index)
            };

            self.draw_background(&layer, watermark);
            for placed in &page.placed {
                self.draw_placed(&layer, &fonts, placed)?;
            }
        }

        let mut writer = BufWriter::new(output);
        doc.save(&mut writer)
            .map_err(|e| anyhow!("PDF save error: {}", e))?;
        Ok(())
    }

    fn draw_background(&self, layer: &PdfLayerReference, watermark: Option<&Watermark>) {
        fill_rect(layer, self.geometry.background_band(), Color::BAND);
        fill_circle(layer, self.geometry.background_mask(), Color::WHITE);
        if let Some(watermark) = watermark {
            draw_image(layer, &watermark.image, watermark.rect);
        }
    }

    fn draw_placed(&self, layer: &PdfLayerReference, fonts: &Fonts, placed: &Placed) -> Result<()> {
        let (x, top) = (placed.x, placed.top);
        match &placed.item {
            Item::Line {
                spans, size, color, ..
            } => {
                let spans: Vec<&Span> = spans.iter().collect();
                draw_spans(layer, fonts, &spans, x, top - size, *size, *color)?;
            }
            Item::Pill {
                lines,
                style,
                width,
                height,
            } => {
                fill_rect(
                    layer,
                    Rect {
                        x,
                        y: top - height,
                        width: *width,
                        height: *height,
                    },
                    style.fill,
                );
                layer.set_fill_color(pdf_color(style.text));
                let font = fonts.get(style.face)?;
                for (row, line) in lines.iter().enumerate() {
                    let baseline =
                        top - style.padding - style.size - row as f32 * style.size * PILL_LINE_FACTOR;
                    layer.use_text(line.as_str(), style.size, mm(x + style.padding), mm(baseline), font);
                }
            }
            Item::Rating {
                lead,
                glyph,
                count,
                glyph_x,
                trail,
                size,
                color,
                ..
            } => {
                let baseline = top - size;
                let spans: Vec<&Span> = lead.iter().chain(trail.iter()).collect();
                draw_spans(layer, fonts, &spans, x, baseline, *size, *color)?;

                let advance = size * GLYPH_ADVANCE;
                let radius = size * 0.35;
                for i in 0..*count {
                    let cx = x + glyph_x + advance * (i as f32 + 0.5);
                    let cy = baseline + radius;
                    match glyph {
                        RatingGlyph::Dot => fill_circle(layer, Circle { cx, cy, radius }, *color),
                        RatingGlyph::Star => fill_star(layer, cx, cy, size * 0.45, *color),
                    }
                }
            }
            Item::Picture { picture } => {
                // Centered in its frame
                let rect = Rect {
                    x: x + (placed.width - picture.width).max(0.0) / 2.0,
                    y: top - picture.height,
                    width: picture.width,
                    height: picture.height,
                };
                draw_image(layer, &picture.image, rect);
            }
            Item::Gap(_) | Item::ColumnBreak => {}
        }
        Ok(())
    }
}

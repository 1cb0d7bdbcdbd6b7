// src/watermark.rs
//! Translucent copies of company logos for use as page backgrounds.
//!
//! Scaling is left to the caller; this module only touches the alpha channel.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Opacity applied to company logos drawn behind the page content
pub const WATERMARK_OPACITY: f32 = 0.1;

pub struct WatermarkCompositor;

impl WatermarkCompositor {
    /// Write a translucent copy of `image_path` next to it and return the new path.
    /// The caller owns the returned file and must delete it.
    pub fn make_translucent(image_path: &Path, opacity: f32) -> Result<PathBuf> {
        let source = image::open(image_path)
            .with_context(|| format!("Failed to decode image: {}", image_path.display()))?;

        let translucent = Self::apply_opacity(&source, opacity);
        let temp_path = Self::temp_path_for(image_path);
        translucent
            .save_with_format(&temp_path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;

        Ok(temp_path)
    }

    /// Multiply every alpha sample by `opacity` (clamped to 0..=1).
    /// Images without alpha get a fully opaque channel first.
    pub fn apply_opacity(image: &DynamicImage, opacity: f32) -> RgbaImage {
        let opacity = opacity.clamp(0.0, 1.0);
        let mut rgba = image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            pixel[3] = (f32::from(pixel[3]) * opacity) as u8;
        }
        rgba
    }

    /// `dir/Acme.jpg` -> `dir/temp_Acme.png`
    pub fn temp_path_for(image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        image_path.with_file_name(format!("temp_{}.png", stem))
    }

    /// Blend onto a white page so the result can be embedded without a soft mask
    pub fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let alpha = f32::from(a) / 255.0;
            let blend = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
            Rgb([blend(r), blend(g), blend(b)])
        })
    }
}

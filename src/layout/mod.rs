// src/layout/mod.rs
//! Two-column résumé documents.
//!
//! The engine composes sections into blocks, typesets them into fixed-height
//! items, pours those into page frames and hands the pages to the PDF
//! renderer. The output file is claimed with exclusive-create before drawing.

pub mod blocks;
pub mod flow;
pub mod geometry;
pub mod pdf;
pub mod style;

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_log;
use crate::core::artifact_namer::claim_unique;
use crate::core::FsOps;
use crate::types::profile::ProfileRecord;
use crate::utils::file_stem;
use crate::watermark::{WatermarkCompositor, WATERMARK_OPACITY};

use blocks::Picture;
use geometry::PageGeometry;
use pdf::{PdfRenderer, Watermark};

#[derive(Debug, Clone)]
pub struct DocumentLayoutEngine {
    geometry: PageGeometry,
    /// Directory the profile's relative paths (avatar) are resolved against
    base_dir: PathBuf,
}

impl Default for DocumentLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLayoutEngine {
    pub fn new() -> Self {
        Self {
            geometry: PageGeometry::default(),
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(mut self, base_dir: PathBuf) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// Render `profile` into `output_path`, or a token-suffixed sibling of it
    /// when that name is taken. Returns the path actually written.
    pub fn render(
        &self,
        output_path: &Path,
        profile: &ProfileRecord,
        branding_image: Option<&Path>,
    ) -> Result<PathBuf> {
        // Decode everything before claiming, so a bad logo leaves no empty file behind
        let watermark = branding_image
            .map(|path| self.prepare_watermark(path))
            .transpose()?;
        let avatar = self.load_avatar(&profile.avatar);

        let (file, claimed) = claim_unique(output_path)?;

        let blocks = blocks::compose(profile, avatar);
        let items = flow::typeset(&blocks, flow::frame_width(&self.geometry));
        let pages = flow::paginate(items, &self.geometry);

        let renderer = PdfRenderer::new(self.geometry, profile.name.as_str());
        if let Err(e) = renderer.render(&pages, watermark.as_ref(), file) {
            FsOps::remove_file_if_exists(&claimed)?;
            return Err(e).with_context(|| format!("Failed to render {}", claimed.display()));
        }

        if let Some(path) = branding_image {
            app_log!(
                info,
                "Watermark applied for {}.",
                file_stem(&path.to_string_lossy())
            );
        }
        app_log!(debug, "{} pages written to {}", pages.len(), claimed.display());

        Ok(claimed)
    }

    fn prepare_watermark(&self, logo: &Path) -> Result<Watermark> {
        let temp = WatermarkCompositor::make_translucent(logo, WATERMARK_OPACITY)?;
        let loaded = image::open(&temp);
        FsOps::remove_file_if_exists(&temp)?;

        let rgba = loaded
            .with_context(|| format!("Failed to reload {}", temp.display()))?
            .to_rgba8();
        let rect = self
            .geometry
            .watermark_rect(rgba.width() as f32, rgba.height() as f32);

        Ok(Watermark {
            image: DynamicImage::ImageRgb8(WatermarkCompositor::flatten_on_white(&rgba)),
            rect,
        })
    }

    /// A missing or undecodable avatar drops the picture, not the document
    fn load_avatar(&self, avatar: &Path) -> Option<Picture> {
        if avatar.as_os_str().is_empty() {
            return None;
        }
        let path = if avatar.is_absolute() {
            avatar.to_path_buf()
        } else {
            self.base_dir.join(avatar)
        };
        if !path.is_file() {
            app_log!(warn, "Avatar not found: {}", path.display());
            return None;
        }

        match image::open(&path) {
            Ok(image) => {
                let (width, height) = self
                    .geometry
                    .avatar_size(image.width() as f32, image.height() as f32);
                let flattened = WatermarkCompositor::flatten_on_white(&image.to_rgba8());
                Some(Picture {
                    image: Arc::new(DynamicImage::ImageRgb8(flattened)),
                    width,
                    height,
                })
            }
            Err(e) => {
                app_log!(warn, "Skipping avatar {}: {}", path.display(), e);
                None
            }
        }
    }
}

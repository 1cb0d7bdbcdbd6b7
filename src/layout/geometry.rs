// src/layout/geometry.rs
//! Page geometry in PDF points, origin at the bottom-left corner.

/// A3 portrait
pub const A3_WIDTH: f32 = 841.89;
pub const A3_HEIGHT: f32 = 1190.55;
pub const PAGE_MARGIN: f32 = 72.0;
/// Half-gap between the two columns
pub const COLUMN_GUTTER: f32 = 6.0;
/// Inner padding of each frame
pub const FRAME_PADDING: f32 = 6.0;

const MASK_LIFT: f32 = 200.0;
const MASK_RADIUS: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

/// One flow region of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub outer: Rect,
    pub padding: f32,
}

impl Frame {
    pub fn content_x(&self) -> f32 {
        self.outer.x + self.padding
    }

    pub fn content_width(&self) -> f32 {
        self.outer.width - 2.0 * self.padding
    }

    pub fn content_top(&self) -> f32 {
        self.outer.top() - self.padding
    }

    pub fn content_bottom(&self) -> f32 {
        self.outer.y + self.padding
    }

    pub fn content_height(&self) -> f32 {
        self.content_top() - self.content_bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub gutter: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: A3_WIDTH,
            page_height: A3_HEIGHT,
            margin: PAGE_MARGIN,
            gutter: COLUMN_GUTTER,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    /// Half the content width minus the gutter
    pub fn column_width(&self) -> f32 {
        self.content_width() / 2.0 - self.gutter
    }

    pub fn left_frame(&self) -> Frame {
        Frame {
            outer: Rect {
                x: self.margin,
                y: self.margin,
                width: self.column_width(),
                height: self.content_height(),
            },
            padding: FRAME_PADDING,
        }
    }

    pub fn right_frame(&self) -> Frame {
        Frame {
            outer: Rect {
                x: self.margin + self.content_width() / 2.0 + self.gutter,
                y: self.margin,
                width: self.column_width(),
                height: self.content_height(),
            },
            padding: FRAME_PADDING,
        }
    }

    pub fn frames(&self) -> [Frame; 2] {
        [self.left_frame(), self.right_frame()]
    }

    /// Tinted band behind the left column
    pub fn background_band(&self) -> Rect {
        Rect {
            x: self.margin - self.gutter,
            y: self.margin,
            width: self.content_width() / 2.0 + self.gutter,
            height: self.content_height(),
        }
    }

    /// White disc that cuts into the top of the band
    pub fn background_mask(&self) -> Circle {
        Circle {
            cx: self.margin + self.content_width() / 4.0,
            cy: self.content_height() + MASK_LIFT,
            radius: MASK_RADIUS,
        }
    }

    /// Watermark box: at most half a column wide, anchored to the
    /// top-right corner of the content area.
    pub fn watermark_rect(&self, natural_width: f32, natural_height: f32) -> Rect {
        let max_width = (self.column_width() / 2.0).round();
        let (width, height) = fit_width(natural_width, natural_height, max_width);
        let (width, height) = (width.round(), height.round());
        Rect {
            x: self.margin + self.content_width() - width - self.gutter,
            y: self.margin + self.content_height() - height - self.gutter,
            width,
            height,
        }
    }

    /// Avatar size: at most half a column wide
    pub fn avatar_size(&self, natural_width: f32, natural_height: f32) -> (f32, f32) {
        fit_width(natural_width, natural_height, self.column_width() / 2.0)
    }
}

/// Shrink to `max_width` keeping the aspect ratio; never enlarge
pub fn fit_width(natural_width: f32, natural_height: f32, max_width: f32) -> (f32, f32) {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return (0.0, 0.0);
    }
    let width = natural_width.min(max_width);
    (width, natural_height * width / natural_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_columns_split_content_around_gutter() {
        let geometry = PageGeometry::default();
        let [left, right] = geometry.frames();

        assert!(approx(left.outer.width, geometry.content_width() / 2.0 - 6.0));
        assert!(approx(right.outer.width, left.outer.width));
        assert!(approx(right.outer.x - left.outer.right(), 12.0));
        assert!(approx(left.outer.x, geometry.margin));
        assert!(approx(right.outer.right(), geometry.page_width - geometry.margin));
    }

    #[test]
    fn test_fit_width_preserves_aspect_ratio() {
        assert_eq!(fit_width(400.0, 200.0, 100.0), (100.0, 50.0));
        assert_eq!(fit_width(80.0, 40.0, 100.0), (80.0, 40.0));
        assert_eq!(fit_width(0.0, 40.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_watermark_sits_in_top_right_corner() {
        let geometry = PageGeometry::default();
        let rect = geometry.watermark_rect(1000.0, 500.0);

        assert!(rect.width <= (geometry.column_width() / 2.0).round());
        assert!(approx(rect.height, (500.0 * rect.width / 1000.0).round()));
        assert!(approx(rect.right(), geometry.page_width - geometry.margin - geometry.gutter));
        assert!(approx(rect.top(), geometry.page_height - geometry.margin - geometry.gutter));
    }

    #[test]
    fn test_small_watermark_keeps_natural_size() {
        let rect = PageGeometry::default().watermark_rect(40.0, 20.0);
        assert_eq!((rect.width, rect.height), (40.0, 20.0));
    }
}

//! Slide drawing surface.
//!
//! Layouts place shapes in inches on the 13.333 x 7.5 authoring canvas. The
//! canvas scales positions to the configured slide size and applies the
//! run-wide font, line and paragraph scales to every text box it creates.

use crate::assets::AssetSource;
use crate::picture::{pixel_size, rounded_png};
use crate::shapes::{Align, Fill, Frame, Shape, TextBody, EMU_PER_INCH};
use deck_core::{RenderConfig, Rgb};

/// Authoring canvas width in inches.
pub const AUTHORED_WIDTH_IN: f64 = 13.333;
/// Authoring canvas height in inches.
pub const AUTHORED_HEIGHT_IN: f64 = 7.5;

/// Rectangle in authoring inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Declared (unscaled) text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Rgb,
    pub bold: bool,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgb) -> Self {
        Self {
            size,
            color,
            bold: false,
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn center(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Values derived once per run from [`RenderConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    pub scale_x: f64,
    pub scale_y: f64,
    pub font_scale: f64,
    pub line_spacing: f64,
    pub paragraph_spacing_scale: f64,
    pub corner_ratio: f64,
    pub typeface: String,
}

impl CanvasSettings {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            scale_x: config.slide_width_in / AUTHORED_WIDTH_IN,
            scale_y: config.slide_height_in / AUTHORED_HEIGHT_IN,
            font_scale: config.font_scale,
            line_spacing: config.line_spacing(),
            paragraph_spacing_scale: config.paragraph_spacing_scale,
            corner_ratio: config.image_corner_ratio,
            typeface: config.typeface().to_string(),
        }
    }
}

/// One slide's background, shapes and picture media.
#[derive(Debug, Clone)]
pub struct SlideCanvas {
    settings: CanvasSettings,
    background: Rgb,
    shapes: Vec<Shape>,
    media: Vec<Vec<u8>>,
}

impl SlideCanvas {
    pub fn new(settings: &CanvasSettings, background: Rgb) -> Self {
        Self {
            settings: settings.clone(),
            background,
            shapes: Vec::new(),
            media: Vec::new(),
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// PNG bytes of every picture, in placement order.
    pub fn media(&self) -> &[Vec<u8>] {
        &self.media
    }

    fn frame(&self, r: Rect) -> Frame {
        let emu = |inches: f64, scale: f64| (inches * scale * EMU_PER_INCH).round() as i64;
        Frame {
            x: emu(r.x, self.settings.scale_x),
            y: emu(r.y, self.settings.scale_y),
            cx: emu(r.w, self.settings.scale_x),
            cy: emu(r.h, self.settings.scale_y),
        }
    }

    /// Add a word-wrapped text box. Newlines start new paragraphs.
    pub fn text(&mut self, r: Rect, text: &str, style: TextStyle) {
        let scaled_pt = style.size * self.settings.font_scale;
        let body = TextBody {
            paragraphs: text.split('\n').map(str::to_string).collect(),
            size: (scaled_pt * 100.0).round() as u32,
            color: style.color,
            bold: style.bold,
            align: style.align,
            typeface: self.settings.typeface.clone(),
            line_spacing: (self.settings.line_spacing * 100_000.0).round() as u32,
            paragraph_spacing: (scaled_pt * self.settings.paragraph_spacing_scale * 100.0).round() as u32,
        };
        self.shapes.push(Shape::TextBox {
            frame: self.frame(r),
            body,
        });
    }

    /// Add a filled rectangle. `radius` above zero rounds the corners
    /// (percent of the shorter side, capped at a full semicircle).
    pub fn rect(&mut self, r: Rect, color: Rgb, radius: f64) {
        self.push_rect(r, Fill { color, alpha: None }, radius);
    }

    /// Add a translucent rectangle; `opacity` is in percent.
    pub fn overlay(&mut self, r: Rect, color: Rgb, radius: f64, opacity: u32) {
        let alpha = opacity.min(100) * 1000;
        self.push_rect(
            r,
            Fill {
                color,
                alpha: Some(alpha),
            },
            radius,
        );
    }

    fn push_rect(&mut self, r: Rect, fill: Fill, radius: f64) {
        let corner = (radius > 0.0).then(|| ((radius / 100.0).min(0.5) * 100_000.0).round() as u32);
        self.shapes.push(Shape::Rectangle {
            frame: self.frame(r),
            fill: Some(fill),
            corner,
        });
    }

    /// Fetch `src`, round its corners and place it. Returns `false` when the
    /// asset is absent or cannot be decoded; the slide then simply has no picture.
    pub fn image(&mut self, assets: &mut dyn AssetSource, r: Rect, src: &str) -> bool {
        let Some(data) = assets.fetch(src) else {
            return false;
        };

        let (w, h) = pixel_size(r.w * self.settings.scale_x, r.h * self.settings.scale_y);
        match rounded_png(&data, w, h, self.settings.corner_ratio) {
            Ok(png) => {
                self.media.push(png);
                self.shapes.push(Shape::Picture {
                    frame: self.frame(r),
                    media: self.media.len() - 1,
                    description: src.to_string(),
                });
                true
            }
            Err(e) => {
                log::warn!("Skipping image {}: {}", src, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(config: &RenderConfig) -> CanvasSettings {
        CanvasSettings::from_config(config)
    }

    #[test]
    fn test_text_scaling() {
        let config = RenderConfig::new()
            .with_font_scale(1.5)
            .with_paragraph_spacing_scale(0.5);
        let mut canvas = SlideCanvas::new(&settings(&config), Rgb::WHITE);
        canvas.text(Rect::new(1.0, 1.0, 2.0, 1.0), "a\nb", TextStyle::new(20.0, Rgb::BLACK));

        let Shape::TextBox { frame, body } = &canvas.shapes()[0] else {
            panic!("expected text box");
        };
        assert_eq!(body.size, 3000);
        assert_eq!(body.paragraph_spacing, 1500);
        assert_eq!(body.line_spacing, 99_600);
        assert_eq!(body.paragraphs, vec!["a", "b"]);
        assert_eq!(frame.x, 914_400);
        assert_eq!(frame.cx, 1_828_800);
    }

    #[test]
    fn test_canvas_scales_to_slide_size() {
        let config = RenderConfig::new().with_slide_size(AUTHORED_WIDTH_IN / 2.0, AUTHORED_HEIGHT_IN * 2.0);
        let mut canvas = SlideCanvas::new(&settings(&config), Rgb::WHITE);
        canvas.rect(Rect::new(2.0, 1.0, 2.0, 1.0), Rgb::BLACK, 0.0);

        let Shape::Rectangle { frame, corner, .. } = &canvas.shapes()[0] else {
            panic!("expected rectangle");
        };
        assert_eq!(frame.x, 914_400);
        assert_eq!(frame.y, 1_828_800);
        assert_eq!(*corner, None);
    }

    #[test]
    fn test_corner_radius_is_capped() {
        let mut canvas = SlideCanvas::new(&settings(&RenderConfig::default()), Rgb::WHITE);
        canvas.rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgb::BLACK, 16.0);
        canvas.overlay(Rect::new(0.0, 0.0, 1.0, 1.0), Rgb::BLACK, 80.0, 75);

        let corners: Vec<_> = canvas
            .shapes()
            .iter()
            .map(|s| match s {
                Shape::Rectangle { corner, fill, .. } => (*corner, fill.and_then(|f| f.alpha)),
                _ => panic!("expected rectangle"),
            })
            .collect();
        assert_eq!(corners, vec![(Some(16_000), None), (Some(50_000), Some(75_000))]);
    }

    #[test]
    fn test_missing_image_is_omitted() {
        let mut canvas = SlideCanvas::new(&settings(&RenderConfig::default()), Rgb::WHITE);
        let mut assets: HashMap<String, Vec<u8>> = HashMap::new();
        assets.insert("broken.png".to_string(), b"garbage".to_vec());

        assert!(!canvas.image(&mut assets, Rect::new(0.0, 0.0, 1.0, 1.0), "absent.png"));
        assert!(!canvas.image(&mut assets, Rect::new(0.0, 0.0, 1.0, 1.0), "broken.png"));
        assert!(canvas.shapes().is_empty());
        assert!(canvas.media().is_empty());
    }
}

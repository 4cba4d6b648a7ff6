//! Run-wide rendering configuration.
//!
//! Built once at the start of a conversion and passed by shared reference into
//! the renderers. Nothing mutates it mid-render, so every text element in a run
//! sees the same scale values.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Baseline line height multiplied by `line_spacing_scale`.
pub const BASE_LINE_SPACING: f64 = 1.2;

/// Font files looked up in `font_dir`, lightest weight first.
pub const FONT_FILES: [&str; 4] = [
    "Pretendard-Regular.ttf",
    "Pretendard-Medium.ttf",
    "Pretendard-SemiBold.ttf",
    "Pretendard-Bold.ttf",
];

/// Run-wide scale constants, canvas size and asset policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Multiplies every declared font size.
    pub font_scale: f64,
    /// Multiplies [`BASE_LINE_SPACING`].
    pub line_spacing_scale: f64,
    /// Multiplies the scaled font size to give paragraph spacing.
    pub paragraph_spacing_scale: f64,
    /// Image corner radius as a fraction of the shorter side.
    pub image_corner_ratio: f64,
    pub slide_width_in: f64,
    pub slide_height_in: f64,
    /// Per-attempt deadline for remote assets.
    pub fetch_timeout: Duration,
    /// Total attempts per remote asset (2 = one retry).
    pub fetch_attempts: u32,
    /// Directory searched for [`FONT_FILES`].
    pub font_dir: Option<PathBuf>,
    pub font_family: String,
    pub fallback_font: String,
    /// Use the hand-composed layouts for slide numbers 1-11.
    pub composed_layouts: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_scale: 0.95,
            line_spacing_scale: 0.83,
            paragraph_spacing_scale: 0.0,
            image_corner_ratio: 0.05,
            slide_width_in: 13.333,
            slide_height_in: 7.5,
            fetch_timeout: Duration::from_secs(5),
            fetch_attempts: 2,
            font_dir: None,
            font_family: "Pretendard".to_string(),
            fallback_font: "Malgun Gothic".to_string(),
            composed_layouts: true,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_scale(mut self, scale: f64) -> Self {
        self.font_scale = scale;
        self
    }

    pub fn with_line_spacing_scale(mut self, scale: f64) -> Self {
        self.line_spacing_scale = scale;
        self
    }

    pub fn with_paragraph_spacing_scale(mut self, scale: f64) -> Self {
        self.paragraph_spacing_scale = scale;
        self
    }

    pub fn with_image_corner_ratio(mut self, ratio: f64) -> Self {
        self.image_corner_ratio = ratio;
        self
    }

    pub fn with_slide_size(mut self, width_in: f64, height_in: f64) -> Self {
        self.slide_width_in = width_in;
        self.slide_height_in = height_in;
        self
    }

    pub fn with_fetch_policy(mut self, timeout: Duration, attempts: u32) -> Self {
        self.fetch_timeout = timeout;
        self.fetch_attempts = attempts.max(1);
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = Some(dir.into());
        self
    }

    pub fn with_composed_layouts(mut self, enabled: bool) -> Self {
        self.composed_layouts = enabled;
        self
    }

    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, value: f64, ok: bool| {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{} out of range: {}", name, value)))
            }
        };

        check("font_scale", self.font_scale, self.font_scale > 0.0 && self.font_scale <= 2.0)?;
        check(
            "line_spacing_scale",
            self.line_spacing_scale,
            self.line_spacing_scale > 0.0 && self.line_spacing_scale <= 2.0,
        )?;
        check(
            "paragraph_spacing_scale",
            self.paragraph_spacing_scale,
            (0.0..=2.0).contains(&self.paragraph_spacing_scale),
        )?;
        check(
            "image_corner_ratio",
            self.image_corner_ratio,
            (0.0..=0.5).contains(&self.image_corner_ratio),
        )?;
        check("slide_width_in", self.slide_width_in, self.slide_width_in > 0.0)?;
        check("slide_height_in", self.slide_height_in, self.slide_height_in > 0.0)?;
        Ok(())
    }

    /// Font size actually written for a declared size, in points.
    pub fn scaled_font_size(&self, declared_pt: f64) -> f64 {
        declared_pt * self.font_scale
    }

    /// Line spacing multiple applied to every paragraph.
    pub fn line_spacing(&self) -> f64 {
        BASE_LINE_SPACING * self.line_spacing_scale
    }

    /// Space before and after a paragraph, in points.
    pub fn paragraph_spacing(&self, declared_pt: f64) -> f64 {
        self.scaled_font_size(declared_pt) * self.paragraph_spacing_scale
    }

    /// Font files present in `font_dir`.
    pub fn available_fonts(&self) -> Vec<PathBuf> {
        let Some(dir) = &self.font_dir else {
            return Vec::new();
        };
        FONT_FILES
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| path.is_file())
            .collect()
    }

    /// Typeface referenced by text runs.
    pub fn typeface(&self) -> &str {
        if self.available_fonts().is_empty() {
            &self.fallback_font
        } else {
            &self.font_family
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.font_scale, 0.95);
        assert_eq!(config.fetch_attempts, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scaled_values() {
        let config = RenderConfig::new()
            .with_font_scale(1.5)
            .with_line_spacing_scale(0.5)
            .with_paragraph_spacing_scale(0.25);
        assert_eq!(config.scaled_font_size(20.0), 30.0);
        assert!((config.line_spacing() - 0.6).abs() < 1e-9);
        assert_eq!(config.paragraph_spacing(20.0), 7.5);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(RenderConfig::new().with_font_scale(2.0).validate().is_ok());
        assert!(RenderConfig::new().with_font_scale(0.0).validate().is_err());
        assert!(RenderConfig::new().with_font_scale(f64::NAN).validate().is_err());
        assert!(RenderConfig::new().with_line_spacing_scale(2.5).validate().is_err());
        assert!(RenderConfig::new().with_paragraph_spacing_scale(-0.1).validate().is_err());
        assert!(RenderConfig::new().with_image_corner_ratio(0.6).validate().is_err());
        assert!(RenderConfig::new().with_slide_size(0.0, 7.5).validate().is_err());
    }

    #[test]
    fn test_typeface_falls_back_without_fonts() {
        let config = RenderConfig::new().with_font_dir("/nonexistent/fonts");
        assert!(config.available_fonts().is_empty());
        assert_eq!(config.typeface(), "Malgun Gothic");
    }
}

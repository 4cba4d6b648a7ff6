//! Presentation → native deck.

use crate::assets::AssetSource;
use crate::canvas::{CanvasSettings, SlideCanvas};
use crate::layouts::{self, generic, LayoutContext};
use crate::package::DeckPackage;
use deck_core::{DeckPalette, Presentation, RenderConfig, Result, Slide};
use std::path::Path;

/// What happened to one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideOutcome {
    Rendered { number: u32, layout: &'static str },
    Skipped { number: u32, reason: String },
}

/// Per-slide outcomes of one render, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub outcomes: Vec<SlideOutcome>,
}

impl RenderReport {
    pub fn rendered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SlideOutcome::Rendered { .. }))
            .count()
    }

    pub fn skipped(&self) -> Vec<(u32, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                SlideOutcome::Skipped { number, reason } => Some((*number, reason.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Renders presentations into PPTX decks with a frozen [`RenderConfig`].
pub struct DeckRenderer<'a> {
    config: &'a RenderConfig,
    settings: CanvasSettings,
}

impl<'a> DeckRenderer<'a> {
    /// Validate the configuration and derive the per-run canvas settings.
    pub fn new(config: &'a RenderConfig) -> Result<Self> {
        config.validate()?;
        let settings = CanvasSettings::from_config(config);
        log::debug!("Deck typeface: {}", settings.typeface);
        Ok(Self { config, settings })
    }

    /// Render every slide. A slide that fails is skipped and reported; the run continues.
    pub fn render(
        &self,
        presentation: &Presentation,
        assets: &mut dyn AssetSource,
    ) -> (DeckPackage, RenderReport) {
        let palette = DeckPalette::from_tokens(&presentation.design_tokens);
        let mut deck = DeckPackage::new(
            presentation.title(),
            self.config.slide_width_in,
            self.config.slide_height_in,
        );
        let mut report = RenderReport::default();
        let mut ctx = LayoutContext {
            settings: &self.settings,
            palette: &palette,
            assets,
        };

        for slide in &presentation.slides {
            let number = slide.number();
            let title = slide.display_title().unwrap_or("");
            match self.render_slide(slide, &mut ctx) {
                Ok((canvas, layout)) => {
                    if layout == generic::NAME {
                        log::info!("[Slide {}] {} (generic)", number, title);
                    } else {
                        log::info!("[Slide {}] {}", number, title);
                    }
                    deck.push(canvas);
                    report.outcomes.push(SlideOutcome::Rendered { number, layout });
                }
                Err(e) => {
                    log::warn!("[Slide {}] skipped: {}", number, e);
                    report.outcomes.push(SlideOutcome::Skipped {
                        number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        (deck, report)
    }

    /// Render and write the deck to `path`.
    pub fn render_to_file(
        &self,
        presentation: &Presentation,
        assets: &mut dyn AssetSource,
        path: impl AsRef<Path>,
    ) -> Result<RenderReport> {
        let (deck, report) = self.render(presentation, assets);
        deck.save(path.as_ref())?;
        log::info!(
            "Wrote {} of {} slides to {}",
            deck.slide_count(),
            presentation.slides.len(),
            path.as_ref().display()
        );
        Ok(report)
    }

    fn render_slide(&self, slide: &Slide, ctx: &mut LayoutContext<'_>) -> Result<(SlideCanvas, &'static str)> {
        if self.config.composed_layouts {
            if let Some(composed) = layouts::compose(slide, ctx)? {
                return Ok(composed);
            }
        }
        Ok((generic::render(slide, ctx), generic::NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::DeckInspector;
    use std::collections::HashMap;
    use std::io::Cursor;

    const DECK: &str = r#"{"slides":[
        {"slideNumber":1,"elements":[{"type":"heading","text":"Cover"}]},
        {"slideNumber":3,"elements":[{"type":"timeline","periods":[{"year":2001,"barColor":"nope"}]}]},
        {"slideNumber":12,"title":"Extra","elements":[{"type":"body","text":"Details here"}]}
    ]}"#;

    fn render(config: &RenderConfig, json: &str) -> (Vec<u8>, RenderReport) {
        let doc = Presentation::from_json_str(json).unwrap();
        let mut assets: HashMap<String, Vec<u8>> = HashMap::new();
        let (deck, report) = DeckRenderer::new(config).unwrap().render(&doc, &mut assets);
        (deck.to_bytes().unwrap(), report)
    }

    #[test]
    fn test_failing_slide_is_skipped() {
        let (bytes, report) = render(&RenderConfig::default(), DECK);

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(
            report.outcomes[0],
            SlideOutcome::Rendered { number: 1, layout: "cover" }
        );
        assert!(matches!(
            &report.outcomes[1],
            SlideOutcome::Skipped { number: 3, reason } if reason.contains("nope")
        ));
        assert_eq!(
            report.outcomes[2],
            SlideOutcome::Rendered { number: 12, layout: "generic" }
        );
        assert_eq!(report.rendered(), 2);

        let summary = DeckInspector::new().inspect(Cursor::new(bytes)).unwrap();
        assert_eq!(summary.slides.len(), 2);
    }

    #[test]
    fn test_every_slide_rendered_when_generic_only() {
        let config = RenderConfig::default().with_composed_layouts(false);
        let (bytes, report) = render(&config, DECK);
        assert_eq!(report.rendered(), 3);
        assert!(report.skipped().is_empty());

        let summary = DeckInspector::new().inspect(Cursor::new(bytes)).unwrap();
        assert_eq!(summary.slides.len(), 3);
    }

    #[test]
    fn test_composed_slide_without_content_falls_back() {
        let (_, report) = render(
            &RenderConfig::default(),
            r#"{"slides":[{"title":"No heading","elements":[{"type":"body","text":"plain text"}]}]}"#,
        );
        assert_eq!(
            report.outcomes,
            vec![SlideOutcome::Rendered { number: 1, layout: "generic" }]
        );
    }

    #[test]
    fn test_run_font_sizes_follow_font_scale() {
        let config = RenderConfig::default()
            .with_composed_layouts(false)
            .with_font_scale(1.5);
        let (bytes, _) = render(&config, DECK);
        let summary = DeckInspector::new().inspect(Cursor::new(bytes)).unwrap();

        let extra = &summary.slides[2];
        assert_eq!(extra.runs[0].text, "Extra");
        assert_eq!(extra.runs[0].size, Some(5400));
        assert_eq!(extra.runs[1].text, "Details here");
        assert_eq!(extra.runs[1].size, Some(2700));
    }

    #[test]
    fn test_line_and_paragraph_spacing() {
        let config = RenderConfig::default()
            .with_composed_layouts(false)
            .with_paragraph_spacing_scale(0.5);
        let (bytes, _) = render(&config, DECK);
        let summary = DeckInspector::new().inspect(Cursor::new(bytes)).unwrap();

        for slide in &summary.slides {
            for run in &slide.runs {
                assert_eq!(run.line_spacing, Some(99_600));
                let expected = (run.size.unwrap() as f64 * 0.5).round() as u32;
                assert_eq!(run.space_before, Some(expected));
                assert_eq!(run.space_after, Some(expected));
            }
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RenderConfig::default().with_font_scale(0.0);
        assert!(DeckRenderer::new(&config).is_err());
    }
}

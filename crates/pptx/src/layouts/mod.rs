//! Slide layouts for the native deck.
//!
//! Slide numbers 1 to 11 map onto a fixed catalogue of composed layouts; every
//! other slide, and every composed slide whose content is incomplete, goes
//! through the generic layout.

mod composed;
pub mod generic;

use crate::assets::AssetSource;
use crate::canvas::{CanvasSettings, SlideCanvas};
use deck_core::types::{Element, ElementKind, Slide};
use deck_core::{DeckPalette, Result};

/// Shared state handed to every layout.
pub struct LayoutContext<'a> {
    pub settings: &'a CanvasSettings,
    pub palette: &'a DeckPalette,
    pub assets: &'a mut dyn AssetSource,
}

/// The hand-composed layout catalogue, one entry per slide position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposedLayout {
    Cover,
    CompanyProfile,
    HistoryTimeline,
    ValueCards,
    ServicesBento,
    SupportChecklist,
    NetworkMap,
    PartnerGrid,
    PortfolioGallery,
    Statement,
    Closing,
}

impl ComposedLayout {
    pub fn for_number(number: u32) -> Option<Self> {
        Some(match number {
            1 => Self::Cover,
            2 => Self::CompanyProfile,
            3 => Self::HistoryTimeline,
            4 => Self::ValueCards,
            5 => Self::ServicesBento,
            6 => Self::SupportChecklist,
            7 => Self::NetworkMap,
            8 => Self::PartnerGrid,
            9 => Self::PortfolioGallery,
            10 => Self::Statement,
            11 => Self::Closing,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::CompanyProfile => "company-profile",
            Self::HistoryTimeline => "history-timeline",
            Self::ValueCards => "value-cards",
            Self::ServicesBento => "services-bento",
            Self::SupportChecklist => "support-checklist",
            Self::NetworkMap => "network-map",
            Self::PartnerGrid => "partner-grid",
            Self::PortfolioGallery => "portfolio-gallery",
            Self::Statement => "statement",
            Self::Closing => "closing",
        }
    }

    /// Compose the slide. `Ok(None)` means the content this layout needs is missing.
    pub fn compose(&self, slide: &Slide, ctx: &mut LayoutContext<'_>) -> Result<Option<SlideCanvas>> {
        let content = SlideContent::new(slide);
        match self {
            Self::Cover => composed::cover(&content, ctx),
            Self::CompanyProfile => composed::company_profile(&content, ctx),
            Self::HistoryTimeline => composed::history_timeline(&content, ctx),
            Self::ValueCards => composed::value_cards(&content, ctx),
            Self::ServicesBento => composed::services_bento(&content, ctx),
            Self::SupportChecklist => composed::support_checklist(&content, ctx),
            Self::NetworkMap => composed::network_map(&content, ctx),
            Self::PartnerGrid => composed::partner_grid(&content, ctx),
            Self::PortfolioGallery => composed::portfolio_gallery(&content, ctx),
            Self::Statement => composed::statement(&content, ctx),
            Self::Closing => composed::closing(&content, ctx),
        }
    }
}

/// Read-only queries over a slide's elements.
pub struct SlideContent<'a> {
    slide: &'a Slide,
}

impl<'a> SlideContent<'a> {
    pub fn new(slide: &'a Slide) -> Self {
        Self { slide }
    }

    pub fn elements(&self) -> &'a [Element] {
        &self.slide.elements
    }

    /// First non-empty text of a plain text variant with this tag.
    pub fn text(&self, tag: &str) -> Option<&'a str> {
        self.texts(tag).into_iter().next()
    }

    /// Every non-empty text of a plain text variant with this tag.
    pub fn texts(&self, tag: &str) -> Vec<&'a str> {
        self.slide
            .elements
            .iter()
            .filter(|el| el.kind.tag() == tag)
            .filter_map(|el| el.plain_text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Section label shown above the title.
    pub fn label(&self) -> Option<&'a str> {
        self.text("badge").or_else(|| self.text("label"))
    }

    /// Heading text, else the slide title.
    pub fn title(&self) -> Option<&'a str> {
        self.text("heading")
            .or_else(|| self.slide.title.as_deref().filter(|t| !t.trim().is_empty()))
    }

    /// All image sources in reading order.
    pub fn images(&self) -> Vec<&'a str> {
        self.slide
            .elements
            .iter()
            .flat_map(|el| el.image_sources())
            .collect()
    }

    /// First element payload `pick` accepts.
    pub fn find<T>(&self, pick: impl Fn(&'a ElementKind) -> Option<T>) -> Option<T> {
        self.slide.elements.iter().find_map(|el| pick(&el.kind))
    }
}

/// Compose the slide if its number has a composed layout.
///
/// `Ok(None)` means "use the generic layout"; `Err` means the slide cannot be rendered.
pub fn compose(slide: &Slide, ctx: &mut LayoutContext<'_>) -> Result<Option<(SlideCanvas, &'static str)>> {
    let Some(layout) = ComposedLayout::for_number(slide.number()) else {
        return Ok(None);
    };

    match layout.compose(slide, ctx)? {
        Some(canvas) => Ok(Some((canvas, layout.name()))),
        None => {
            log::debug!(
                "Slide {} lacks content for the {} layout, using generic",
                slide.number(),
                layout.name()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::Presentation;

    fn slide(json: &str) -> Slide {
        let doc = Presentation::from_json_str(&format!(r#"{{"slides":[{}]}}"#, json)).unwrap();
        doc.slides.into_iter().next().unwrap()
    }

    #[test]
    fn test_catalogue_bounds() {
        assert_eq!(ComposedLayout::for_number(0), None);
        assert_eq!(ComposedLayout::for_number(1), Some(ComposedLayout::Cover));
        assert_eq!(ComposedLayout::for_number(11), Some(ComposedLayout::Closing));
        assert_eq!(ComposedLayout::for_number(12), None);
    }

    #[test]
    fn test_slide_content_queries() {
        let slide = slide(
            r#"{"title":"Fallback","elements":[
                {"type":"label","text":"ABOUT"},
                {"type":"body","text":" "},
                {"type":"body","text":"first"},
                {"type":"image","src":"a.png"},
                {"type":"image-grid","images":[{"src":"b.png"},{"src":""}]},
                {"type":"body","text":"second"}
            ]}"#,
        );
        let content = SlideContent::new(&slide);

        assert_eq!(content.label(), Some("ABOUT"));
        assert_eq!(content.title(), Some("Fallback"));
        assert_eq!(content.texts("body"), vec!["first", "second"]);
        assert_eq!(content.images(), vec!["a.png", "b.png"]);
        assert!(content
            .find(|k| match k {
                ElementKind::ImageGrid(grid) => Some(grid.images.len()),
                _ => None,
            })
            .is_some());
    }
}

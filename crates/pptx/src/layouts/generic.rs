//! Fallback layout: title, stacked text fragments and one picture.
//!
//! Never fails. Every slide number, including numbers covered by the
//! composed catalogue, can be rendered through it.

use super::LayoutContext;
use crate::canvas::{Rect, SlideCanvas, TextStyle};
use crate::shapes::Align;
use deck_core::layout::{classify, Structure};
use deck_core::types::{Background, Slide};
use deck_core::{DeckPalette, Rgb};

/// Layout name reported for slides rendered here.
pub const NAME: &str = "generic";

const MAX_FRAGMENTS: usize = 10;
const MAX_FRAGMENT_CHARS: usize = 200;
const LONG_FRAGMENT_CHARS: usize = 50;
const TEXT_TOP: f64 = 1.5;
const TEXT_STEP: f64 = 0.7;
const TEXT_BOTTOM: f64 = 6.5;

/// Fixed picture region in the right half of the slide.
const IMAGE_BOX: Rect = Rect::new(8.0, 1.5, 4.0, 3.0);

pub fn render(slide: &Slide, ctx: &mut LayoutContext<'_>) -> SlideCanvas {
    let palette = ctx.palette;
    let background = background_color(slide, palette);
    let text_color = if background.is_dark() {
        palette.text_on_dark
    } else {
        palette.text
    };
    let align = match classify(slide).structure {
        Structure::Center => Align::Center,
        _ => Align::Left,
    };

    let mut canvas = SlideCanvas::new(ctx.settings, background);

    if let Some(title) = slide.title.as_deref().filter(|t| !t.trim().is_empty()) {
        canvas.text(
            Rect::new(0.8, 0.5, 11.0, 0.8),
            title,
            TextStyle::new(36.0, text_color).bold().align(align),
        );
    }

    let fragments: Vec<String> = slide
        .elements
        .iter()
        .flat_map(|el| el.text_fragments())
        .take(MAX_FRAGMENTS)
        .collect();

    let mut y = TEXT_TOP;
    for fragment in &fragments {
        let chars = fragment.chars().count();
        if chars <= 3 {
            continue;
        }
        let text: String = fragment.chars().take(MAX_FRAGMENT_CHARS).collect();
        let size = if chars > LONG_FRAGMENT_CHARS { 16.0 } else { 18.0 };
        canvas.text(
            Rect::new(0.8, y, 11.0, 0.6),
            &text,
            TextStyle::new(size, text_color).align(align),
        );
        y += TEXT_STEP;
        if y > TEXT_BOTTOM {
            break;
        }
    }

    let images: Vec<&str> = slide.elements.iter().flat_map(|el| el.image_sources()).collect();
    if let Some(src) = images.first() {
        canvas.image(ctx.assets, IMAGE_BOX, src);
    }

    canvas
}

/// Declared background reduced to a solid fill; otherwise dark for "dark" templates.
fn background_color(slide: &Slide, palette: &DeckPalette) -> Rgb {
    let fallback = if slide.template().contains("dark") {
        palette.background_dark
    } else {
        palette.background
    };

    match &slide.background {
        Background::Solid { color: Some(color) } => Rgb::parse_or(color, fallback),
        Background::Solid { color: None } => palette.background_dark,
        Background::Gradient { stops } => stops
            .first()
            .map(|stop| Rgb::parse_or(stop, fallback))
            .unwrap_or(fallback),
        Background::Image { .. } => palette.background_dark,
        Background::Default => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasSettings;
    use crate::shapes::Shape;
    use deck_core::{Presentation, RenderConfig};
    use std::collections::HashMap;

    fn render_json(json: &str) -> SlideCanvas {
        let doc = Presentation::from_json_str(&format!(r#"{{"slides":[{}]}}"#, json)).unwrap();
        let settings = CanvasSettings::from_config(&RenderConfig::default());
        let palette = DeckPalette::default();
        let mut assets: HashMap<String, Vec<u8>> = HashMap::new();
        let mut ctx = LayoutContext {
            settings: &settings,
            palette: &palette,
            assets: &mut assets,
        };
        render(&doc.slides[0], &mut ctx)
    }

    fn texts(canvas: &SlideCanvas) -> Vec<(String, u32)> {
        canvas
            .shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::TextBox { body, .. } => Some((body.paragraphs.join("\n"), body.size)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_and_fragments() {
        let long = "x".repeat(260);
        let canvas = render_json(&format!(
            r#"{{"title":"Overview","elements":[
                {{"type":"body","text":"ok"}},
                {{"type":"body","text":"short line"}},
                {{"type":"body","text":"{}"}}
            ]}}"#,
            long
        ));
        let texts = texts(&canvas);

        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], ("Overview".to_string(), 3420));
        assert_eq!(texts[1], ("short line".to_string(), 1710));
        assert_eq!(texts[2].0.chars().count(), 200);
        assert_eq!(texts[2].1, 1520);
    }

    #[test]
    fn test_fragment_limit() {
        let elements: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"type":"body","text":"fragment {}"}}"#, i))
            .collect();
        let canvas = render_json(&format!(r#"{{"elements":[{}]}}"#, elements.join(",")));
        assert_eq!(texts(&canvas).len(), 8);
    }

    #[test]
    fn test_background_resolution() {
        let palette = DeckPalette::default();
        assert_eq!(render_json(r#"{"type":"content-dark"}"#).background(), palette.background_dark);
        assert_eq!(render_json(r#"{}"#).background(), palette.background);
        assert_eq!(
            render_json(r##"{"background":{"type":"gradient","colors":["#112233","#000"]}}"##).background(),
            Rgb(0x11, 0x22, 0x33)
        );
        assert_eq!(
            render_json(r#"{"background":{"type":"image-overlay","image":"x.jpg"}}"#).background(),
            palette.background_dark
        );
    }

    #[test]
    fn test_dark_background_uses_light_text() {
        let canvas = render_json(r#"{"type":"content-dark","title":"T"}"#);
        let Shape::TextBox { body, .. } = &canvas.shapes()[0] else {
            panic!("expected text box");
        };
        assert_eq!(body.color, DeckPalette::default().text_on_dark);
    }

    #[test]
    fn test_center_template_centers_text() {
        let canvas = render_json(r#"{"type":"contact-info","title":"Contact"}"#);
        let Shape::TextBox { body, .. } = &canvas.shapes()[0] else {
            panic!("expected text box");
        };
        assert_eq!(body.align, Align::Center);
    }
}

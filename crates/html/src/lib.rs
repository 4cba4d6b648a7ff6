//! Markup renderer: one self-contained, paginated HTML document per presentation.

pub mod elements;

use deck_core::layout::{classify, Region, Structure};
use deck_core::types::{Background, Presentation, Slide};
use deck_core::{MarkupTheme, Result};
use elements::{escape, render_element, ElementContext};
use std::path::Path;

/// Comment token emitted after every slide block except the last.
pub const SLIDE_SEPARATOR: &str = "<!-- Slide -->";

const STYLESHEET: &str = include_str!("stylesheet.css");

const FONT_IMPORT: &str =
    "@import url('https://cdn.jsdelivr.net/gh/orioncactus/pretendard/dist/web/static/pretendard.css');";

/// Renders a [`Presentation`] into a single HTML string.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    theme: Option<MarkupTheme>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed theme instead of one resolved from the document's tokens.
    pub fn with_theme(mut self, theme: MarkupTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Render the whole document.
    pub fn render(&self, presentation: &Presentation) -> String {
        let theme = self
            .theme
            .clone()
            .unwrap_or_else(|| MarkupTheme::from_tokens(&presentation.design_tokens));

        let mut html = String::with_capacity(STYLESHEET.len() + 4096 * presentation.slides.len());
        html.push_str(&format!(
            concat!(
                "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n",
                "<meta charset=\"UTF-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
                "<title>{}</title>\n<style>\n{}\n{}\n{}</style>\n</head>\n<body>\n"
            ),
            escape(presentation.title()),
            FONT_IMPORT,
            root_variables(&theme),
            STYLESHEET
        ));

        let count = presentation.slides.len();
        for (idx, slide) in presentation.slides.iter().enumerate() {
            let is_last = idx + 1 == count;
            render_slide(&mut html, slide, &theme, is_last);
            if !is_last {
                html.push_str(SLIDE_SEPARATOR);
            }
            log::debug!("Rendered slide {} ({})", slide.number(), slide.template());
        }

        html.push_str("</body></html>");
        html
    }

    /// Render and write to `path`.
    pub fn render_to_file(&self, presentation: &Presentation, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.render(presentation))?;
        log::info!(
            "Wrote {} slides to {}",
            presentation.slides.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Token value safe inside a declaration: no block, statement or tag delimiters.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ';' | '<' | '>' | '\n' | '\r'))
        .collect()
}

fn root_variables(theme: &MarkupTheme) -> String {
    format!(
        r#":root {{
  --primary: {primary};
  --primary-light: {primary_light};
  --primary-dark: {primary_dark};
  --secondary: {secondary};
  --bg-dark: {bg_dark};
  --bg-darker: {bg_darker};
  --bg-card: {bg_card};
  --bg-overlay: rgba(0, 0, 0, 0.7);
  --text-primary: {text_primary};
  --text-secondary: {text_secondary};
  --text-muted: {text_muted};
  --chart-orange: {primary};
  --chart-yellow: {secondary};
  --chart-gray: #4A4A4A;

  --font-main: 'Pretendard', 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
  --font-heading: 'Pretendard', 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;

  --size-hero: 72px;
  --size-h1: 48px;
  --size-h2: 36px;
  --size-h3: 24px;
  --size-body: 16px;
  --size-caption: 12px;
  --size-stat: 64px;

  --weight-extra-bold: 800;
  --weight-bold: 700;
  --weight-semi-bold: 600;
  --weight-regular: 400;

  /* 8px grid */
  --space-page-h: 60px;
  --space-page-v: 48px;
  --space-section: 40px;
  --space-element: 24px;
  --space-tight: 12px;
  --space-xs: 8px;

  --radius-card: 8px;
  --radius-image: 4px;
  --shadow-card: 0 4px 20px rgba(0, 0, 0, 0.3);
}}
"#,
        primary = css_value(&theme.primary),
        primary_light = css_value(&theme.primary_light),
        primary_dark = css_value(&theme.primary_dark),
        secondary = css_value(&theme.secondary),
        bg_dark = css_value(&theme.bg_dark),
        bg_darker = css_value(&theme.bg_darker),
        bg_card = css_value(&theme.bg_card),
        text_primary = css_value(&theme.text_primary),
        text_secondary = css_value(&theme.text_secondary),
        text_muted = css_value(&theme.text_muted),
    )
}

/// Inline background style plus any layered background markup.
fn background(bg: &Background, theme: &MarkupTheme) -> (String, String) {
    match bg {
        Background::Solid { color } => (
            format!(
                "background-color: {};",
                escape(color.as_deref().unwrap_or(&theme.bg_dark))
            ),
            String::new(),
        ),
        Background::Gradient { stops } => {
            let stops = if stops.is_empty() {
                vec![theme.bg_dark.clone(), theme.bg_card.clone()]
            } else {
                stops.clone()
            };
            (
                format!("background: linear-gradient(135deg, {});", escape(&stops.join(", "))),
                String::new(),
            )
        }
        Background::Image {
            src,
            opacity,
            overlay,
        } => (
            format!("background-color: {};", escape(&theme.bg_dark)),
            format!(
                r#"<img src="{}" class="bg-image" style="opacity: {};" alt=""><div class="bg-overlay" style="background: {};"></div>"#,
                escape(src),
                opacity,
                escape(overlay)
            ),
        ),
        Background::Default => (format!("background-color: {};", escape(&theme.bg_dark)), String::new()),
    }
}

fn render_slide(html: &mut String, slide: &Slide, theme: &MarkupTheme, is_last: bool) {
    let template = slide.template();
    let decision = classify(slide);
    let (bg_style, bg_markup) = background(&slide.background, theme);

    let template_class = format!("template-{}", escape(template));
    let classes: Vec<&str> = [
        "slide",
        if is_last { "last-slide" } else { "" },
        decision.css_class(),
        decision.alignment.map(|a| a.css_class()).unwrap_or(""),
        template_class.as_str(),
    ]
    .into_iter()
    .filter(|c| !c.is_empty())
    .collect();

    html.push_str(&format!(
        r#"<div class="{}" id="slide-{}" style="{}">"#,
        classes.join(" "),
        slide.number(),
        bg_style
    ));
    html.push_str(&bg_markup);
    html.push_str(r#"<div class="content-overlay">"#);

    let ctx = ElementContext {
        theme,
        clamp_fonts: template == "contact-info",
    };
    let mut region = |class: &str, which: Region| {
        html.push_str(&format!(r#"<div class="{}">"#, class));
        for el in decision.elements_in(&slide.elements, which) {
            render_element(html, el, &ctx);
        }
        html.push_str("</div>");
    };

    match decision.structure {
        Structure::Split => {
            region("col-left", Region::Left);
            region("col-right", Region::Right);
        }
        Structure::FeatureGrid => {
            region("content-left", Region::Left);
            region("content-right", Region::Right);
        }
        Structure::Flow | Structure::Center => {
            for el in &slide.elements {
                render_element(html, el, &ctx);
            }
        }
    }

    html.push_str("</div></div>");
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_SLIDES: &str = r#"{"slides":[
        {"slideNumber":1,"type":"hero-cover","elements":[{"type":"heading","text":"X"}]},
        {"slideNumber":2,"type":"content-text","elements":[]},
        {"slideNumber":3,"type":"contact-info","elements":[{"type":"contact-info","items":[{"type":"email","value":"a@b.com"}]}]}
    ]}"#;

    fn render(json: &str) -> String {
        HtmlRenderer::new().render(&Presentation::from_json_str(json).unwrap())
    }

    #[test]
    fn test_three_slide_pagination() {
        let html = render(THREE_SLIDES);
        let body = html.split("<body>").nth(1).unwrap();

        assert_eq!(body.matches(r#"<div class="slide"#).count(), 3);
        assert_eq!(body.matches(SLIDE_SEPARATOR).count(), 2);

        let blocks: Vec<&str> = body.split(SLIDE_SEPARATOR).collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains(r#"id="slide-1""#));
        assert!(blocks[1].contains(r#"id="slide-2""#));
        assert!(blocks[2].contains(r#"id="slide-3""#));
        assert!(blocks[2].contains("last-slide"));
        assert!(!blocks[1].contains("last-slide"));
        assert!(html.ends_with("</div></div></body></html>"));
    }

    #[test]
    fn test_split_slide_columns() {
        let html = render(THREE_SLIDES);
        assert!(html.contains(
            r#"<div class="slide layout-split template-hero-cover" id="slide-1" style="background-color: #1A1A1A;">"#
        ));
        assert!(html.contains(r#"<div class="col-left"><div class="element-heading" style="">X</div></div><div class="col-right"></div>"#));
    }

    #[test]
    fn test_contact_slide_is_centered() {
        let html = render(THREE_SLIDES);
        assert!(html.contains(r#"class="slide last-slide layout-center template-contact-info""#));
        assert!(html.contains("📧"));
        assert!(html.contains("a@b.com"));
    }

    #[test]
    fn test_features_partition() {
        let html = render(
            r#"{"slides":[{"type":"content-features","layout":{"imagePosition":"left"},
                "elements":[{"type":"heading","text":"H"},{"type":"image","src":"p.jpg"}]}]}"#,
        );
        let left = html.find(r#"<div class="content-left"><img src="p.jpg""#);
        let right = html.find(r#"<div class="content-right"><div class="element-heading""#);
        assert!(left.is_some());
        assert!(right.is_some());
    }

    #[test]
    fn test_backgrounds() {
        let html = render(
            r##"{"slides":[
                {"background":{"type":"gradient","colors":["#111","#222"]}},
                {"background":{"type":"image-overlay","image":"bg.jpg","imageOpacity":0.3}}
            ]}"##,
        );
        assert!(html.contains("background: linear-gradient(135deg, #111, #222);"));
        assert!(html.contains(r#"<img src="bg.jpg" class="bg-image" style="opacity: 0.3;" alt="">"#));
        assert!(html.contains(r#"<div class="bg-overlay" style="background: rgba(0, 0, 0, 0.7);"></div>"#));
    }

    #[test]
    fn test_section_divider_alignment_class() {
        let html = render(r#"{"slides":[{"type":"section-divider","layout":{"alignment":"right"}}]}"#);
        assert!(html.contains(r#"class="slide last-slide align-right template-section-divider""#));
    }

    #[test]
    fn test_token_values_cannot_break_stylesheet() {
        let html = render(
            r##"{"designTokens":{"colors":{"primary":"#123456;}</style><script>x()</script>{"}},"slides":[]}"##,
        );
        assert!(html.contains("--primary: #123456/stylescriptx()/script;"));
        assert_eq!(html.matches("</style>").count(), 1);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_theme_from_tokens() {
        let html = render(r##"{"designTokens":{"colors":{"primary":{"main":"#123456"}}},"slides":[]}"##);
        assert!(html.contains("--primary: #123456;"));
        assert!(html.contains("--primary-light: #FF8A5B;"));
        assert!(!html.contains(SLIDE_SEPARATOR));
    }

    #[test]
    fn test_title_from_metadata() {
        let html = render(r#"{"metadata":{"companyName":"A&B"},"slides":[]}"#);
        assert!(html.contains("<title>A&amp;B</title>"));
    }
}

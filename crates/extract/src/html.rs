//! Rendered HTML → presentation JSON.
//!
//! Reads the markup the HTML renderer writes (or a hand-edited copy of it)
//! back into a document: `:root` variables become design tokens and every
//! `div.slide` becomes a slide whose elements are its innermost text blocks
//! and images, in document order.

use crate::normalize::TextNormalizer;
use deck_core::{Error, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static SLIDE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.slide").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static STYLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("style").unwrap());
static SLIDE_HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2").unwrap());
static OVERLAY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.bg-overlay").unwrap());

static ROOT_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":root\s*\{([^}]+)\}").unwrap());
static SLIDE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^slide-(\d+)$").unwrap());
static FONT_SIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"font-size:\s*(\d+)px").unwrap());
static COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|;)\s*color:\s*([^;]+)").unwrap());
static OPACITY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"opacity:\s*([\d.]+)").unwrap());
static BACKGROUND_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"background:\s*([^;]+)").unwrap());

/// Tags whose text becomes an element.
const TEXT_TAGS: [&str; 7] = ["h1", "h2", "h3", "h4", "p", "span", "div"];

/// Tags that disqualify an ancestor from being a text block.
const BLOCK_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "p", "div"];

/// Plain text element types the renderer marks with an `element-{type}` class.
const MARKED_TYPES: [&str; 7] = [
    "heading",
    "subheading",
    "badge",
    "logo",
    "body",
    "quote",
    "logo-placeholder",
];

const MIN_TEXT_CHARS: usize = 2;

/// Extractor for rendered HTML documents.
pub struct HtmlExtractor {
    normalizer: TextNormalizer,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new().with_preserve_line_breaks(false),
        }
    }

    /// Extract an HTML file on disk. The file stem names the project when the
    /// document has no `<title>`.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let markup = std::fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.extract_str(&markup, &stem)
    }

    /// Extract from markup text.
    pub fn extract_str(&self, markup: &str, fallback_name: &str) -> Result<Value> {
        let document = Html::parse_document(markup);

        let project_name = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|t| self.normalizer.normalize(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let css: String = document
            .select(&STYLE_SELECTOR)
            .flat_map(|s| s.text())
            .collect();
        let design_tokens = extract_css_variables(&css);

        let slides: Vec<Value> = document
            .select(&SLIDE_SELECTOR)
            .enumerate()
            .map(|(idx, slide)| self.extract_slide(slide, idx + 1))
            .collect();

        if slides.is_empty() {
            return Err(Error::HtmlError("No slide blocks found".to_string()));
        }
        log::info!("Extracted {} slides from HTML", slides.len());

        Ok(json!({
            "projectName": project_name,
            "version": "1.0",
            "designTokens": design_tokens,
            "slides": slides,
        }))
    }

    fn extract_slide(&self, slide: ElementRef<'_>, position: usize) -> Value {
        let number = slide
            .value()
            .attr("id")
            .and_then(|id| SLIDE_ID_REGEX.captures(id))
            .and_then(|c| c[1].parse::<usize>().ok())
            .unwrap_or(position);

        let mut elements: Vec<Value> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut taken = HashSet::new();
        let mut background = None;

        for node in slide.descendants().skip(1) {
            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            let name = el.value().name();

            if name == "img" {
                let src = el.value().attr("src").unwrap_or_default();
                if src.is_empty() {
                    continue;
                }
                if el.value().classes().any(|c| c == "bg-image") {
                    background = Some(image_background(slide, el, src));
                } else {
                    elements.push(json!({
                        "type": "image",
                        "src": src,
                        "alt": el.value().attr("alt").unwrap_or_default(),
                    }));
                }
                continue;
            }

            if !TEXT_TAGS.contains(&name) || has_block_descendant(el) {
                continue;
            }
            if el.ancestors().any(|a| taken.contains(&a.id())) {
                continue;
            }

            let text = self.normalizer.normalize(&el.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() < MIN_TEXT_CHARS || !seen.insert(text.clone()) {
                continue;
            }
            taken.insert(el.id());

            let mut element = Map::new();
            element.insert("type".to_string(), Value::from(text_type(el)));
            element.insert("text".to_string(), Value::from(text));
            let style = inline_style(el.value().attr("style").unwrap_or_default());
            if !style.is_empty() {
                element.insert("style".to_string(), Value::Object(style));
            }
            elements.push(Value::Object(element));
        }

        let title = slide
            .select(&SLIDE_HEADING_SELECTOR)
            .next()
            .map(|h| self.normalizer.normalize(&h.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
            .or_else(|| {
                elements
                    .iter()
                    .find(|e| e["type"] == "heading")
                    .and_then(|e| e["text"].as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("Slide {}", number));

        let mut out = json!({
            "slideNumber": number,
            "title": title,
            "type": slide_template(slide),
            "elements": elements,
        });
        if let Some(background) = background {
            out["background"] = background;
        }
        out
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Design tokens from the first `:root` block, grouped by variable prefix.
pub fn extract_css_variables(css: &str) -> Value {
    let mut tokens = Map::new();
    let Some(root) = ROOT_BLOCK_REGEX.captures(css) else {
        return Value::Object(tokens);
    };

    for declaration in root[1].split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().trim_start_matches('-');
        let value = value.trim();
        if name.is_empty() {
            continue;
        }

        let (category, key) = if let Some(key) = name.strip_prefix("gradient-") {
            ("gradients", key.to_string())
        } else if let Some(key) = name.strip_prefix("shadow-") {
            ("shadows", key.to_string())
        } else if name.starts_with("radius") {
            let key = name.strip_prefix("radius-").unwrap_or("default");
            ("radius", key.to_string())
        } else if name.contains("background") {
            ("backgrounds", name.to_string())
        } else {
            ("colors", name.to_string())
        };

        if let Value::Object(group) = tokens
            .entry(category)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            group.insert(key, Value::from(value));
        }
    }

    Value::Object(tokens)
}

fn has_block_descendant(el: ElementRef<'_>) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|d| BLOCK_TAGS.contains(&d.value().name()))
}

/// Element type from the tag name and class names.
fn text_type(el: ElementRef<'_>) -> &'static str {
    let classes: Vec<&str> = el.value().classes().collect();

    if let Some(marked) = classes.iter().find_map(|c| {
        let tag = c.strip_prefix("element-")?;
        MARKED_TYPES.iter().find(|t| **t == tag).copied()
    }) {
        return marked;
    }

    match el.value().name() {
        "h1" => return "heading",
        "h2" | "h3" | "h4" => return "subheading",
        _ => {}
    }

    let has = |needle: &str| classes.iter().any(|c| c.contains(needle));
    if has("label") {
        "label"
    } else if has("badge") {
        "badge"
    } else if has("quote") {
        "quote"
    } else {
        "body"
    }
}

/// Font size and color from an inline style attribute.
fn inline_style(style: &str) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(c) = FONT_SIZE_REGEX.captures(style) {
        map.insert("fontSize".to_string(), Value::from(format!("{}px", &c[1])));
    }
    if let Some(c) = COLOR_REGEX.captures(style) {
        map.insert("color".to_string(), Value::from(c[1].trim()));
    }
    map
}

fn image_background(slide: ElementRef<'_>, img: ElementRef<'_>, src: &str) -> Value {
    let mut background = json!({ "type": "image-overlay", "image": src });
    let style = img.value().attr("style").unwrap_or_default();
    if let Some(opacity) = OPACITY_REGEX
        .captures(style)
        .and_then(|c| c[1].parse::<f64>().ok())
    {
        background["imageOpacity"] = Value::from(opacity);
    }
    if let Some(overlay) = slide
        .select(&OVERLAY_SELECTOR)
        .next()
        .and_then(|o| o.value().attr("style"))
        .and_then(|s| BACKGROUND_REGEX.captures(s))
    {
        background["overlayColor"] = Value::from(overlay[1].trim());
    }
    background
}

/// Template from a `template-*` class, else from the slide's theme class.
fn slide_template(slide: ElementRef<'_>) -> String {
    let classes: Vec<&str> = slide.value().classes().collect();
    if let Some(template) = classes.iter().find_map(|c| c.strip_prefix("template-")) {
        return template.to_string();
    }

    if classes.contains(&"slide-primary") {
        return "section-divider".to_string();
    }
    if classes.contains(&"slide-dark") {
        let hero = slide
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|d| d.value().classes().any(|c| c.to_lowercase().contains("hero")));
        if hero {
            return "hero-cover".to_string();
        }
    }
    "content-text".to_string()
}

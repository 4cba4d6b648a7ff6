//! PDF → presentation JSON.
//!
//! One slide structure per page carrying the page text as a single body
//! element. Slide types come from a text-volume heuristic; visual styling is
//! not analysed, so the document carries default design tokens.

use crate::normalize::TextNormalizer;
use deck_core::{Error, Result};
use lopdf::Document;
use serde_json::{json, Value};
use std::path::Path;

const ANALYSIS_METHOD: &str = "lopdf-text-extraction";

/// Keywords marking a table-of-contents page.
const TOC_KEYWORDS: [&str; 3] = ["목차", "Contents", "Agenda"];

/// Pages below both limits are treated as section dividers.
const DIVIDER_MAX_CHARS: usize = 50;
const DIVIDER_MAX_WORDS: usize = 10;

/// Slide type for the page at `index` (0-based).
pub fn classify_page(index: usize, text: &str) -> &'static str {
    if index == 0 {
        "hero-cover"
    } else if TOC_KEYWORDS.iter().any(|k| text.contains(k)) {
        "table-of-contents"
    } else if text.chars().count() < DIVIDER_MAX_CHARS && text.split_whitespace().count() < DIVIDER_MAX_WORDS {
        "section-divider"
    } else {
        "content-text"
    }
}

/// Extractor for PDF documents.
pub struct PdfExtractor {
    normalizer: TextNormalizer,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    /// Extract a PDF file on disk.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| Error::PdfError(format!("Failed to load PDF: {}", e)))?;
        self.extract_document(&doc, &path.display().to_string())
    }

    /// Extract a PDF held in memory. `source` is recorded as the source file.
    pub fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<Value> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::PdfError(format!("Failed to load PDF: {}", e)))?;
        self.extract_document(&doc, source)
    }

    fn extract_document(&self, doc: &Document, source: &str) -> Result<Value> {
        let pages: Vec<String> = doc
            .get_pages()
            .keys()
            .map(|&number| match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("No text extracted from page {}: {}", number, e);
                    String::new()
                }
            })
            .collect();

        log::info!("Analyzed {} pages from {}", pages.len(), source);
        Ok(self.pages_to_json(source, &pages))
    }

    /// Build the presentation document from raw page texts.
    pub fn pages_to_json(&self, source: &str, pages: &[String]) -> Value {
        let slides: Vec<Value> = pages
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let text = self.normalizer.normalize(raw);
                let kind = classify_page(idx, &text);
                log::debug!("Page {}: {} ({} chars)", idx + 1, kind, text.chars().count());
                json!({
                    "slideNumber": idx + 1,
                    "type": kind,
                    "layout": "auto-detected",
                    "elements": {
                        "body": {
                            "text": text,
                            "position": "center",
                            "fontSize": "18px",
                            "color": "#000000"
                        }
                    },
                    "background": { "color": "#FFFFFF" }
                })
            })
            .collect();

        json!({
            "metadata": {
                "sourceFile": source,
                "totalPages": pages.len(),
                "analysisMethod": ANALYSIS_METHOD
            },
            "slideStructures": slides,
            "designTokens": default_design_tokens()
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn default_design_tokens() -> Value {
    json!({
        "colors": {
            "primary": { "main": "#000000" },
            "background": { "main": "#FFFFFF" },
            "text": { "primary": "#000000", "secondary": "#666666" }
        },
        "typography": {
            "heading": { "fontFamily": "sans-serif", "fontWeight": "700" },
            "body": { "fontFamily": "sans-serif", "fontWeight": "400" }
        },
        "layout": { "aspectRatio": "16:9" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Background, ElementKind, Presentation};

    #[test]
    fn test_classify_page() {
        let long = "word ".repeat(30);
        assert_eq!(classify_page(0, ""), "hero-cover");
        assert_eq!(classify_page(0, &long), "hero-cover");
        assert_eq!(classify_page(1, "목차\n1. 회사 소개"), "table-of-contents");
        assert_eq!(classify_page(4, &format!("Agenda {}", long)), "table-of-contents");
        assert_eq!(classify_page(2, "Part 2"), "section-divider");
        assert_eq!(classify_page(2, &long), "content-text");
    }

    #[test]
    fn test_short_text_with_many_words_is_content() {
        // 12 words, under 50 characters.
        let text = "a b c d e f g h i j k l";
        assert!(text.chars().count() < 50);
        assert_eq!(classify_page(3, text), "content-text");
    }

    #[test]
    fn test_pages_to_json_loads_as_presentation() {
        let pages = vec![
            "Company  Deck\r\n2025".to_string(),
            "Contents\n1 Intro".to_string(),
            "Intro".to_string(),
        ];
        let value = PdfExtractor::new().pages_to_json("deck.pdf", &pages);

        assert_eq!(value["metadata"]["totalPages"], 3);
        assert_eq!(value["metadata"]["sourceFile"], "deck.pdf");
        assert_eq!(value["slideStructures"][0]["elements"]["body"]["text"], "Company Deck\n2025");

        let doc = Presentation::from_json_str(&value.to_string()).unwrap();
        assert_eq!(doc.slides.len(), 3);
        assert_eq!(doc.slides[1].template(), "table-of-contents");
        assert_eq!(doc.slides[2].template(), "section-divider");
        assert_eq!(
            doc.slides[0].background,
            Background::Solid {
                color: Some("#FFFFFF".to_string())
            }
        );
        assert!(matches!(&doc.slides[2].elements[0].kind, ElementKind::Body(t) if t.text == "Intro"));
    }

    #[test]
    fn test_invalid_pdf_bytes() {
        let err = PdfExtractor::new().extract_bytes(b"not a pdf", "x.pdf").unwrap_err();
        assert!(matches!(err, Error::PdfError(_)));
    }
}

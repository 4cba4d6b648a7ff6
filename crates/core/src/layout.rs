//! Layout classification.
//!
//! Decides, from a slide's effective template and element composition, which
//! structure both renderers use and which region each element lands in.

use crate::types::{Element, Position, Side, Slide};

/// Templates rendered as two full-height columns.
pub const SPLIT_TEMPLATES: [&str; 4] = ["hero-cover", "content-split", "service-detail", "content-profile"];

/// Templates rendered as one centered region.
pub const CENTER_TEMPLATES: [&str; 5] = [
    "center-statement",
    "contact-info",
    "vision-mission",
    "content-statement",
    "contact",
];

/// Templates rendered as an image pane beside a text pane.
pub const FEATURE_TEMPLATES: [&str; 2] = ["content-features", "image-features"];

/// Structural layout of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// Single flowing region in document order.
    Flow,
    /// Two side-by-side columns.
    Split,
    /// Single centered region.
    Center,
    /// Two-region grid, image pane 2fr and text pane 3fr.
    FeatureGrid,
}

/// Region an element is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Main,
    Left,
    Right,
}

/// Section-divider text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Derive from free text: "right" wins, then "center", else left.
    pub fn from_config(value: &str) -> Self {
        if value.contains("right") {
            Self::Right
        } else if value.contains("center") {
            Self::Center
        } else {
            Self::Left
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Left => "align-left",
            Self::Center => "align-center",
            Self::Right => "align-right",
        }
    }
}

/// How a slide's elements are spatially grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDecision {
    pub structure: Structure,
    pub image_side: Side,
    /// Only set for `section-divider` slides.
    pub alignment: Option<Alignment>,
    /// Region per element, indexed like `slide.elements`.
    pub regions: Vec<Region>,
}

impl LayoutDecision {
    /// Elements assigned to `region`, in document order.
    pub fn elements_in<'a>(&self, elements: &'a [Element], region: Region) -> Vec<&'a Element> {
        elements
            .iter()
            .zip(&self.regions)
            .filter(|(_, r)| **r == region)
            .map(|(el, _)| el)
            .collect()
    }

    /// Structural CSS classes for the slide block.
    pub fn css_class(&self) -> &'static str {
        match (self.structure, self.image_side) {
            (Structure::Split, Side::Left) => "layout-split image-left",
            (Structure::Split, Side::Right) => "layout-split",
            (Structure::Center, _) => "layout-center",
            (Structure::FeatureGrid, Side::Right) => "image-right",
            _ => "",
        }
    }
}

/// Classify a slide.
pub fn classify(slide: &Slide) -> LayoutDecision {
    let template = slide.template();
    let image_side = slide.image_side();

    let structure = if SPLIT_TEMPLATES.contains(&template) {
        Structure::Split
    } else if CENTER_TEMPLATES.contains(&template) {
        Structure::Center
    } else if FEATURE_TEMPLATES.contains(&template) {
        Structure::FeatureGrid
    } else {
        Structure::Flow
    };

    let regions = slide
        .elements
        .iter()
        .map(|el| match structure {
            Structure::Split => split_region(el, image_side),
            Structure::FeatureGrid => feature_region(el, image_side),
            Structure::Flow | Structure::Center => Region::Main,
        })
        .collect();

    let alignment = (template == "section-divider")
        .then(|| Alignment::from_config(slide.alignment().unwrap_or("left")));

    LayoutDecision {
        structure,
        image_side,
        alignment,
        regions,
    }
}

/// Split columns: with the image on the left only an unhinted image moves;
/// with the image on the right an explicit right hint also moves.
fn split_region(el: &Element, image_side: Side) -> Region {
    match image_side {
        Side::Left => {
            if el.is_image() && el.position != Some(Position::Right) {
                Region::Left
            } else {
                Region::Right
            }
        }
        Side::Right => {
            if el.position == Some(Position::Right)
                || (el.is_image() && el.position != Some(Position::Left))
            {
                Region::Right
            } else {
                Region::Left
            }
        }
    }
}

fn feature_region(el: &Element, image_side: Side) -> Region {
    let image_region = match image_side {
        Side::Left => Region::Left,
        Side::Right => Region::Right,
    };
    let text_region = match image_side {
        Side::Left => Region::Right,
        Side::Right => Region::Left,
    };
    if el.is_image() {
        image_region
    } else {
        text_region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Presentation;

    fn slide(json: &str) -> Slide {
        let doc = format!(r#"{{"slides":[{}]}}"#, json);
        Presentation::from_json_str(&doc).unwrap().slides.remove(0)
    }

    #[test]
    fn test_content_split_defaults_right() {
        let s = slide(r#"{"type":"content-split","elements":[{"type":"heading","text":"A"},{"type":"image","src":"x"}]}"#);
        let d = classify(&s);
        assert_eq!(d.structure, Structure::Split);
        assert_eq!(d.image_side, Side::Right);
        assert_eq!(d.regions, vec![Region::Left, Region::Right]);
        assert_eq!(d.css_class(), "layout-split");
    }

    #[test]
    fn test_features_image_left() {
        let s = slide(
            r#"{"type":"content-features","layout":{"imagePosition":"left"},
                "elements":[{"type":"image","src":"x"},{"type":"heading","text":"H"}]}"#,
        );
        let d = classify(&s);
        assert_eq!(d.structure, Structure::FeatureGrid);
        assert_eq!(d.regions, vec![Region::Left, Region::Right]);
        assert_eq!(d.elements_in(&s.elements, Region::Left).len(), 1);
        assert!(d.elements_in(&s.elements, Region::Left)[0].is_image());
        assert_eq!(d.css_class(), "");
    }

    #[test]
    fn test_features_without_layout_default_right() {
        let d = classify(&slide(r#"{"type":"image-features","elements":[]}"#));
        assert_eq!(d.image_side, Side::Right);
        assert_eq!(d.css_class(), "image-right");
    }

    #[test]
    fn test_split_default_right_honours_position_hints() {
        let s = slide(
            r#"{"type":"hero-cover","elements":[
                {"type":"badge","text":"b","position":"right"},
                {"type":"image","src":"x","position":"left"},
                {"type":"heading","text":"h"}
            ]}"#,
        );
        let d = classify(&s);
        assert_eq!(d.regions, vec![Region::Right, Region::Left, Region::Left]);
    }

    #[test]
    fn test_split_left_checks_type_only() {
        let s = slide(
            r#"{"type":"content-split","layout":{"imagePosition":"left"},"elements":[
                {"type":"badge","text":"b","position":"left"},
                {"type":"image","src":"x"},
                {"type":"image","src":"y","position":"right"}
            ]}"#,
        );
        let d = classify(&s);
        assert_eq!(d.regions, vec![Region::Right, Region::Left, Region::Right]);
        assert_eq!(d.css_class(), "layout-split image-left");
    }

    #[test]
    fn test_center_and_flow() {
        let center = classify(&slide(r#"{"type":"contact-info","elements":[{"text":"x"}]}"#));
        assert_eq!(center.structure, Structure::Center);
        assert_eq!(center.regions, vec![Region::Main]);

        let flow = classify(&slide(r#"{"type":"content-text"}"#));
        assert_eq!(flow.structure, Structure::Flow);
        assert_eq!(flow.css_class(), "");
        assert!(flow.alignment.is_none());
    }

    #[test]
    fn test_section_divider_alignment() {
        let right = classify(&slide(r#"{"type":"section-divider","layout":{"alignment":"center-right"}}"#));
        assert_eq!(right.alignment, Some(Alignment::Right));

        let center = classify(&slide(r#"{"type":"section-divider","layout":{"alignment":"center"}}"#));
        assert_eq!(center.alignment, Some(Alignment::Center));

        let default = classify(&slide(r#"{"type":"section-divider"}"#));
        assert_eq!(default.alignment, Some(Alignment::Left));
        assert_eq!(Alignment::Left.css_class(), "align-left");
    }

    #[test]
    fn test_layout_template_overrides_type() {
        let d = classify(&slide(r#"{"type":"content-text","layout":{"template":"content-split"}}"#));
        assert_eq!(d.structure, Structure::Split);
    }
}

//! Domain types for the presentation document model.
//!
//! A [`Presentation`] is loaded once per conversion run and consumed read-only
//! by both renderers. Elements form a closed set of variants; anything outside
//! the vocabulary becomes [`ElementKind::Unknown`] instead of failing the load.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Per-element style overrides (camelCase CSS property → value), in document order.
pub type StyleMap = Map<String, Value>;

/// Template used when a slide declares none.
pub const DEFAULT_TEMPLATE: &str = "content-text";

/// Represents an entire presentation: design tokens plus slides in order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Nested mapping of named color/typography/spacing values.
    #[serde(default)]
    pub design_tokens: DesignTokens,

    /// Slides in presentation order.
    #[serde(default, alias = "slideStructures")]
    pub slides: Vec<Slide>,

    /// Optional descriptive metadata.
    #[serde(default)]
    pub metadata: Metadata,

    /// Project name, used as a title fallback.
    #[serde(default)]
    pub project_name: Option<String>,
}

impl Presentation {
    /// Parse a presentation from JSON text, fill in missing slide numbers and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut presentation: Presentation = serde_json::from_str(json)?;
        presentation.number_slides();
        presentation.validate()?;
        Ok(presentation)
    }

    /// Load a presentation from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Assign position-based numbers to slides that declare none.
    fn number_slides(&mut self) {
        for (idx, slide) in self.slides.iter_mut().enumerate() {
            if slide.slide_number.is_none() {
                slide.slide_number = Some(idx as u32 + 1);
            }
        }
    }

    /// Check model invariants: slide numbers never repeat.
    ///
    /// A number that does not match its position is tolerated with a warning.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for (idx, slide) in self.slides.iter().enumerate() {
            let number = slide.number();
            if !seen.insert(number) {
                return Err(Error::InvalidDocument(format!(
                    "slide number {} appears more than once",
                    number
                )));
            }
            if number as usize != idx + 1 {
                log::warn!(
                    "Slide at position {} declares slideNumber {}",
                    idx + 1,
                    number
                );
            }
        }

        Ok(())
    }

    /// Title for the rendered document.
    pub fn title(&self) -> &str {
        self.metadata
            .company_name
            .as_deref()
            .or(self.project_name.as_deref())
            .unwrap_or("Presentation")
    }
}

/// Optional presentation metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub source_file: Option<String>,
}

/// Raw design tokens. Resolution lives in [`crate::style`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DesignTokens(pub Value);

/// A single slide.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based slide number. Filled from position when absent.
    #[serde(default)]
    pub slide_number: Option<u32>,

    /// Template tag from the closed vocabulary (hero-cover, content-split, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Template tag as emitted by extraction adapters.
    #[serde(default)]
    pub template: Option<String>,

    /// Optional slide title.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub title: Option<String>,

    /// Layout configuration; a bare string carries no configuration.
    #[serde(default, deserialize_with = "deserialize_layout")]
    pub layout: Option<LayoutConfig>,

    #[serde(default, deserialize_with = "deserialize_background")]
    pub background: Background,

    /// Elements in reading order.
    #[serde(default, alias = "content", deserialize_with = "deserialize_elements")]
    pub elements: Vec<Element>,
}

impl Slide {
    /// Slide number (0 only for slides built outside [`Presentation::from_json_str`]).
    pub fn number(&self) -> u32 {
        self.slide_number.unwrap_or(0)
    }

    /// Effective template: `layout.template`, then `type`, then `template`.
    pub fn template(&self) -> &str {
        self.layout
            .as_ref()
            .and_then(|l| l.template.as_deref())
            .or(self.kind.as_deref())
            .or(self.template.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TEMPLATE)
    }

    /// Declared image side; right unless the layout says `left`.
    pub fn image_side(&self) -> Side {
        match self
            .layout
            .as_ref()
            .and_then(|l| l.image_position.as_deref())
        {
            Some("left") => Side::Left,
            _ => Side::Right,
        }
    }

    /// Declared free-text alignment, if any.
    pub fn alignment(&self) -> Option<&str> {
        self.layout.as_ref().and_then(|l| l.alignment.as_deref())
    }

    /// Display title: explicit title, else the first heading.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty()).or_else(|| {
            self.elements.iter().find_map(|el| match &el.kind {
                ElementKind::Heading(t) if !t.text.is_empty() => Some(t.text.as_str()),
                _ => None,
            })
        })
    }
}

/// Slide layout configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub image_position: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
}

/// Left or right side of a two-column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Slide background treatment.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Background {
    /// Theme default background.
    #[default]
    Default,
    /// Solid color; `None` means the theme's dark background.
    Solid { color: Option<String> },
    /// Gradient stop list; empty means the theme's default stops.
    Gradient { stops: Vec<String> },
    /// Full-bleed image with opacity and an overlay color.
    Image {
        src: String,
        opacity: f64,
        overlay: String,
    },
}

impl Background {
    fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Default;
        };
        let string = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

        match map.get("type").and_then(Value::as_str) {
            Some("solid") => Self::Solid {
                color: string("color"),
            },
            Some("gradient") => Self::Gradient {
                stops: map
                    .get("colors")
                    .and_then(Value::as_array)
                    .map(|stops| {
                        stops
                            .iter()
                            .filter_map(|s| s.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            Some("image-overlay") | Some("image") => Self::Image {
                src: string("image").or_else(|| string("src")).unwrap_or_default(),
                opacity: map
                    .get("imageOpacity")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.4),
                overlay: string("overlayColor")
                    .unwrap_or_else(|| "rgba(0, 0, 0, 0.7)".to_string()),
            },
            None if map.contains_key("color") => Self::Solid {
                color: string("color"),
            },
            _ => Self::Default,
        }
    }
}

/// Position hint carried by layout-aware elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
    Center,
}

impl Position {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "center" => Some(Self::Center),
            _ => None,
        }
    }
}

/// One visual unit within a slide.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    pub style: StyleMap,
    pub position: Option<Position>,
}

impl Element {
    /// Create an element with no style overrides or position hint.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            style: StyleMap::new(),
            position: None,
        }
    }

    /// Builder method: set the position hint.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Build an element from JSON; `default_tag` applies when `type` is absent.
    pub fn from_value(value: Value, default_tag: &str) -> serde_json::Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            Value::String(text) => {
                let mut map = Map::new();
                map.insert("text".to_string(), Value::String(text));
                map
            }
            other => {
                return Err(serde::de::Error::custom(format!(
                    "element must be an object, found {}",
                    other
                )))
            }
        };

        let tag = map
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(default_tag)
            .to_string();
        let style = match map.remove("style") {
            Some(Value::Object(style)) => style,
            _ => StyleMap::new(),
        };
        let position = map
            .get("position")
            .and_then(Value::as_str)
            .and_then(Position::parse);

        Ok(Self {
            kind: ElementKind::from_tag(&tag, Value::Object(map))?,
            style,
            position,
        })
    }

    /// Whether this element is a plain image.
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    /// Text carried by a plain text variant.
    pub fn plain_text(&self) -> Option<&str> {
        self.kind.text_content().map(|t| t.text.as_str())
    }

    /// All text this element displays, in reading order, without empty entries.
    pub fn text_fragments(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |s: &str| {
            let s = s.trim();
            if !s.is_empty() {
                out.push(s.to_string());
            }
        };

        match &self.kind {
            ElementKind::Image(_) | ElementKind::IconGrid(_) => {}
            ElementKind::Cards(_, group) => {
                for item in &group.items {
                    push(item.title());
                    push(&item.subtitle);
                    push(item.value());
                }
            }
            ElementKind::ModelCards(cards) => {
                for item in &cards.items {
                    push(&item.title);
                    push(&item.description);
                }
            }
            ElementKind::Timeline(timeline) => {
                for period in &timeline.periods {
                    push(&period.label().to_string());
                    push(&period.milestone);
                    push(&period.description);
                    period.events.iter().for_each(|e| push(e));
                }
            }
            ElementKind::FeatureList(list) | ElementKind::FeatureGrid(list) => {
                for item in &list.items {
                    push(&item.title);
                    push(&item.description);
                }
            }
            ElementKind::ClientSection(section) => {
                push(&section.title);
                section.clients.iter().for_each(|c| push(c.name()));
            }
            ElementKind::ClientLogos(logos) => {
                logos.clients.iter().for_each(|c| push(c.name()));
            }
            ElementKind::ContactSection(section) => {
                push(&section.title);
                section.items.iter().for_each(|i| push(&i.value));
            }
            ElementKind::ContactInfo(info) => {
                info.items.iter().for_each(|i| push(&i.value));
            }
            ElementKind::HighlightBox(HighlightBox { title, content }) => {
                push(title);
                push(content);
            }
            ElementKind::ImageGrid(grid) => {
                grid.images.iter().for_each(|i| push(&i.caption));
            }
            ElementKind::ProcessFlow(flow) => {
                push(&flow.title);
                for step in &flow.steps {
                    push(&step.title);
                    push(&step.description);
                }
            }
            ElementKind::FacilityInfo(info) => {
                for item in &info.items {
                    push(&item.label);
                    push(&item.value);
                }
            }
            ElementKind::NetworkRegions(regions) => {
                for item in &regions.items {
                    push(&item.region);
                    push(&item.countries.join(", "));
                }
            }
            ElementKind::TocItems(toc) => {
                for item in &toc.items {
                    push(&format!("{} {}", item.number, item.title));
                }
            }
            ElementKind::StatBlock(stats) => {
                for item in &stats.items {
                    push(&format!("{}{} {}", item.value, item.unit, item.label));
                }
            }
            ElementKind::Chart(chart) => {
                push(&chart.title);
                for point in &chart.data {
                    push(&format!("{} ({}%)", point.label, point.value));
                }
            }
            ElementKind::ComparisonTable(table) => {
                push(&table.headers.join(" | "));
                for row in &table.rows {
                    let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
                    push(&format!("{} | {}", row.company, values.join(" | ")));
                }
            }
            ElementKind::Unknown(unknown) => {
                for key in ["title", "text", "content"] {
                    if let Some(s) = unknown.fields.get(key).and_then(Value::as_str) {
                        push(s);
                    }
                }
            }
            kind => {
                if let Some(t) = kind.text_content() {
                    push(&t.text);
                }
            }
        }

        out
    }

    /// Image sources this element references, in order.
    pub fn image_sources(&self) -> Vec<&str> {
        match &self.kind {
            ElementKind::Image(image) => vec![image.src.as_str()],
            ElementKind::ImageGrid(grid) => grid.images.iter().map(|i| i.src.as_str()).collect(),
            ElementKind::Cards(_, group) => group
                .items
                .iter()
                .filter_map(|i| i.image.as_deref())
                .collect(),
            _ => Vec::new(),
        }
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Element::from_value(value, "body").map_err(serde::de::Error::custom)
    }
}

/// The closed element vocabulary.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Heading(TextContent),
    Subheading(TextContent),
    /// `body` and `tagline`.
    Body(TextContent),
    Badge(TextContent),
    Quote(TextContent),
    Logo(TextContent),
    CompanyName(TextContent),
    Label(TextContent),
    LogoPlaceholder(TextContent),
    Image(ImageRef),
    Cards(CardVariant, CardGroup),
    ModelCards(ModelCards),
    Timeline(Timeline),
    /// `feature-list`, `service-list` and `capability-list`.
    FeatureList(FeatureList),
    /// `client-section` and `client-highlight`.
    ClientSection(ClientSection),
    ContactSection(ContactSection),
    HighlightBox(HighlightBox),
    /// `image-grid` and `image-gallery`.
    ImageGrid(ImageGrid),
    ProcessFlow(ProcessFlow),
    FacilityInfo(FacilityInfo),
    FeatureGrid(FeatureList),
    NetworkRegions(NetworkRegions),
    TocItems(TocItems),
    StatBlock(StatBlock),
    Chart(Chart),
    ComparisonTable(ComparisonTable),
    IconGrid(IconGrid),
    ClientLogos(ClientLogos),
    ContactInfo(ContactInfo),
    /// Any tag outside the vocabulary. Rendered generically.
    Unknown(UnknownElement),
}

impl ElementKind {
    /// Parse the payload for a type tag.
    pub fn from_tag(tag: &str, value: Value) -> serde_json::Result<Self> {
        use serde_json::from_value as parse;

        Ok(match tag {
            "heading" => Self::Heading(parse(value)?),
            "subheading" => Self::Subheading(parse(value)?),
            "body" | "tagline" => Self::Body(parse(value)?),
            "badge" => Self::Badge(parse(value)?),
            "quote" => Self::Quote(parse(value)?),
            "logo" => Self::Logo(parse(value)?),
            "company-name" => Self::CompanyName(parse(value)?),
            "label" => Self::Label(parse(value)?),
            "logo-placeholder" => Self::LogoPlaceholder(parse(value)?),
            "image" => Self::Image(parse(value)?),
            "info-cards" => Self::Cards(CardVariant::Info, parse(value)?),
            "philosophy-cards" => Self::Cards(CardVariant::Philosophy, parse(value)?),
            "service-cards" => Self::Cards(CardVariant::Service, parse(value)?),
            "value-cards" => Self::Cards(CardVariant::Value, parse(value)?),
            "model-cards" => Self::ModelCards(parse(value)?),
            "timeline" => Self::Timeline(parse(value)?),
            "feature-list" | "service-list" | "capability-list" => {
                Self::FeatureList(parse(value)?)
            }
            "client-section" | "client-highlight" => Self::ClientSection(parse(value)?),
            "contact-section" => Self::ContactSection(parse(value)?),
            "highlight-box" => Self::HighlightBox(parse(value)?),
            "image-grid" | "image-gallery" => Self::ImageGrid(parse(value)?),
            "process-flow" => Self::ProcessFlow(parse(value)?),
            "facility-info" => Self::FacilityInfo(parse(value)?),
            "feature-grid" => Self::FeatureGrid(parse(value)?),
            "network-regions" => Self::NetworkRegions(parse(value)?),
            "toc-item" => Self::TocItems(parse(value)?),
            "stat-block" => Self::StatBlock(parse(value)?),
            "chart" => Self::Chart(parse(value)?),
            "comparison-table" => Self::ComparisonTable(parse(value)?),
            "icon-grid" => Self::IconGrid(parse(value)?),
            "client-logos" => Self::ClientLogos(parse(value)?),
            "contact-info" => Self::ContactInfo(parse(value)?),
            other => {
                let fields = match value {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                Self::Unknown(UnknownElement {
                    tag: other.to_string(),
                    fields,
                })
            }
        })
    }

    /// Canonical type tag.
    pub fn tag(&self) -> &str {
        match self {
            Self::Heading(_) => "heading",
            Self::Subheading(_) => "subheading",
            Self::Body(_) => "body",
            Self::Badge(_) => "badge",
            Self::Quote(_) => "quote",
            Self::Logo(_) => "logo",
            Self::CompanyName(_) => "company-name",
            Self::Label(_) => "label",
            Self::LogoPlaceholder(_) => "logo-placeholder",
            Self::Image(_) => "image",
            Self::Cards(variant, _) => variant.tag(),
            Self::ModelCards(_) => "model-cards",
            Self::Timeline(_) => "timeline",
            Self::FeatureList(_) => "feature-list",
            Self::ClientSection(_) => "client-section",
            Self::ContactSection(_) => "contact-section",
            Self::HighlightBox(_) => "highlight-box",
            Self::ImageGrid(_) => "image-grid",
            Self::ProcessFlow(_) => "process-flow",
            Self::FacilityInfo(_) => "facility-info",
            Self::FeatureGrid(_) => "feature-grid",
            Self::NetworkRegions(_) => "network-regions",
            Self::TocItems(_) => "toc-item",
            Self::StatBlock(_) => "stat-block",
            Self::Chart(_) => "chart",
            Self::ComparisonTable(_) => "comparison-table",
            Self::IconGrid(_) => "icon-grid",
            Self::ClientLogos(_) => "client-logos",
            Self::ContactInfo(_) => "contact-info",
            Self::Unknown(unknown) => &unknown.tag,
        }
    }

    /// Payload of the single-text variants.
    pub fn text_content(&self) -> Option<&TextContent> {
        match self {
            Self::Heading(t)
            | Self::Subheading(t)
            | Self::Body(t)
            | Self::Badge(t)
            | Self::Quote(t)
            | Self::Logo(t)
            | Self::CompanyName(t)
            | Self::Label(t)
            | Self::LogoPlaceholder(t) => Some(t),
            _ => None,
        }
    }
}

/// A string that may be written in JSON as a string, number or boolean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scalar(pub String);

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::Bool(b) => Ok(Self(b.to_string())),
            Value::Null => Ok(Self::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number, found {}",
                other
            ))),
        }
    }
}

/// Accepts a number or a numeric string; anything else reads as zero.
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Text payload field: null reads as empty, numbers and booleans as their literal.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(|s| s.0)
}

/// Optional text; null reads as absent.
fn deserialize_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => serde_json::from_value::<Scalar>(other)
            .map(|s| Some(s.0))
            .map_err(serde::de::Error::custom),
    }
}

/// List of text payloads; null entries are dropped.
fn deserialize_text_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(|v| serde_json::from_value::<Scalar>(v).map(|s| s.0))
            .collect::<serde_json::Result<_>>()
            .map_err(serde::de::Error::custom)?,
        Value::Null => Vec::new(),
        other => vec![serde_json::from_value::<Scalar>(other)
            .map_err(serde::de::Error::custom)?
            .0],
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub src: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub alt: String,
}

/// Card group flavours sharing one card shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    Info,
    Philosophy,
    Service,
    Value,
}

impl CardVariant {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Info => "info-cards",
            Self::Philosophy => "philosophy-cards",
            Self::Service => "service-cards",
            Self::Value => "value-cards",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardGroup {
    #[serde(default)]
    pub items: Vec<CardItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardItem {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub label: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CardItem {
    /// `title`, falling back to `label`.
    pub fn title(&self) -> &str {
        if self.title.is_empty() {
            &self.label
        } else {
            &self.title
        }
    }

    /// `value`, falling back to `description`.
    pub fn value(&self) -> &str {
        if self.value.is_empty() {
            &self.description
        } else {
            &self.value
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelCards {
    #[serde(default)]
    pub items: Vec<ModelCard>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    #[serde(default = "default_model_icon")]
    pub icon: String,
    #[serde(default)]
    pub icon_color: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
}

fn default_model_icon() -> String {
    "circle".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub label: Scalar,
    #[serde(default)]
    pub year: Scalar,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub milestone: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_text_list")]
    pub events: Vec<String>,
    #[serde(default)]
    pub bar_color: Option<String>,
    #[serde(default)]
    pub highlight: bool,
}

impl Period {
    /// `label`, falling back to `year`.
    pub fn label(&self) -> &Scalar {
        if self.label.is_empty() {
            &self.year
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureList {
    #[serde(default)]
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureItem {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub icon: String,
}

/// A client written either as a bare name or as `{name, highlight}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientEntry {
    Name(Scalar),
    Detailed {
        #[serde(default, deserialize_with = "deserialize_text")]
        name: String,
        #[serde(default)]
        highlight: bool,
    },
}

impl ClientEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name.as_str(),
            Self::Detailed { name, .. } => name,
        }
    }

    pub fn highlight(&self) -> bool {
        matches!(self, Self::Detailed { highlight: true, .. })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSection {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientLogos {
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactItem {
    #[serde(default, rename = "type", deserialize_with = "deserialize_text")]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSection {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default)]
    pub items: Vec<ContactItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub items: Vec<ContactItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HighlightBox {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGrid {
    #[serde(default)]
    pub images: Vec<GridImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridImage {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub src: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub alt: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub caption: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessFlow {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default)]
    pub steps: Vec<ProcessStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessStep {
    #[serde(default)]
    pub step: Scalar,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacilityInfo {
    #[serde(default)]
    pub items: Vec<FacilityItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacilityItem {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub label: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkRegions {
    #[serde(default)]
    pub items: Vec<NetworkRegion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkRegion {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub region: String,
    #[serde(default, deserialize_with = "deserialize_text_list")]
    pub countries: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TocItems {
    #[serde(default)]
    pub items: Vec<TocEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    #[serde(default)]
    pub number: Scalar,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default)]
    pub number_color: Option<String>,
    #[serde(default)]
    pub title_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    pub items: Vec<Stat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(default)]
    pub value: Scalar,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub unit: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub label: String,
    #[serde(default)]
    pub value_color: Option<String>,
    #[serde(default)]
    pub value_size: Option<String>,
}

/// Horizontal bar chart; `data` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    pub data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartPoint {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub label: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    #[serde(default, deserialize_with = "deserialize_text_list")]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<ComparisonRow>,
    #[serde(default)]
    pub highlight_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub company: String,
    #[serde(default)]
    pub values: Vec<Scalar>,
    #[serde(default)]
    pub is_highlight: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconGrid {
    #[serde(default = "default_icon_total")]
    pub total: usize,
    #[serde(default = "default_icon_highlighted")]
    pub highlighted: usize,
    #[serde(default)]
    pub highlight_color: Option<String>,
    #[serde(default)]
    pub default_color: Option<String>,
}

fn default_icon_total() -> usize {
    10
}

fn default_icon_highlighted() -> usize {
    6
}

/// An element whose tag is outside the vocabulary.
#[derive(Debug, Clone, Default)]
pub struct UnknownElement {
    pub tag: String,
    pub fields: Map<String, Value>,
}

fn deserialize_layout<'de, D>(deserializer: D) -> std::result::Result<Option<LayoutConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn deserialize_background<'de, D>(deserializer: D) -> std::result::Result<Background, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Background::from_value(Value::deserialize(deserializer)?))
}

/// Accepts an element list or a keyed element object.
///
/// In the keyed form each value is one element (its key is the default type)
/// or an array of elements: `texts` default to `body`, `images` to `image`.
fn deserialize_elements<'de, D>(deserializer: D) -> std::result::Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    elements_from_value(value).map_err(serde::de::Error::custom)
}

fn elements_from_value(value: Value) -> serde_json::Result<Vec<Element>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| Element::from_value(item, "body"))
            .collect(),
        Value::Object(map) => {
            let mut elements = Vec::new();
            for (key, value) in map {
                match value {
                    Value::Array(items) => {
                        let default_tag = match key.as_str() {
                            "images" => "image",
                            "texts" => "body",
                            other => other,
                        };
                        for item in items {
                            elements.push(Element::from_value(item, default_tag)?);
                        }
                    }
                    Value::Null => {}
                    other => elements.push(Element::from_value(other, &key)?),
                }
            }
            Ok(elements)
        }
        other => Err(serde::de::Error::custom(format!(
            "elements must be a list or an object, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Presentation {
        Presentation::from_json_str(json).unwrap()
    }

    #[test]
    fn test_slide_numbers_default_to_position() {
        let p = parse(r#"{"slides":[{"type":"hero-cover"},{"type":"content-text"}]}"#);
        assert_eq!(p.slides[0].number(), 1);
        assert_eq!(p.slides[1].number(), 2);
    }

    #[test]
    fn test_duplicate_slide_number_rejected() {
        let err = Presentation::from_json_str(
            r#"{"slides":[{"slideNumber":1},{"slideNumber":1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = Presentation::from_json_str(r#"{"slides": [}"#).unwrap_err();
        assert!(matches!(err, Error::JsonError(_)));
    }

    #[test]
    fn test_template_precedence() {
        let p = parse(
            r#"{"slides":[
                {"type":"content-text","layout":{"template":"content-split"}},
                {"template":"section-divider"},
                {"layout":"auto-detected"}
            ]}"#,
        );
        assert_eq!(p.slides[0].template(), "content-split");
        assert_eq!(p.slides[1].template(), "section-divider");
        assert_eq!(p.slides[2].template(), DEFAULT_TEMPLATE);
        assert!(p.slides[2].layout.is_none());
    }

    #[test]
    fn test_unknown_element_is_kept() {
        let p = parse(r#"{"slides":[{"elements":[{"type":"hologram","text":"Beam"}]}]}"#);
        let el = &p.slides[0].elements[0];
        assert_eq!(el.kind.tag(), "hologram");
        assert_eq!(el.text_fragments(), vec!["Beam"]);
    }

    #[test]
    fn test_missing_type_defaults_to_body() {
        let p = parse(r#"{"slides":[{"elements":[{"text":"plain"}]}]}"#);
        assert!(matches!(p.slides[0].elements[0].kind, ElementKind::Body(_)));
    }

    #[test]
    fn test_style_and_position_are_lifted() {
        let p = parse(
            r#"{"slides":[{"elements":[
                {"type":"image","src":"a.png","position":"left","style":{"borderRadius":"8px"}}
            ]}]}"#,
        );
        let el = &p.slides[0].elements[0];
        assert!(el.is_image());
        assert_eq!(el.position, Some(Position::Left));
        assert_eq!(el.style.get("borderRadius").and_then(Value::as_str), Some("8px"));
    }

    #[test]
    fn test_keyed_elements() {
        let p = parse(
            r#"{"slides":[{"content":{
                "texts":[{"text":"Hello","type":"heading"},{"text":"World"}],
                "images":[{"src":"x.jpg"}]
            }}]}"#,
        );
        let kinds: Vec<&str> = p.slides[0].elements.iter().map(|e| e.kind.tag()).collect();
        assert_eq!(kinds, vec!["heading", "body", "image"]);
    }

    #[test]
    fn test_keyed_element_uses_key_as_type() {
        let p = parse(r#"{"slideStructures":[{"elements":{"body":{"text":"page text"}}}]}"#);
        assert_eq!(p.slides[0].elements[0].plain_text(), Some("page text"));
    }

    #[test]
    fn test_chart_requires_data() {
        let err = Presentation::from_json_str(
            r#"{"slides":[{"elements":[{"type":"chart","title":"t"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::JsonError(_)));
    }

    #[test]
    fn test_scalars_accept_numbers() {
        let p = parse(
            r#"{"slides":[{"elements":[
                {"type":"stat-block","items":[{"value":2020,"label":"Founded"}]},
                {"type":"chart","data":[{"label":"A","value":"40"}]}
            ]}]}"#,
        );
        match &p.slides[0].elements[0].kind {
            ElementKind::StatBlock(stats) => assert_eq!(stats.items[0].value.as_str(), "2020"),
            other => panic!("unexpected {:?}", other),
        }
        match &p.slides[0].elements[1].kind {
            ElementKind::Chart(chart) => assert_eq!(chart.data[0].value, 40.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_null_and_numeric_text_fields() {
        let p = parse(
            r#"{"slides":[{"title":2024,"elements":[
                {"type":"heading","text":null},
                {"type":"body","text":2024},
                {"type":"timeline","periods":[{"year":1998,"milestone":null,"events":["Founded",null,3]}]},
                {"type":"client-section","clients":[7,{"name":8,"highlight":true}]}
            ]}]}"#,
        );
        let slide = &p.slides[0];
        assert_eq!(slide.title.as_deref(), Some("2024"));

        match &slide.elements[0].kind {
            ElementKind::Heading(t) => assert_eq!(t.text, ""),
            other => panic!("unexpected {:?}", other),
        }
        match &slide.elements[1].kind {
            ElementKind::Body(t) => assert_eq!(t.text, "2024"),
            other => panic!("unexpected {:?}", other),
        }
        match &slide.elements[2].kind {
            ElementKind::Timeline(timeline) => {
                assert_eq!(timeline.periods[0].milestone, "");
                assert_eq!(timeline.periods[0].events, vec!["Founded", "3"]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &slide.elements[3].kind {
            ElementKind::ClientSection(section) => {
                assert_eq!(section.clients[0].name(), "7");
                assert_eq!(section.clients[1].name(), "8");
                assert!(section.clients[1].highlight());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_backgrounds() {
        let p = parse(
            r##"{"slides":[
                {"background":{"type":"gradient","colors":["#111","#222"]}},
                {"background":{"type":"image-overlay","image":"bg.jpg"}},
                {"background":{"color":"#FFFFFF"}},
                {}
            ]}"##,
        );
        assert_eq!(
            p.slides[0].background,
            Background::Gradient {
                stops: vec!["#111".into(), "#222".into()]
            }
        );
        match &p.slides[1].background {
            Background::Image { opacity, overlay, .. } => {
                assert_eq!(*opacity, 0.4);
                assert_eq!(overlay, "rgba(0, 0, 0, 0.7)");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            p.slides[2].background,
            Background::Solid {
                color: Some("#FFFFFF".into())
            }
        );
        assert_eq!(p.slides[3].background, Background::Default);
    }

    #[test]
    fn test_clients_accept_both_forms() {
        let p = parse(
            r#"{"slides":[{"elements":[
                {"type":"client-section","clients":["Acme",{"name":"Globex","highlight":true}]}
            ]}]}"#,
        );
        match &p.slides[0].elements[0].kind {
            ElementKind::ClientSection(section) => {
                assert_eq!(section.clients[0].name(), "Acme");
                assert!(!section.clients[0].highlight());
                assert!(section.clients[1].highlight());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_display_title_falls_back_to_heading() {
        let p = parse(r#"{"slides":[{"elements":[{"type":"heading","text":"Main"}]}]}"#);
        assert_eq!(p.slides[0].display_title(), Some("Main"));
    }
}

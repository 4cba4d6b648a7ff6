//! Design-token resolution.
//!
//! Resolves token references and literals into concrete colors, builds the
//! two renderer themes and turns per-element style maps into inline CSS.
//! Every function here is pure: the same tokens always resolve the same way.

use crate::error::{Error, Result};
use crate::types::{DesignTokens, StyleMap};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Resolve a token value or literal into a concrete color string.
///
/// A mapping resolves through `main`, then `dark`, then its first non-empty
/// string value, then `fallback`. A string is returned as-is unless empty.
pub fn resolve_color(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Object(map)) => {
            let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);
            map.get("main")
                .and_then(non_empty)
                .or_else(|| map.get("dark").and_then(non_empty))
                .or_else(|| map.values().find_map(non_empty))
                .unwrap_or_else(|| fallback.to_string())
        }
        _ => fallback.to_string(),
    }
}

impl DesignTokens {
    /// Look up a dotted path (`primary`, `background.dark`) under `colors`.
    pub fn color(&self, path: &str) -> Option<&Value> {
        let mut node = self.0.get("colors")?;
        for key in path.split('.') {
            node = node.get(key)?;
        }
        Some(node)
    }

    /// Resolve a dotted color path with a fallback.
    pub fn resolve(&self, path: &str, fallback: &str) -> String {
        resolve_color(self.color(path), fallback)
    }

    /// Top-level token group other than colors (`deckPalette`, `typography`, ...).
    pub fn group(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// An RGB color as written into the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `#RGB`, `#RRGGBB`, bare hex, `rgb()`, `rgba()` or a few names.
    pub fn parse(value: &str) -> Result<Self> {
        let s = value.trim().to_ascii_lowercase();
        let invalid = || Error::InvalidColor(value.to_string());

        match s.as_str() {
            "white" | "transparent" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            _ => {}
        }

        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = args
                .split(',')
                .take(3)
                .map(|c| c.trim().parse::<f64>().map(|v| v.clamp(0.0, 255.0).round() as u8))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| invalid())?;
            return match channels[..] {
                [r, g, b] => Ok(Self(r, g, b)),
                _ => Err(invalid()),
            };
        }

        let hex = s.strip_prefix('#').unwrap_or(&s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex[..6].to_string(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse, or use `fallback` when the literal is not a color.
    pub fn parse_or(value: &str, fallback: Rgb) -> Self {
        Self::parse(value).unwrap_or(fallback)
    }

    /// Uppercase `RRGGBB`, as used in DrawingML `srgbClr`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Whether light text reads better on this color.
    pub fn is_dark(&self) -> bool {
        let luma = 0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64;
        luma < 140.0
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Colors feeding the markup stylesheet's `:root` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTheme {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
    pub secondary: String,
    pub bg_dark: String,
    pub bg_darker: String,
    pub bg_card: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub text_muted: String,
}

impl Default for MarkupTheme {
    fn default() -> Self {
        Self {
            primary: "#FF6B35".to_string(),
            primary_light: "#FF8A5B".to_string(),
            primary_dark: "#E55A25".to_string(),
            secondary: "#FFB800".to_string(),
            bg_dark: "#1A1A1A".to_string(),
            bg_darker: "#0D0D0D".to_string(),
            bg_card: "#2A2A2A".to_string(),
            text_primary: "#FFFFFF".to_string(),
            text_secondary: "#CCCCCC".to_string(),
            text_muted: "#888888".to_string(),
        }
    }
}

impl MarkupTheme {
    pub fn from_tokens(tokens: &DesignTokens) -> Self {
        let d = Self::default();
        Self {
            primary: tokens.resolve("primary", &d.primary),
            primary_light: tokens.resolve("primary.light", &d.primary_light),
            primary_dark: tokens.resolve("primary.dark", &d.primary_dark),
            secondary: tokens.resolve("secondary", &d.secondary),
            bg_dark: tokens.resolve("background.dark", &d.bg_dark),
            bg_darker: tokens.resolve("background.darker", &d.bg_darker),
            bg_card: tokens.resolve("background.card", &d.bg_card),
            text_primary: tokens.resolve("text.primary", &d.text_primary),
            text_secondary: tokens.resolve("text.secondary", &d.text_secondary),
            text_muted: tokens.resolve("text.muted", &d.text_muted),
        }
    }
}

/// Fixed palette of the native deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPalette {
    pub primary: Rgb,
    pub primary_light: Rgb,
    pub primary_dark: Rgb,
    pub secondary: Rgb,
    pub secondary_light: Rgb,
    pub accent: Rgb,
    pub background: Rgb,
    pub background_dark: Rgb,
    pub background_alt: Rgb,
    pub text: Rgb,
    pub text_light: Rgb,
    pub text_muted: Rgb,
    pub text_on_dark: Rgb,
    pub highlight: Rgb,
    pub success: Rgb,
}

impl Default for DeckPalette {
    fn default() -> Self {
        Self {
            primary: Rgb(0x5B, 0x6C, 0xF9),
            primary_light: Rgb(0x7B, 0x8B, 0xFF),
            primary_dark: Rgb(0x4A, 0x5A, 0xE8),
            secondary: Rgb(0x0F, 0x17, 0x2A),
            secondary_light: Rgb(0x1E, 0x29, 0x3B),
            accent: Rgb(0x06, 0xB6, 0xD4),
            background: Rgb::WHITE,
            background_dark: Rgb(0x0F, 0x17, 0x2A),
            background_alt: Rgb(0xF8, 0xFA, 0xFC),
            text: Rgb(0x1E, 0x29, 0x3B),
            text_light: Rgb(0x64, 0x74, 0x8B),
            text_muted: Rgb(0x94, 0xA3, 0xB8),
            text_on_dark: Rgb::WHITE,
            highlight: Rgb(0xF5, 0x9E, 0x0B),
            success: Rgb(0x10, 0xB9, 0x81),
        }
    }
}

impl DeckPalette {
    /// Build the deck palette.
    ///
    /// Brand colors come from `colors.primary`, `colors.primary.light`,
    /// `colors.primary.dark` and `colors.accent`; any entry may then be
    /// overridden by name in a `deckPalette` token group. Literals that do not
    /// parse keep the default and log a warning.
    pub fn from_tokens(tokens: &DesignTokens) -> Self {
        let mut palette = Self::default();

        let brand = [
            ("primary", &mut palette.primary),
            ("primary.light", &mut palette.primary_light),
            ("primary.dark", &mut palette.primary_dark),
            ("accent", &mut palette.accent),
        ];
        for (path, slot) in brand {
            if let Some(value) = tokens.color(path) {
                override_color(slot, path, value);
            }
        }

        if let Some(Value::Object(overrides)) = tokens.group("deckPalette") {
            for (name, value) in overrides {
                match palette.slot_mut(name) {
                    Some(slot) => override_color(slot, name, value),
                    None => log::warn!("Unknown deck palette entry {:?}", name),
                }
            }
        }

        palette
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Rgb> {
        Some(match name {
            "primary" => &mut self.primary,
            "primaryLight" => &mut self.primary_light,
            "primaryDark" => &mut self.primary_dark,
            "secondary" => &mut self.secondary,
            "secondaryLight" => &mut self.secondary_light,
            "accent" => &mut self.accent,
            "background" => &mut self.background,
            "backgroundDark" => &mut self.background_dark,
            "backgroundAlt" => &mut self.background_alt,
            "text" => &mut self.text,
            "textLight" => &mut self.text_light,
            "textMuted" => &mut self.text_muted,
            "textOnDark" => &mut self.text_on_dark,
            "highlight" => &mut self.highlight,
            "success" => &mut self.success,
            _ => return None,
        })
    }
}

fn override_color(slot: &mut Rgb, name: &str, value: &Value) {
    let literal = resolve_color(Some(value), "");
    if literal.is_empty() {
        return;
    }
    match Rgb::parse(&literal) {
        Ok(rgb) => *slot = rgb,
        Err(e) => log::warn!("Ignoring palette entry {}: {}", name, e),
    }
}

/// Style keys that would fight the layout grid.
const POSITIONING_KEYS: [&str; 6] = ["position", "top", "left", "right", "bottom", "transform"];

/// Convert a camelCase property name to kebab-case.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_start_matches('-').to_string()
}

/// Render a style map as inline CSS (`key: value; ` per entry).
pub fn inline_css(style: &StyleMap) -> String {
    let mut css = String::new();
    for (key, value) in style {
        let property = kebab_case(key);
        if POSITIONING_KEYS.contains(&property.as_str()) {
            continue;
        }
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        css.push_str(&format!("{}: {}; ", property, value));
    }
    css
}

/// Font size forced onto elements of the contact-info template.
pub fn contact_font_clamp(tag: &str) -> Option<&'static str> {
    match tag {
        "heading" => Some("36px"),
        "badge" => Some("12px"),
        "logo" | "company-name" => Some("16px"),
        "body" | "tagline" => Some("12px"),
        _ => None,
    }
}

//! Icon name → glyph table shared by both renderers.

/// Glyph used for names missing from the table.
pub const DEFAULT_GLYPH: &str = "●";

/// Glyph used for network regions without an icon.
pub const REGION_GLYPH: &str = "🌐";

const ICONS: &[(&str, &str)] = &[
    ("ship", "🚢"),
    ("plane", "✈️"),
    ("truck", "🚚"),
    ("warehouse", "🏭"),
    ("globe", "🌍"),
    ("handshake", "🤝"),
    ("snowflake", "❄️"),
    ("boxes", "📦"),
    ("tag", "🏷️"),
    ("door", "🚪"),
    ("barcode", "📊"),
    ("calendar", "📅"),
    ("chart", "📈"),
    ("check", "✅"),
    ("users", "👥"),
    ("clipboard", "📋"),
    ("building", "🏢"),
    ("label", "🏷️"),
    ("search", "🔍"),
    ("box", "📦"),
    ("ruler", "📏"),
    ("weight", "⚖️"),
    ("route", "🛤️"),
    ("clock", "⏰"),
    ("phone", "📞"),
    ("fax", "📠"),
    ("email", "📧"),
    ("asia", "🌏"),
    ("europe", "🌍"),
    ("americas", "🌎"),
    // business model shapes
    ("circle", "●"),
    ("square", "■"),
    ("triangle", "▲"),
    ("diamond", "◆"),
];

/// Resolve an icon name to its glyph.
pub fn glyph(name: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(DEFAULT_GLYPH)
}

/// Resolve an optional icon name; empty names use `default`.
pub fn glyph_or<'a>(name: &str, default: &'a str) -> &'a str {
    if name.is_empty() {
        default
    } else {
        glyph(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_icons() {
        assert_eq!(glyph("ship"), "🚢");
        assert_eq!(glyph("diamond"), "◆");
    }

    #[test]
    fn test_unknown_icon_defaults_to_circle() {
        assert_eq!(glyph("unicorn"), DEFAULT_GLYPH);
        assert_eq!(glyph(""), DEFAULT_GLYPH);
    }

    #[test]
    fn test_glyph_or() {
        assert_eq!(glyph_or("", REGION_GLYPH), REGION_GLYPH);
        assert_eq!(glyph_or("asia", REGION_GLYPH), "🌏");
    }
}

//! Hand-composed layouts, authored on the 13.333 x 7.5 inch canvas.
//!
//! Each function returns `Ok(None)` when the slide lacks the content its
//! layout is built around. Declared colors that do not parse are errors.

use super::{LayoutContext, SlideContent};
use crate::canvas::{Rect, SlideCanvas, TextStyle, AUTHORED_WIDTH_IN};
use deck_core::icons::{self, REGION_GLYPH};
use deck_core::types::{CardItem, ContactItem, ElementKind, FeatureItem, Period};
use deck_core::{DeckPalette, Result, Rgb};

type Composed = Result<Option<SlideCanvas>>;

const BADGE_FILL: Rgb = Rgb(0x3D, 0x4A, 0x66);
const DIVIDER: Rgb = Rgb(0xE2, 0xE8, 0xF0);
const ICON_TINT: Rgb = Rgb(0xEE, 0xF0, 0xFE);
const STAT_FILL: Rgb = Rgb(0x0F, 0x17, 0x2A);
const REGION_FILL: Rgb = Rgb(0x1E, 0x29, 0x3B);

const OVERLAY_OPACITY: u32 = 75;

/// Parse an optional declared color.
fn color_or(value: Option<&str>, fallback: Rgb) -> Result<Rgb> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Rgb::parse(v),
        None => Ok(fallback),
    }
}

/// Left edge that centers `count` items of `width` separated by `gap`.
fn centered_start(count: usize, width: f64, gap: f64) -> f64 {
    let total = count as f64 * width + count.saturating_sub(1) as f64 * gap;
    (AUTHORED_WIDTH_IN - total) / 2.0
}

fn card_items<'a>(content: &SlideContent<'a>) -> Option<&'a [CardItem]> {
    content.find(|k| match k {
        ElementKind::Cards(_, group) if !group.items.is_empty() => Some(group.items.as_slice()),
        _ => None,
    })
}

fn feature_items<'a>(content: &SlideContent<'a>) -> Option<&'a [FeatureItem]> {
    content.find(|k| match k {
        ElementKind::FeatureList(list) | ElementKind::FeatureGrid(list) if !list.items.is_empty() => {
            Some(list.items.as_slice())
        }
        _ => None,
    })
}

pub fn cover(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(heading) = content.text("heading") else {
        return Ok(None);
    };
    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.secondary_light);

    if let Some(logo) = content.text("logo") {
        canvas.text(
            Rect::new(0.8, 0.5, 3.0, 0.6),
            logo,
            TextStyle::new(20.0, Rgb::WHITE).bold(),
        );
    }
    if let Some(badge) = content.text("badge") {
        canvas.rect(Rect::new(4.5, 2.2, 4.3, 0.5), BADGE_FILL, 50.0);
        canvas.text(
            Rect::new(4.5, 2.25, 4.3, 0.5),
            badge,
            TextStyle::new(14.0, Rgb::WHITE).center(),
        );
    }
    canvas.text(
        Rect::new(0.5, 2.9, 12.3, 1.0),
        heading,
        TextStyle::new(56.0, Rgb::WHITE).bold().center(),
    );
    if let Some(name) = content.text("company-name").or_else(|| content.text("subheading")) {
        canvas.text(
            Rect::new(0.5, 3.9, 12.3, 0.7),
            name,
            TextStyle::new(44.0, p.primary_light).bold().center(),
        );
    }
    if let Some(description) = content.text("body") {
        canvas.text(
            Rect::new(2.5, 4.8, 8.3, 1.0),
            description,
            TextStyle::new(18.0, p.text_muted).center(),
        );
    }

    for (src, x) in content.images().into_iter().zip([1.0, 6.8]) {
        canvas.image(ctx.assets, Rect::new(x, 5.9, 5.5, 1.4), src);
    }

    Ok(Some(canvas))
}

pub fn company_profile(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let cards = card_items(content);
    let stats = content.find(|k| match k {
        ElementKind::StatBlock(block) if !block.items.is_empty() => Some(block.items.as_slice()),
        _ => None,
    });
    let Some(title) = content.title() else {
        return Ok(None);
    };
    if cards.is_none() && stats.is_none() {
        return Ok(None);
    }

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.5, 3.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    canvas.text(
        Rect::new(0.8, 0.95, 10.0, 0.7),
        title,
        TextStyle::new(40.0, p.text).bold(),
    );
    if let Some(subtitle) = content.text("subheading").or_else(|| content.text("body")) {
        canvas.text(
            Rect::new(0.8, 1.65, 10.0, 0.5),
            subtitle,
            TextStyle::new(18.0, p.text_light),
        );
    }

    for (i, item) in cards.unwrap_or_default().iter().take(4).enumerate() {
        let x = [0.8, 6.6][i % 2];
        let y = [2.3, 3.8][i / 2];
        let accent = color_or(item.color.as_deref(), p.primary)?;
        let label = if item.icon.is_empty() {
            item.title().to_string()
        } else {
            format!("{} {}", icons::glyph(&item.icon), item.title())
        };

        canvas.rect(Rect::new(x, y, 5.5, 1.3), p.background_alt, 12.0);
        canvas.text(
            Rect::new(x + 0.2, y + 0.2, 5.0, 0.35),
            &label,
            TextStyle::new(13.0, accent).bold(),
        );
        canvas.text(
            Rect::new(x + 0.2, y + 0.55, 5.1, 0.7),
            item.value(),
            TextStyle::new(15.0, p.text),
        );
    }

    if let Some(stats) = stats {
        canvas.rect(Rect::new(0.8, 5.6, 11.7, 0.02), DIVIDER, 0.0);
        for (i, stat) in stats.iter().take(4).enumerate() {
            let x = 1.5 + i as f64 * 2.5;
            let value_color = color_or(stat.value_color.as_deref(), p.primary)?;
            canvas.text(
                Rect::new(x, 5.8, 2.5, 0.6),
                &format!("{}{}", stat.value, stat.unit),
                TextStyle::new(32.0, value_color).bold().center(),
            );
            canvas.text(
                Rect::new(x, 6.35, 2.5, 0.4),
                &stat.label,
                TextStyle::new(14.0, p.text_light).center(),
            );
        }
    }

    Ok(Some(canvas))
}

pub fn history_timeline(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(periods) = content.find(|k| match k {
        ElementKind::Timeline(timeline) if !timeline.periods.is_empty() => Some(timeline.periods.as_slice()),
        _ => None,
    }) else {
        return Ok(None);
    };

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.secondary);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.5, 3.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.8, 0.95, 10.0, 0.7),
            title,
            TextStyle::new(40.0, Rgb::WHITE).bold(),
        );
    }
    if let Some(subtitle) = content.text("subheading").or_else(|| content.text("body")) {
        canvas.text(
            Rect::new(0.8, 1.6, 10.0, 0.5),
            subtitle,
            TextStyle::new(18.0, p.text_muted),
        );
    }

    let shown: &[Period] = &periods[..periods.len().min(6)];
    let item_w = 2.0;
    let start = centered_start(shown.len(), item_w, 0.0);
    let top = 2.8;

    for (i, period) in shown.iter().enumerate() {
        let x = start + i as f64 * item_w;
        let dot = color_or(period.bar_color.as_deref(), p.primary)?;
        let year_color = if period.highlight { p.highlight } else { p.primary };

        canvas.rect(Rect::new(x + 0.85, top, 0.15, 0.15), dot, 50.0);
        if i + 1 < shown.len() {
            canvas.rect(Rect::new(x + 1.0, top + 0.06, 1.85, 0.03), BADGE_FILL, 0.0);
        }
        canvas.text(
            Rect::new(x, top + 0.3, item_w, 0.5),
            period.label().as_str(),
            TextStyle::new(30.0, year_color).bold().center(),
        );
        if !period.milestone.is_empty() {
            canvas.text(
                Rect::new(x, top + 0.85, item_w, 0.4),
                &period.milestone,
                TextStyle::new(16.0, Rgb::WHITE).bold().center(),
            );
        }
        let events = if period.events.is_empty() {
            period.description.clone()
        } else {
            period.events.join("\n")
        };
        if !events.is_empty() {
            canvas.text(
                Rect::new(x, top + 1.35, item_w, 1.5),
                &events,
                TextStyle::new(13.0, p.text_muted).center(),
            );
        }
    }

    Ok(Some(canvas))
}

/// Icon, title, description and icon color of one value card.
struct ValueCard<'a> {
    icon: &'a str,
    title: &'a str,
    description: &'a str,
    color: Option<&'a str>,
}

pub fn value_cards(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let cards: Vec<ValueCard<'_>> = match card_items(content) {
        Some(items) => items
            .iter()
            .map(|item| ValueCard {
                icon: icons::glyph(&item.icon),
                title: item.title(),
                description: item.value(),
                color: item.color.as_deref(),
            })
            .collect(),
        None => content
            .find(|k| match k {
                ElementKind::ModelCards(cards) if !cards.items.is_empty() => Some(cards.items.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
            .iter()
            .map(|item| ValueCard {
                icon: icons::glyph(&item.icon),
                title: &item.title,
                description: &item.description,
                color: item.icon_color.as_deref(),
            })
            .collect(),
    };
    if cards.is_empty() {
        return Ok(None);
    }

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background_alt);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.5, 0.5, 12.3, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold().center(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.5, 0.95, 12.3, 1.2),
            title,
            TextStyle::new(40.0, p.text).bold().center(),
        );
    }
    if let Some(description) = content.text("body").or_else(|| content.text("subheading")) {
        canvas.text(
            Rect::new(2.0, 2.3, 9.3, 0.7),
            description,
            TextStyle::new(17.0, p.text_light).center(),
        );
    }

    let shown = &cards[..cards.len().min(3)];
    let (w, h, gap, top) = (3.8, 3.5, 0.4, 3.3);
    let start = centered_start(shown.len(), w, gap);

    for (i, card) in shown.iter().enumerate() {
        let x = start + i as f64 * (w + gap);
        let icon_color = color_or(card.color, p.primary)?;

        canvas.rect(Rect::new(x, top, w, h), Rgb::WHITE, 16.0);
        canvas.rect(Rect::new(x + 1.3, top + 0.4, 1.2, 1.2), ICON_TINT, 20.0);
        canvas.text(
            Rect::new(x + 1.3, top + 0.55, 1.2, 1.0),
            card.icon,
            TextStyle::new(40.0, icon_color).center(),
        );
        canvas.text(
            Rect::new(x + 0.2, top + 1.8, w - 0.4, 0.5),
            card.title,
            TextStyle::new(22.0, p.text).bold().center(),
        );
        canvas.text(
            Rect::new(x + 0.2, top + 2.4, w - 0.4, 0.9),
            card.description,
            TextStyle::new(15.0, p.text_light).center(),
        );
    }

    Ok(Some(canvas))
}

/// Content of one bento tile.
struct BentoItem<'a> {
    icon: &'a str,
    title: &'a str,
    subtitle: &'a str,
    description: &'a str,
    image: Option<&'a str>,
    color: Option<&'a str>,
}

/// Geometry of one bento tile.
struct BentoSlot {
    card: Rect,
    text_x: f64,
    text_w: f64,
    icon_y: f64,
    icon_size: f64,
    title_y: f64,
    title_size: f64,
    subtitle_y: f64,
    subtitle_size: f64,
    description_y: Option<f64>,
    tint: fn(&DeckPalette) -> Rgb,
}

const BENTO: [BentoSlot; 4] = [
    BentoSlot {
        card: Rect::new(0.8, 1.7, 4.2, 5.4),
        text_x: 1.0,
        text_w: 3.8,
        icon_y: 5.4,
        icon_size: 32.0,
        title_y: 5.95,
        title_size: 26.0,
        subtitle_y: 6.45,
        subtitle_size: 12.0,
        description_y: Some(6.75),
        tint: |p| p.primary,
    },
    BentoSlot {
        card: Rect::new(5.2, 1.7, 3.8, 2.5),
        text_x: 5.4,
        text_w: 3.4,
        icon_y: 2.9,
        icon_size: 28.0,
        title_y: 3.3,
        title_size: 20.0,
        subtitle_y: 3.7,
        subtitle_size: 11.0,
        description_y: None,
        tint: |p| p.accent,
    },
    BentoSlot {
        card: Rect::new(9.2, 1.7, 3.8, 2.5),
        text_x: 9.4,
        text_w: 3.4,
        icon_y: 2.9,
        icon_size: 28.0,
        title_y: 3.3,
        title_size: 20.0,
        subtitle_y: 3.7,
        subtitle_size: 11.0,
        description_y: None,
        tint: |p| p.success,
    },
    BentoSlot {
        card: Rect::new(5.2, 4.4, 7.8, 2.7),
        text_x: 5.4,
        text_w: 7.4,
        icon_y: 5.7,
        icon_size: 28.0,
        title_y: 6.1,
        title_size: 20.0,
        subtitle_y: 6.5,
        subtitle_size: 11.0,
        description_y: Some(6.75),
        tint: |p| p.highlight,
    },
];

pub fn services_bento(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let items: Vec<BentoItem<'_>> = match card_items(content) {
        Some(cards) => cards
            .iter()
            .map(|item| BentoItem {
                icon: icons::glyph(&item.icon),
                title: item.title(),
                subtitle: &item.subtitle,
                description: item.value(),
                image: item.image.as_deref(),
                color: item.color.as_deref(),
            })
            .collect(),
        None => feature_items(content)
            .unwrap_or_default()
            .iter()
            .map(|item| BentoItem {
                icon: icons::glyph(&item.icon),
                title: &item.title,
                subtitle: "",
                description: &item.description,
                image: None,
                color: None,
            })
            .collect(),
    };
    if items.is_empty() {
        return Ok(None);
    }

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.4, 3.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.8, 0.9, 10.0, 0.6),
            title,
            TextStyle::new(36.0, p.text).bold(),
        );
    }

    for (item, slot) in items.iter().zip(BENTO.iter()) {
        let tint = color_or(item.color, (slot.tint)(p))?;
        let has_picture = item
            .image
            .map(|src| canvas.image(ctx.assets, slot.card, src))
            .unwrap_or(false);
        if has_picture {
            canvas.overlay(slot.card, tint, 16.0, OVERLAY_OPACITY);
        } else {
            canvas.rect(slot.card, tint, 16.0);
        }

        let white = TextStyle::new(slot.icon_size, Rgb::WHITE);
        canvas.text(Rect::new(slot.text_x, slot.icon_y, slot.text_w, 0.5), item.icon, white);
        canvas.text(
            Rect::new(slot.text_x, slot.title_y, slot.text_w, 0.5),
            item.title,
            TextStyle::new(slot.title_size, Rgb::WHITE).bold(),
        );
        if !item.subtitle.is_empty() {
            canvas.text(
                Rect::new(slot.text_x, slot.subtitle_y, slot.text_w, 0.3),
                item.subtitle,
                TextStyle::new(slot.subtitle_size, Rgb::WHITE),
            );
        }
        if let Some(y) = slot.description_y.filter(|_| !item.description.is_empty()) {
            canvas.text(
                Rect::new(slot.text_x, y, slot.text_w, 0.3),
                item.description,
                TextStyle::new(11.0, Rgb::WHITE),
            );
        }
    }

    Ok(Some(canvas))
}

pub fn support_checklist(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let checks: Vec<(&str, &str)> = match feature_items(content) {
        Some(items) => items
            .iter()
            .map(|i| (i.title.as_str(), i.description.as_str()))
            .collect(),
        None => card_items(content)
            .unwrap_or_default()
            .iter()
            .map(|i| (i.title(), i.value()))
            .collect(),
    };
    if checks.is_empty() {
        return Ok(None);
    }

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background_alt);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.4, 5.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.8, 0.95, 6.0, 1.0),
            title,
            TextStyle::new(36.0, p.text).bold(),
        );
    }
    if let Some(description) = content.text("body").or_else(|| content.text("subheading")) {
        canvas.text(
            Rect::new(0.8, 2.1, 5.5, 0.6),
            description,
            TextStyle::new(16.0, p.text_light),
        );
    }

    for (i, (title, description)) in checks.iter().take(4).enumerate() {
        let y = 3.0 + i as f64 * 0.95;
        canvas.rect(Rect::new(0.8, y, 0.45, 0.45), ICON_TINT, 50.0);
        canvas.text(
            Rect::new(0.8, y + 0.05, 0.45, 0.35),
            "✓",
            TextStyle::new(16.0, p.primary).bold().center(),
        );
        canvas.text(
            Rect::new(1.4, y, 4.5, 0.35),
            title,
            TextStyle::new(18.0, p.text).bold(),
        );
        if !description.is_empty() {
            canvas.text(
                Rect::new(1.4, y + 0.35, 4.5, 0.35),
                description,
                TextStyle::new(16.0, p.text_light),
            );
        }
    }

    if let Some(src) = content.images().first() {
        canvas.image(ctx.assets, Rect::new(7.0, 1.2, 5.8, 5.8), src);
    }

    Ok(Some(canvas))
}

pub fn network_map(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(regions) = content.find(|k| match k {
        ElementKind::NetworkRegions(regions) if !regions.items.is_empty() => Some(regions.items.as_slice()),
        _ => None,
    }) else {
        return Ok(None);
    };

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.secondary);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.5, 0.4, 12.3, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold().center(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.5, 0.9, 12.3, 0.6),
            title,
            TextStyle::new(38.0, Rgb::WHITE).bold().center(),
        );
    }
    if let Some(src) = content.images().first() {
        canvas.image(ctx.assets, Rect::new(1.5, 1.7, 10.3, 3.5), src);
    }

    let stat = content.find(|k| match k {
        ElementKind::StatBlock(block) => block.items.first(),
        _ => None,
    });
    if let Some(stat) = stat {
        let value_color = color_or(stat.value_color.as_deref(), p.primary)?;
        canvas.rect(Rect::new(5.2, 2.8, 3.0, 1.3), STAT_FILL, 16.0);
        canvas.text(
            Rect::new(5.2, 2.95, 3.0, 0.7),
            &format!("{}{}", stat.value, stat.unit),
            TextStyle::new(40.0, value_color).bold().center(),
        );
        canvas.text(
            Rect::new(5.2, 3.65, 3.0, 0.4),
            &stat.label,
            TextStyle::new(14.0, p.text_muted).center(),
        );
    }

    let shown = &regions[..regions.len().min(5)];
    let (w, gap, top) = (2.2, 0.2, 5.6);
    let start = centered_start(shown.len(), w, gap);
    for (i, region) in shown.iter().enumerate() {
        let x = start + i as f64 * (w + gap);
        canvas.rect(Rect::new(x, top, w, 1.0), REGION_FILL, 8.0);
        canvas.text(
            Rect::new(x, top + 0.15, w, 0.35),
            &format!("{} {}", icons::glyph_or(&region.icon, REGION_GLYPH), region.region),
            TextStyle::new(14.0, Rgb::WHITE).bold().center(),
        );
        if !region.countries.is_empty() {
            canvas.text(
                Rect::new(x, top + 0.45, w, 0.4),
                &region.countries.len().to_string(),
                TextStyle::new(20.0, p.primary).bold().center(),
            );
        }
    }

    Ok(Some(canvas))
}

pub fn partner_grid(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(clients) = content.find(|k| match k {
        ElementKind::ClientSection(section) if !section.clients.is_empty() => Some(section.clients.as_slice()),
        ElementKind::ClientLogos(logos) if !logos.clients.is_empty() => Some(logos.clients.as_slice()),
        _ => None,
    }) else {
        return Ok(None);
    };

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.4, 3.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.8, 0.85, 10.0, 1.0),
            title,
            TextStyle::new(36.0, p.text).bold(),
        );
    }
    if let Some(description) = content.text("body").or_else(|| content.text("subheading")) {
        canvas.text(
            Rect::new(0.8, 1.95, 10.0, 0.5),
            description,
            TextStyle::new(16.0, p.text_light),
        );
    }

    let (cell_w, cell_h) = (2.3, 0.95);
    for (i, client) in clients.iter().take(20).enumerate() {
        let x = 0.8 + (i % 5) as f64 * cell_w;
        let y = 2.7 + (i / 5) as f64 * cell_h;
        let (fill, ink) = if client.highlight() {
            (p.primary, Rgb::WHITE)
        } else {
            (p.background_alt, p.text)
        };
        canvas.rect(Rect::new(x, y, cell_w - 0.15, cell_h - 0.15), fill, 8.0);
        canvas.text(
            Rect::new(x, y + 0.25, cell_w - 0.15, 0.5),
            client.name(),
            TextStyle::new(13.0, ink).bold().center(),
        );
    }

    Ok(Some(canvas))
}

pub fn portfolio_gallery(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let mut entries: Vec<(&str, &str)> = content
        .find(|k| match k {
            ElementKind::ImageGrid(grid) if !grid.images.is_empty() => Some(&grid.images),
            _ => None,
        })
        .map(|images| {
            images
                .iter()
                .map(|i| (i.src.as_str(), if i.caption.is_empty() { i.alt.as_str() } else { i.caption.as_str() }))
                .collect()
        })
        .unwrap_or_default();
    if entries.is_empty() {
        entries = card_items(content)
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item.image.as_deref().map(|src| (src, item.title())))
            .collect();
    }
    if entries.is_empty() {
        return Ok(None);
    }

    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.background_alt);

    if let Some(label) = content.label() {
        canvas.text(
            Rect::new(0.8, 0.4, 5.0, 0.4),
            label,
            TextStyle::new(14.0, p.primary).bold(),
        );
    }
    if let Some(title) = content.title() {
        canvas.text(
            Rect::new(0.8, 0.9, 10.0, 0.6),
            title,
            TextStyle::new(36.0, p.text).bold(),
        );
    }
    if let Some(subtitle) = content.text("subheading").or_else(|| content.text("body")) {
        canvas.text(
            Rect::new(0.8, 1.55, 10.0, 0.5),
            subtitle,
            TextStyle::new(16.0, p.text_light),
        );
    }

    let (w, h, gap) = (3.9, 2.5, 0.3);
    for (i, (src, caption)) in entries.iter().take(6).enumerate() {
        let x = 0.8 + (i % 3) as f64 * (w + gap);
        let y = 2.3 + (i / 3) as f64 * (h + gap);
        let photo = Rect::new(x, y, w, 1.9);

        canvas.rect(Rect::new(x, y, w, h), Rgb::WHITE, 16.0);
        if !canvas.image(ctx.assets, photo, src) {
            canvas.rect(photo, DIVIDER, 16.0);
        }
        canvas.rect(Rect::new(x, y + 1.9, w, 0.6), Rgb::WHITE, 0.0);
        if !caption.is_empty() {
            canvas.text(
                Rect::new(x + 0.2, y + 2.05, 3.5, 0.35),
                caption,
                TextStyle::new(12.0, p.primary).bold(),
            );
        }
    }

    Ok(Some(canvas))
}

pub fn statement(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(quote) = content.text("quote").or_else(|| content.text("heading")) else {
        return Ok(None);
    };

    let mut canvas = SlideCanvas::new(ctx.settings, ctx.palette.primary);
    canvas.text(
        Rect::new(1.0, 2.5, 11.3, 1.5),
        quote,
        TextStyle::new(38.0, Rgb::WHITE).bold().center(),
    );

    let body = content.texts("body");
    if !body.is_empty() {
        canvas.text(
            Rect::new(1.5, 4.3, 10.3, 2.0),
            &body.join("\n"),
            TextStyle::new(18.0, Rgb::WHITE).center(),
        );
    }

    Ok(Some(canvas))
}

fn contact_line(items: &[ContactItem]) -> String {
    items
        .iter()
        .filter(|item| !item.value.is_empty())
        .map(|item| {
            let glyph = match item.icon.as_deref() {
                Some(icon) => icons::glyph(icon),
                None => icons::glyph(&item.kind),
            };
            format!("{} {}", glyph, item.value)
        })
        .collect::<Vec<_>>()
        .join("    ")
}

pub fn closing(content: &SlideContent<'_>, ctx: &mut LayoutContext<'_>) -> Composed {
    let Some(heading) = content.text("heading") else {
        return Ok(None);
    };
    let p = ctx.palette;
    let mut canvas = SlideCanvas::new(ctx.settings, p.secondary);

    canvas.text(
        Rect::new(0.5, 2.2, 12.3, 1.0),
        heading,
        TextStyle::new(56.0, Rgb::WHITE).bold().center(),
    );
    if let Some(tagline) = content.text("subheading").or_else(|| content.text("body")) {
        canvas.text(
            Rect::new(0.5, 3.2, 12.3, 0.5),
            tagline,
            TextStyle::new(18.0, p.text_muted).center(),
        );
    }

    if let Some(company) = content.text("company-name").or_else(|| content.text("logo")) {
        let initial: String = company.chars().take(1).flat_map(char::to_uppercase).collect();
        canvas.rect(Rect::new(6.0, 4.0, 1.3, 1.3), p.primary, 50.0);
        canvas.text(
            Rect::new(6.0, 4.3, 1.3, 0.7),
            &initial,
            TextStyle::new(32.0, Rgb::WHITE).bold().center(),
        );
        canvas.text(
            Rect::new(0.5, 5.5, 12.3, 0.5),
            company,
            TextStyle::new(22.0, Rgb::WHITE).bold().center(),
        );
    }

    let contacts = content
        .find(|k| match k {
            ElementKind::ContactInfo(info) if !info.items.is_empty() => Some(info.items.as_slice()),
            ElementKind::ContactSection(section) if !section.items.is_empty() => Some(section.items.as_slice()),
            _ => None,
        })
        .map(contact_line)
        .filter(|line| !line.is_empty());
    if let Some(line) = contacts {
        canvas.text(
            Rect::new(0.5, 6.2, 12.3, 0.4),
            &line,
            TextStyle::new(14.0, p.text_muted).center(),
        );
    }

    if let Some(copyright) = content.text("label") {
        canvas.text(
            Rect::new(0.5, 6.8, 12.3, 0.4),
            copyright,
            TextStyle::new(12.0, p.text_light).center(),
        );
    }

    Ok(Some(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasSettings;
    use crate::shapes::Shape;
    use deck_core::types::Slide;
    use deck_core::{Error, Presentation, RenderConfig};
    use std::collections::HashMap;

    fn slide(json: &str) -> Slide {
        let doc = Presentation::from_json_str(&format!(r#"{{"slides":[{}]}}"#, json)).unwrap();
        doc.slides.into_iter().next().unwrap()
    }

    fn run(layout: fn(&SlideContent<'_>, &mut LayoutContext<'_>) -> Composed, json: &str) -> Composed {
        let slide = slide(json);
        let settings = CanvasSettings::from_config(&RenderConfig::default());
        let palette = DeckPalette::default();
        let mut assets: HashMap<String, Vec<u8>> = HashMap::new();
        let mut ctx = LayoutContext {
            settings: &settings,
            palette: &palette,
            assets: &mut assets,
        };
        layout(&SlideContent::new(&slide), &mut ctx)
    }

    fn texts(canvas: &SlideCanvas) -> Vec<String> {
        canvas
            .shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::TextBox { body, .. } => Some(body.paragraphs.join("\n")),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_cover_requires_heading() {
        assert!(run(cover, r#"{"elements":[{"type":"body","text":"x"}]}"#).unwrap().is_none());

        let canvas = run(
            cover,
            r#"{"elements":[{"type":"badge","text":"Since 1999"},{"type":"heading","text":"Logistics"}]}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(canvas.background(), DeckPalette::default().secondary_light);
        assert_eq!(texts(&canvas), vec!["Since 1999", "Logistics"]);
    }

    #[test]
    fn test_company_profile_cards_and_stats() {
        let canvas = run(
            company_profile,
            r#"{"elements":[
                {"type":"heading","text":"About"},
                {"type":"info-cards","items":[{"title":"Founded","value":"1999"},{"label":"Staff","description":"120"}]},
                {"type":"stat-block","items":[{"value":30,"unit":"+","label":"Countries"}]}
            ]}"#,
        )
        .unwrap()
        .unwrap();
        let texts = texts(&canvas);
        assert!(texts.contains(&"Founded".to_string()));
        assert!(texts.contains(&"Staff".to_string()));
        assert!(texts.contains(&"120".to_string()));
        assert!(texts.contains(&"30+".to_string()));
    }

    #[test]
    fn test_timeline_bad_color_is_an_error() {
        let result = run(
            history_timeline,
            r#"{"elements":[{"type":"timeline","periods":[{"year":2001,"barColor":"not-a-color"}]}]}"#,
        );
        assert!(matches!(result, Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_timeline_events() {
        let canvas = run(
            history_timeline,
            r#"{"elements":[{"type":"timeline","periods":[
                {"year":2001,"milestone":"Founded","events":["Seoul office","First ship"]},
                {"year":2010,"milestone":"Expansion"}
            ]}]}"#,
        )
        .unwrap()
        .unwrap();
        let texts = texts(&canvas);
        assert_eq!(texts[0], "2001");
        assert!(texts.contains(&"Seoul office\nFirst ship".to_string()));

        let connectors = canvas
            .shapes()
            .iter()
            .filter(|s| matches!(s, Shape::Rectangle { corner: None, .. }))
            .count();
        assert_eq!(connectors, 1);
    }

    #[test]
    fn test_value_cards_from_model_cards() {
        let canvas = run(
            value_cards,
            r#"{"elements":[{"type":"model-cards","items":[{"icon":"diamond","title":"Trust","description":"Always"}]}]}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(texts(&canvas), vec!["◆", "Trust", "Always"]);
    }

    #[test]
    fn test_bento_without_images_uses_solid_tiles() {
        let canvas = run(
            services_bento,
            r#"{"elements":[{"type":"feature-list","items":[{"title":"Sea"},{"title":"Air"}]}]}"#,
        )
        .unwrap()
        .unwrap();
        let fills: Vec<_> = canvas
            .shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::Rectangle { fill: Some(fill), .. } => Some(*fill),
                _ => None,
            })
            .collect();
        let palette = DeckPalette::default();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].color, palette.primary);
        assert_eq!(fills[1].color, palette.accent);
        assert!(fills.iter().all(|f| f.alpha.is_none()));
    }

    #[test]
    fn test_partner_grid_highlight() {
        let canvas = run(
            partner_grid,
            r#"{"elements":[{"type":"client-section","clients":["A",{"name":"B","highlight":true}]}]}"#,
        )
        .unwrap()
        .unwrap();
        let fills: Vec<Rgb> = canvas
            .shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::Rectangle { fill: Some(fill), .. } => Some(fill.color),
                _ => None,
            })
            .collect();
        let palette = DeckPalette::default();
        assert_eq!(fills, vec![palette.background_alt, palette.primary]);
    }

    #[test]
    fn test_portfolio_missing_image_gets_placeholder() {
        let canvas = run(
            portfolio_gallery,
            r#"{"elements":[{"type":"image-grid","images":[{"src":"missing.jpg","caption":"Port"}]}]}"#,
        )
        .unwrap()
        .unwrap();
        assert!(canvas.media().is_empty());
        assert!(canvas.shapes().iter().any(|s| matches!(
            s,
            Shape::Rectangle { fill: Some(fill), .. } if fill.color == DIVIDER
        )));
        assert_eq!(texts(&canvas), vec!["Port"]);
    }

    #[test]
    fn test_statement_and_closing() {
        let canvas = run(
            statement,
            r#"{"elements":[{"type":"quote","text":"Move fast"},{"type":"body","text":"a"},{"type":"body","text":"b"}]}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(texts(&canvas), vec!["Move fast", "a\nb"]);

        let canvas = run(
            closing,
            r#"{"elements":[
                {"type":"heading","text":"Thank You"},
                {"type":"company-name","text":"acme"},
                {"type":"contact-info","items":[{"type":"email","value":"a@b.com"},{"type":"phone","value":"010"}]}
            ]}"#,
        )
        .unwrap()
        .unwrap();
        let texts = texts(&canvas);
        assert!(texts.contains(&"A".to_string()));
        assert!(texts.contains(&"📧 a@b.com    📞 010".to_string()));
    }

    #[test]
    fn test_network_regions() {
        let canvas = run(
            network_map,
            r#"{"elements":[{"type":"network-regions","items":[{"region":"Asia","countries":["KR","JP"]}]}]}"#,
        )
        .unwrap()
        .unwrap();
        let texts = texts(&canvas);
        assert_eq!(texts, vec!["🌐 Asia", "2"]);
    }

    #[test]
    fn test_centered_start() {
        assert!((centered_start(1, 2.0, 0.0) - 5.6665).abs() < 1e-9);
        assert!((centered_start(3, 3.8, 0.4) - 0.5665).abs() < 1e-9);
    }
}

//! Markup fragment per element variant.

use deck_core::icons::{self, DEFAULT_GLYPH, REGION_GLYPH};
use deck_core::style::{contact_font_clamp, inline_css};
use deck_core::types::*;
use deck_core::MarkupTheme;
use serde_json::Value;

/// Upper bound on generated icon-grid cells.
const MAX_ICON_GRID_ITEMS: usize = 100;

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Per-slide rendering context.
pub struct ElementContext<'a> {
    pub theme: &'a MarkupTheme,
    /// Clamp font sizes of text elements (contact-info template).
    pub clamp_fonts: bool,
}

impl ElementContext<'_> {
    fn style_attr(&self, el: &Element) -> String {
        if self.clamp_fonts {
            if let Some(size) = contact_font_clamp(el.kind.tag()) {
                let mut style = el.style.clone();
                style.insert("fontSize".to_string(), Value::String(size.to_string()));
                return escape(&inline_css(&style));
            }
        }
        escape(&inline_css(&el.style))
    }

    fn color_or_primary(&self, color: &Option<String>) -> String {
        escape(color.as_deref().unwrap_or(&self.theme.primary))
    }
}

/// Append the fragment for one element.
pub fn render_element(out: &mut String, el: &Element, ctx: &ElementContext<'_>) {
    let style = ctx.style_attr(el);
    let text_div = |out: &mut String, class: &str, extra: &str, text: &str| {
        out.push_str(&format!(
            r#"<div class="{}" style="{}{}">{}</div>"#,
            class,
            extra,
            style,
            escape(text)
        ));
    };

    match &el.kind {
        ElementKind::Heading(t) => text_div(out, "element-heading", "", &t.text),
        ElementKind::Subheading(t) => text_div(out, "element-subheading", "", &t.text),
        ElementKind::Badge(t) => text_div(out, "element-badge", "", &t.text),
        ElementKind::Logo(t) => text_div(out, "element-logo", "", &t.text),
        ElementKind::Body(t) => text_div(out, "element-body", "", &t.text),
        ElementKind::Quote(t) => text_div(out, "element-quote", "", &t.text),
        ElementKind::CompanyName(t) => text_div(out, "element-logo", "font-size: 28px; ", &t.text),
        ElementKind::Label(t) => text_div(out, "element-body", "font-style: italic; ", &t.text),
        ElementKind::LogoPlaceholder(t) => {
            let extra = format!(
                "margin-top: 32px; font-size: 14px; color: {}; ",
                escape(&ctx.theme.primary)
            );
            text_div(out, "element-logo-placeholder", &extra, &t.text)
        }
        ElementKind::Image(image) => out.push_str(&format!(
            r#"<img src="{}" alt="{}" class="element-image" style="{}">"#,
            escape(&image.src),
            escape(&image.alt),
            style
        )),
        ElementKind::Cards(variant, group) => render_cards(out, variant.tag(), group, ctx),
        ElementKind::ModelCards(cards) => render_model_cards(out, cards, ctx),
        ElementKind::Timeline(timeline) => render_timeline(out, timeline, ctx),
        ElementKind::FeatureList(list) => render_feature_list(out, list),
        ElementKind::ClientSection(section) => render_client_section(out, section),
        ElementKind::ContactSection(section) => render_contact_section(out, section),
        ElementKind::HighlightBox(HighlightBox { title, content }) => {
            out.push_str(r#"<div class="highlight-box">"#);
            if !title.is_empty() {
                out.push_str(&format!(r#"<div class="box-title">{}</div>"#, escape(title)));
            }
            out.push_str(&format!(r#"<div class="box-content">{}</div></div>"#, escape(content)));
        }
        ElementKind::ImageGrid(grid) => render_image_grid(out, grid),
        ElementKind::ProcessFlow(flow) => render_process_flow(out, flow),
        ElementKind::FacilityInfo(info) => {
            out.push_str(r#"<div class="facility-info">"#);
            for item in &info.items {
                out.push_str(&format!(
                    r#"<div class="facility-item"><div class="facility-label">{}</div><div class="facility-value">{}</div></div>"#,
                    escape(&item.label),
                    escape(&item.value)
                ));
            }
            out.push_str("</div>");
        }
        ElementKind::FeatureGrid(grid) => render_feature_grid(out, grid),
        ElementKind::NetworkRegions(regions) => render_network_regions(out, regions),
        ElementKind::TocItems(toc) => render_toc(out, toc, ctx),
        ElementKind::StatBlock(stats) => render_stats(out, stats),
        ElementKind::Chart(chart) => render_chart(out, chart, ctx),
        ElementKind::ComparisonTable(table) => render_comparison_table(out, table),
        ElementKind::IconGrid(grid) => render_icon_grid(out, grid, ctx),
        ElementKind::ClientLogos(logos) => {
            out.push_str(r#"<div class="client-logos-container">"#);
            for client in &logos.clients {
                let class = if client.highlight() {
                    "client-logo-item highlighted"
                } else {
                    "client-logo-item"
                };
                out.push_str(&format!(r#"<div class="{}">{}</div>"#, class, escape(client.name())));
            }
            out.push_str("</div>");
        }
        ElementKind::ContactInfo(info) => {
            out.push_str(r#"<div class="contact-info-list">"#);
            for item in &info.items {
                let glyph = if item.kind.is_empty() { "" } else { icons::glyph(&item.kind) };
                out.push_str(&format!(
                    r#"<div class="contact-info-item"><span class="contact-info-icon">{}</span><span>{}</span></div>"#,
                    glyph,
                    escape(&item.value)
                ));
            }
            out.push_str("</div>");
        }
        ElementKind::Unknown(unknown) => render_unknown(out, unknown, &el.text_fragments(), &style),
    }
}

fn render_cards(out: &mut String, class: &str, group: &CardGroup, ctx: &ElementContext<'_>) {
    out.push_str(&format!(r#"<div class="cards-container {}">"#, class));
    for item in &group.items {
        out.push_str(r#"<div class="card">"#);
        if !item.icon.is_empty() {
            out.push_str(&format!(r#"<div class="card-icon">{}</div>"#, icons::glyph(&item.icon)));
        }
        if !item.title().is_empty() {
            out.push_str(&format!(
                r#"<div class="card-title" style="color: {};">{}</div>"#,
                ctx.color_or_primary(&item.color),
                escape(item.title())
            ));
        }
        if !item.subtitle.is_empty() {
            out.push_str(&format!(r#"<div class="card-subtitle">{}</div>"#, escape(&item.subtitle)));
        }
        if !item.value().is_empty() {
            out.push_str(&format!(r#"<div class="card-value">{}</div>"#, escape(item.value())));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

fn render_model_cards(out: &mut String, cards: &ModelCards, ctx: &ElementContext<'_>) {
    out.push_str(r#"<div class="model-cards-container">"#);
    for item in &cards.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="model-card">"#,
                r#"<div class="model-card-icon" style="color: {};">{}</div>"#,
                r#"<div class="model-card-title">{}</div>"#,
                r#"<div class="model-card-desc">{}</div>"#,
                "</div>"
            ),
            ctx.color_or_primary(&item.icon_color),
            icons::glyph(&item.icon),
            escape(&item.title),
            escape(&item.description)
        ));
    }
    out.push_str("</div>");
}

fn render_timeline(out: &mut String, timeline: &Timeline, ctx: &ElementContext<'_>) {
    out.push_str(r#"<div class="timeline-container">"#);
    for period in &timeline.periods {
        let color = ctx.color_or_primary(&period.bar_color);
        let highlight = if period.highlight {
            format!(
                "background: {}; color: white; padding: 4px 8px; border-radius: 4px;",
                color
            )
        } else {
            String::new()
        };
        out.push_str(&format!(
            concat!(
                r#"<div class="timeline-item" style="border-top: 4px solid {color};">"#,
                r#"<div class="timeline-year" style="color: {color}; {highlight}">{label}</div>"#,
                r#"<div class="timeline-milestone">{milestone}</div>"#,
                "</div>"
            ),
            color = color,
            highlight = highlight,
            label = escape(period.label().as_str()),
            milestone = escape(&period.milestone)
        ));
    }
    out.push_str("</div>");
}

fn render_feature_list(out: &mut String, list: &FeatureList) {
    out.push_str(r#"<div class="list-container">"#);
    for item in &list.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="list-item"><span class="list-icon">{}</span>"#,
                r#"<div class="list-content"><div class="list-title">{}</div>"#,
                r#"<div class="list-desc">{}</div></div></div>"#
            ),
            icons::glyph_or(&item.icon, DEFAULT_GLYPH),
            escape(&item.title),
            escape(&item.description)
        ));
    }
    out.push_str("</div>");
}

fn render_client_section(out: &mut String, section: &ClientSection) {
    if !section.title.is_empty() {
        out.push_str(&format!(r#"<div class="section-title">{}</div>"#, escape(&section.title)));
    }
    out.push_str(r#"<div class="clients-grid">"#);
    for client in &section.clients {
        let class = if client.highlight() {
            "client-item highlight"
        } else {
            "client-item"
        };
        out.push_str(&format!(r#"<div class="{}">{}</div>"#, class, escape(client.name())));
    }
    out.push_str("</div>");
}

fn render_contact_section(out: &mut String, section: &ContactSection) {
    out.push_str(r#"<div class="contact-section">"#);
    if !section.title.is_empty() {
        out.push_str(&format!(r#"<div class="contact-title">{}</div>"#, escape(&section.title)));
    }
    for item in &section.items {
        let icon = item.icon.as_deref().unwrap_or(&item.kind);
        out.push_str(&format!(
            r#"<div class="contact-item"><span class="contact-label">{}</span>"#,
            escape(&item.kind.to_uppercase())
        ));
        if !icon.is_empty() {
            out.push_str(&format!(
                r#"<span style="margin-right: 8px;">{}</span>"#,
                icons::glyph(icon)
            ));
        }
        out.push_str(&format!("{}</div>", escape(&item.value)));
    }
    out.push_str("</div>");
}

fn render_image_grid(out: &mut String, grid: &ImageGrid) {
    out.push_str(r#"<div class="image-grid">"#);
    for image in &grid.images {
        out.push_str(&format!(
            r#"<div class="grid-image-wrapper"><img src="{}" alt="{}">"#,
            escape(&image.src),
            escape(&image.alt)
        ));
        if !image.caption.is_empty() {
            out.push_str(&format!(
                r#"<div class="grid-image-caption">{}</div>"#,
                escape(&image.caption)
            ));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

fn render_process_flow(out: &mut String, flow: &ProcessFlow) {
    if !flow.title.is_empty() {
        out.push_str(&format!(r#"<div class="section-title">{}</div>"#, escape(&flow.title)));
    }
    out.push_str(r#"<div class="process-flow">"#);
    for step in &flow.steps {
        out.push_str(&format!(
            concat!(
                r#"<div class="process-step"><div class="process-number">{}</div>"#,
                r#"<div class="process-title">{}</div>"#,
                r#"<div class="process-desc">{}</div></div>"#
            ),
            escape(step.step.as_str()),
            escape(&step.title),
            escape(&step.description)
        ));
    }
    out.push_str("</div>");
}

fn render_feature_grid(out: &mut String, grid: &FeatureList) {
    out.push_str(r#"<div class="feature-grid">"#);
    for item in &grid.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="feature-item"><div class="feature-icon">{}</div>"#,
                r#"<div class="feature-title">{}</div>"#,
                r#"<div class="feature-desc">{}</div></div>"#
            ),
            icons::glyph_or(&item.icon, DEFAULT_GLYPH),
            escape(&item.title),
            escape(&item.description)
        ));
    }
    out.push_str("</div>");
}

fn render_network_regions(out: &mut String, regions: &NetworkRegions) {
    out.push_str(r#"<div class="network-regions">"#);
    for item in &regions.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="region-card"><div class="region-icon">{}</div>"#,
                r#"<div class="region-name">{}</div>"#,
                r#"<div class="region-countries">{}</div></div>"#
            ),
            icons::glyph_or(&item.icon, REGION_GLYPH),
            escape(&item.region),
            escape(&item.countries.join(", "))
        ));
    }
    out.push_str("</div>");
}

fn render_toc(out: &mut String, toc: &TocItems, ctx: &ElementContext<'_>) {
    out.push_str(r#"<div class="toc-container">"#);
    for item in &toc.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="toc-item">"#,
                r#"<span class="toc-number" style="color: {};">{}</span>"#,
                r#"<span class="toc-title" style="color: {};">{}</span>"#,
                "</div>"
            ),
            ctx.color_or_primary(&item.number_color),
            escape(item.number.as_str()),
            escape(item.title_color.as_deref().unwrap_or("#FFFFFF")),
            escape(&item.title)
        ));
    }
    out.push_str("</div>");
}

fn render_stats(out: &mut String, stats: &StatBlock) {
    out.push_str(r#"<div class="stats-container">"#);
    for item in &stats.items {
        out.push_str(&format!(
            concat!(
                r#"<div class="stat-item">"#,
                r#"<div class="stat-value" style="color: {}; font-size: {};">{}<span class="stat-unit">{}</span></div>"#,
                r#"<div class="stat-label">{}</div>"#,
                "</div>"
            ),
            escape(item.value_color.as_deref().unwrap_or("#FFFFFF")),
            escape(item.value_size.as_deref().unwrap_or("64px")),
            escape(item.value.as_str()),
            escape(&item.unit),
            escape(&item.label)
        ));
    }
    out.push_str("</div>");
}

fn render_chart(out: &mut String, chart: &Chart, ctx: &ElementContext<'_>) {
    out.push_str(r#"<div class="chart-container">"#);
    if !chart.title.is_empty() {
        out.push_str(&format!(r#"<div class="chart-title">{}</div>"#, escape(&chart.title)));
    }
    for point in &chart.data {
        out.push_str(&format!(
            concat!(
                r#"<div class="chart-bar-item">"#,
                r#"<div class="chart-bar-label">{label} ({value}%)</div>"#,
                r#"<div class="chart-bar-wrapper"><div class="chart-bar" style="width: {width}%; background: {color};"></div></div>"#,
                "</div>"
            ),
            label = escape(&point.label),
            value = point.value,
            width = point.value.clamp(0.0, 100.0),
            color = ctx.color_or_primary(&point.color)
        ));
    }
    out.push_str("</div>");
}

fn render_comparison_table(out: &mut String, table: &ComparisonTable) {
    out.push_str(r#"<table class="comparison-table"><thead><tr>"#);
    for header in &table.headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        let class = if row.is_highlight { "highlight" } else { "" };
        out.push_str(&format!(r#"<tr class="{}"><td>{}</td>"#, class, escape(&row.company)));
        for value in &row.values {
            match value.as_str() {
                "check" => out.push_str(r#"<td class="check">✓</td>"#),
                "highlight" => out.push_str(r#"<td class="highlight-check">✓</td>"#),
                other => out.push_str(&format!("<td>{}</td>", escape(other))),
            }
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

fn render_icon_grid(out: &mut String, grid: &IconGrid, ctx: &ElementContext<'_>) {
    let highlight = ctx.color_or_primary(&grid.highlight_color);
    let default = escape(grid.default_color.as_deref().unwrap_or("#4A4A4A"));
    out.push_str(r#"<div class="icon-grid-container">"#);
    for i in 0..grid.total.min(MAX_ICON_GRID_ITEMS) {
        let color = if i < grid.highlighted { &highlight } else { &default };
        out.push_str(&format!(
            r#"<div class="icon-grid-item" style="background: {};">{}</div>"#,
            color, DEFAULT_GLYPH
        ));
    }
    out.push_str("</div>");
}

fn render_unknown(out: &mut String, unknown: &UnknownElement, fragments: &[String], style: &str) {
    log::debug!("Rendering unknown element type {:?} generically", unknown.tag);
    out.push_str(&format!(
        r#"<div class="element-unknown" data-type="{}" style="{}"><div class="element-unknown-label">{}</div>"#,
        escape(&unknown.tag),
        style,
        escape(&unknown.tag)
    ));
    for fragment in fragments {
        out.push_str(&format!(r#"<div class="element-body">{}</div>"#, escape(fragment)));
    }
    out.push_str("</div>");
}

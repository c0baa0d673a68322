use eframe::egui::{self, Align, Color32, Pos2, Rect, Stroke, StrokeKind};

use crate::links::{self, DemoLinkTable};
use crate::parser::{Block, StatCard, Step};
use crate::render::text;
use crate::theme::Theme;

/// Clickable area of a demo button drawn on the current frame.
#[derive(Debug, Clone)]
pub struct DemoButton {
    pub key: String,
    pub rect: Rect,
    pub url: String,
    pub description: Option<&'static str>,
}

impl DemoButton {
    pub fn enabled(&self) -> bool {
        links::is_resolved(&self.url)
    }
}

pub struct BlockContext<'a> {
    pub theme: &'a Theme,
    pub links: &'a DemoLinkTable,
    pub scale: f32,
    pub align: Align,
    /// Index of the demo button hovered on the previous frame, drawn
    /// highlighted.
    pub hovered_demo: Option<usize>,
}

/// Draw one block at `pos` within `width`. Returns height used.
pub fn draw_block(
    ui: &egui::Ui,
    block: &Block,
    ctx: &BlockContext<'_>,
    pos: Pos2,
    width: f32,
    buttons: &mut Vec<DemoButton>,
) -> f32 {
    let theme = ctx.theme;
    let scale = ctx.scale;
    let anchor = anchor_for(ctx.align, pos, width);
    match block {
        Block::Heading { text, level } => {
            text::draw_heading(ui, text, *level, theme, anchor, width, ctx.align, scale)
        }
        Block::Text { text, muted } => {
            text::draw_paragraph(ui, text, *muted, theme, anchor, width, ctx.align, scale)
        }
        Block::Bullets { items } => draw_bullets(ui, items, theme, pos, width, scale),
        Block::Stats { cards } => draw_stats(ui, cards, theme, pos, width, scale),
        Block::Table { headers, rows } => draw_table(ui, headers, rows, theme, pos, width, scale),
        Block::Steps { items } => draw_steps(ui, items, theme, pos, width, scale),
        Block::Callout { text } => draw_callout(ui, text, theme, pos, width, scale),
        Block::Demo {
            link,
            label,
            fallback,
            show_description,
        } => {
            let url = ctx.links.resolve_key(link, fallback.as_deref());
            let label = label.as_deref().unwrap_or("Watch the demo");
            let hovered = ctx.hovered_demo == Some(buttons.len());
            let rect = draw_demo_button(ui, label, &url, hovered, theme, pos, width, ctx.align, scale);
            let description = ctx.links.describe_key(link);
            let mut height = rect.height();
            if let (true, Some(caption)) = (*show_description, description) {
                height += 10.0 * scale;
                height += text::draw_text(
                    ui,
                    caption,
                    Pos2::new(anchor.x, pos.y + height),
                    theme.small_size * scale,
                    theme.muted,
                    width,
                    ctx.align,
                );
            }
            buttons.push(DemoButton {
                key: link.clone(),
                rect,
                url,
                description,
            });
            height
        }
    }
}

fn anchor_for(align: Align, pos: Pos2, width: f32) -> Pos2 {
    match align {
        Align::Center => Pos2::new(pos.x + width / 2.0, pos.y),
        _ => pos,
    }
}

fn draw_bullets(
    ui: &egui::Ui,
    items: &[String],
    theme: &Theme,
    pos: Pos2,
    width: f32,
    scale: f32,
) -> f32 {
    let size = theme.body_size * 0.85 * scale;
    let indent = size * 1.2;
    let gap = 10.0 * scale;
    let mut y = pos.y;
    for item in items {
        text::draw_text(
            ui,
            "\u{2022}",
            Pos2::new(pos.x, y),
            size,
            theme.accent,
            indent,
            Align::LEFT,
        );
        let h = text::draw_text(
            ui,
            item,
            Pos2::new(pos.x + indent, y),
            size,
            theme.foreground,
            width - indent,
            Align::LEFT,
        );
        y += h + gap;
    }
    (y - pos.y - gap).max(0.0)
}

/// Stat cards in a grid; four captioned cards wrap into 2x2.
fn draw_stats(
    ui: &egui::Ui,
    cards: &[StatCard],
    theme: &Theme,
    pos: Pos2,
    width: f32,
    scale: f32,
) -> f32 {
    if cards.is_empty() {
        return 0.0;
    }
    let captioned = cards.iter().any(|c| c.caption.is_some());
    let cols = if cards.len() == 4 && captioned {
        2
    } else {
        cards.len().min(4)
    };
    let gap = 24.0 * scale;
    let padding = 24.0 * scale;
    let card_width = (width - gap * (cols as f32 - 1.0)) / cols as f32;
    let inner = card_width - padding * 2.0;

    let value_size = theme.h2_size * 0.8 * scale;
    let label_size = theme.body_size * 0.8 * scale;
    let caption_size = theme.small_size * scale;

    let card_height = cards
        .iter()
        .map(|card| {
            let mut h = text::measure_text(ui, &card.value, value_size, inner).y;
            h += 8.0 * scale + text::measure_text(ui, &card.label, label_size, inner).y;
            if let Some(caption) = &card.caption {
                h += 8.0 * scale + text::measure_text(ui, caption, caption_size, inner).y;
            }
            h + padding * 2.0
        })
        .fold(0.0_f32, f32::max);

    let rows = cards.len().div_ceil(cols);
    for (i, card) in cards.iter().enumerate() {
        let col = i % cols;
        let row = i / cols;
        let rect = Rect::from_min_size(
            Pos2::new(
                pos.x + col as f32 * (card_width + gap),
                pos.y + row as f32 * (card_height + gap),
            ),
            egui::vec2(card_width, card_height),
        );
        let radius = 12.0 * scale;
        ui.painter().rect_filled(rect, radius, theme.card_background);
        ui.painter().rect_stroke(
            rect,
            radius,
            Stroke::new(1.0, theme.card_border),
            StrokeKind::Inside,
        );

        let x = rect.left() + padding;
        let mut y = rect.top() + padding;
        y += text::draw_text(ui, &card.value, Pos2::new(x, y), value_size, theme.accent, inner, Align::LEFT);
        y += 8.0 * scale;
        y += text::draw_text(ui, &card.label, Pos2::new(x, y), label_size, theme.heading_color, inner, Align::LEFT);
        if let Some(caption) = &card.caption {
            y += 8.0 * scale;
            text::draw_text(ui, caption, Pos2::new(x, y), caption_size, theme.muted, inner, Align::LEFT);
        }
    }
    rows as f32 * card_height + (rows as f32 - 1.0) * gap
}

fn draw_table(
    ui: &egui::Ui,
    headers: &[String],
    rows: &[Vec<String>],
    theme: &Theme,
    pos: Pos2,
    width: f32,
    scale: f32,
) -> f32 {
    let cols = headers
        .len()
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    if cols == 0 {
        return 0.0;
    }
    let cell_padding = 14.0 * scale;
    let col_width = width / cols as f32;
    let inner = col_width - cell_padding * 2.0;
    let header_size = theme.body_size * 0.8 * scale;
    let cell_size = theme.small_size * scale;
    let rule = Stroke::new(1.0, theme.card_border);

    let mut y = pos.y;
    let header_height = row_height(ui, headers, header_size, inner) + cell_padding * 2.0;
    ui.painter().rect_filled(
        Rect::from_min_size(pos, egui::vec2(width, header_height)),
        8.0 * scale,
        theme.card_background,
    );
    for (c, header) in headers.iter().enumerate() {
        let x = pos.x + c as f32 * col_width + cell_padding;
        text::draw_text(ui, header, Pos2::new(x, y + cell_padding), header_size, theme.accent, inner, Align::LEFT);
    }
    y += header_height;

    for row in rows {
        let height = row_height(ui, row, cell_size, inner) + cell_padding * 2.0;
        for (c, cell) in row.iter().enumerate() {
            let x = pos.x + c as f32 * col_width + cell_padding;
            let color = if c == 0 {
                theme.heading_color
            } else {
                theme.foreground
            };
            text::draw_text(ui, cell, Pos2::new(x, y + cell_padding), cell_size, color, inner, Align::LEFT);
        }
        y += height;
        ui.painter()
            .line_segment([Pos2::new(pos.x, y), Pos2::new(pos.x + width, y)], rule);
    }
    y - pos.y
}

fn row_height(ui: &egui::Ui, cells: &[String], size: f32, width: f32) -> f32 {
    cells
        .iter()
        .map(|cell| text::measure_text(ui, cell, size, width).y)
        .fold(size, f32::max)
}

/// Numbered flow: a badge per step with title and optional detail.
fn draw_steps(
    ui: &egui::Ui,
    items: &[Step],
    theme: &Theme,
    pos: Pos2,
    width: f32,
    scale: f32,
) -> f32 {
    let badge = 22.0 * scale;
    let indent = badge * 2.0 + 20.0 * scale;
    let title_size = theme.body_size * 0.85 * scale;
    let detail_size = theme.small_size * scale;
    let gap = 18.0 * scale;
    let mut y = pos.y;
    for (i, step) in items.iter().enumerate() {
        let center = Pos2::new(pos.x + badge, y + badge);
        ui.painter().circle_filled(center, badge, theme.accent);
        let number = ui.painter().layout_no_wrap(
            (i + 1).to_string(),
            egui::FontId::proportional(badge),
            Color32::WHITE,
        );
        let number_pos = center - number.rect.size() / 2.0;
        ui.painter().galley(number_pos, number, Color32::WHITE);

        let x = pos.x + indent;
        let mut h = text::draw_text(ui, &step.title, Pos2::new(x, y), title_size, theme.heading_color, width - indent, Align::LEFT);
        if let Some(detail) = &step.detail {
            h += 4.0 * scale;
            h += text::draw_text(ui, detail, Pos2::new(x, y + h), detail_size, theme.muted, width - indent, Align::LEFT);
        }
        y += h.max(badge * 2.0) + gap;
    }
    (y - pos.y - gap).max(0.0)
}

fn draw_callout(ui: &egui::Ui, body: &str, theme: &Theme, pos: Pos2, width: f32, scale: f32) -> f32 {
    let padding = 20.0 * scale;
    let size = theme.body_size * 0.75 * scale;
    let text_height = text::measure_text(ui, body, size, width - padding * 2.0).y;
    let rect = Rect::from_min_size(pos, egui::vec2(width, text_height + padding * 2.0));
    let radius = 12.0 * scale;
    ui.painter()
        .rect_filled(rect, radius, Theme::with_opacity(theme.accent, 0.15));
    ui.painter().rect_stroke(
        rect,
        radius,
        Stroke::new(1.5, Theme::with_opacity(theme.accent, 0.5)),
        StrokeKind::Inside,
    );
    text::draw_text(
        ui,
        body,
        Pos2::new(rect.center().x, rect.top() + padding),
        size,
        theme.heading_color,
        width - padding * 2.0,
        Align::Center,
    );
    rect.height()
}

#[allow(clippy::too_many_arguments)]
fn draw_demo_button(
    ui: &egui::Ui,
    label: &str,
    url: &str,
    hovered: bool,
    theme: &Theme,
    pos: Pos2,
    width: f32,
    align: Align,
    scale: f32,
) -> Rect {
    let enabled = links::is_resolved(url);
    let size = theme.body_size * 0.7 * scale;
    let caption = format!("\u{25B6}  {label}  \u{2197}");
    let text_color = if enabled {
        Color32::WHITE
    } else {
        Theme::with_opacity(theme.muted, 0.6)
    };
    let galley = ui
        .painter()
        .layout_no_wrap(caption, egui::FontId::proportional(size), text_color);
    let padding = egui::vec2(28.0 * scale, 14.0 * scale);
    let button_size = galley.rect.size() + padding * 2.0;
    let left = match align {
        Align::Center => pos.x + (width - button_size.x) / 2.0,
        _ => pos.x,
    };
    let rect = Rect::from_min_size(Pos2::new(left, pos.y), button_size);

    let fill = match (enabled, hovered) {
        (false, _) => theme.card_background,
        (true, true) => theme.accent,
        (true, false) => Theme::with_opacity(theme.accent, 0.8),
    };
    ui.painter().rect_filled(rect, 10.0 * scale, fill);
    ui.painter().galley(rect.min + padding, galley, text_color);
    rect
}

pub mod blocks;
pub mod text;

use eframe::egui::{self, Align, Color32, Pos2, Rect};

use crate::deck::SlideDescriptor;
use crate::links::DemoLinkTable;
use crate::parser::{Block, SlideContent};
use crate::theme::Theme;

pub use blocks::DemoButton;

const BLOCK_GAP: f32 = 36.0;

/// Reference resolution the slide sizes in [`Theme`] are designed for.
pub fn compute_scale(rect: Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Only headings and text: centered vertically and horizontally.
    Title,
    Content,
}

pub fn classify_layout(content: &SlideContent) -> Layout {
    let text_only = content
        .blocks
        .iter()
        .all(|b| matches!(b, Block::Heading { .. } | Block::Text { .. }));
    if text_only && content.blocks.len() <= 3 {
        Layout::Title
    } else {
        Layout::Content
    }
}

/// Paint the slide background gradient from its style token.
pub fn draw_background(ui: &egui::Ui, rect: Rect, token: &str, theme: &Theme) {
    let (top, bottom) = theme.slide_background(token);
    if top == bottom {
        ui.painter().rect_filled(rect, 0.0, top);
        return;
    }
    let mut mesh = egui::Mesh::default();
    let vertices = [
        (rect.left_top(), top),
        (rect.right_top(), top),
        (rect.right_bottom(), bottom),
        (rect.left_bottom(), bottom),
    ];
    for (pos, color) in vertices {
        mesh.colored_vertex(pos, color);
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

/// Render a slide's content into `rect`. Returns the demo buttons drawn, so
/// the caller can make them clickable.
pub fn render_slide(
    ui: &egui::Ui,
    slide: &SlideDescriptor<SlideContent>,
    theme: &Theme,
    links: &DemoLinkTable,
    rect: Rect,
    hovered_demo: Option<usize>,
) -> Vec<DemoButton> {
    let scale = compute_scale(rect);
    draw_background(ui, rect, &slide.background, theme);

    let layout = classify_layout(&slide.content);
    let align = match layout {
        Layout::Title => Align::Center,
        Layout::Content => Align::LEFT,
    };
    let ctx = blocks::BlockContext {
        theme,
        links,
        scale,
        align,
        hovered_demo,
    };

    let padding = 96.0 * scale;
    let content_rect = rect.shrink(padding);
    let width = content_rect.width();
    let gap = BLOCK_GAP * scale;

    let subtitle_size = theme.small_size * 1.2 * scale;
    let subtitle_height = slide
        .content
        .subtitle
        .as_deref()
        .map(|s| text::measure_text(ui, s, subtitle_size, width).y + gap)
        .unwrap_or(0.0);

    let start_y = match layout {
        Layout::Title => {
            let total = measure_text_blocks(ui, &slide.content.blocks, theme, width, scale, gap)
                + subtitle_height;
            (content_rect.center().y - total / 2.0).max(content_rect.top())
        }
        Layout::Content => content_rect.top(),
    };

    let mut buttons = Vec::new();
    let mut y = start_y;
    // Subtitle sits above the blocks as an accent-colored kicker
    if let Some(subtitle) = &slide.content.subtitle {
        let x = match align {
            Align::Center => content_rect.center().x,
            _ => content_rect.left(),
        };
        text::draw_text(ui, subtitle, Pos2::new(x, y), subtitle_size, theme.accent, width, align);
        y += subtitle_height;
    }
    for block in &slide.content.blocks {
        let h = blocks::draw_block(
            ui,
            block,
            &ctx,
            Pos2::new(content_rect.left(), y),
            width,
            &mut buttons,
        );
        y += h + gap;
    }
    buttons
}

fn measure_text_blocks(
    ui: &egui::Ui,
    blocks: &[Block],
    theme: &Theme,
    width: f32,
    scale: f32,
    gap: f32,
) -> f32 {
    let heights: Vec<f32> = blocks
        .iter()
        .filter_map(|block| match block {
            Block::Heading { text, level } => {
                Some(text::measure_text(ui, text, theme.heading_size(*level) * scale, width).y)
            }
            Block::Text { text, .. } => {
                Some(text::measure_text(ui, text, theme.body_size * scale, width).y)
            }
            _ => None,
        })
        .collect();
    heights.iter().sum::<f32>() + gap * heights.len().saturating_sub(1) as f32
}

/// White frame with the QR image, or an empty frame while it loads.
pub fn draw_qr_frame(ui: &egui::Ui, rect: Rect, texture: Option<&egui::TextureHandle>, scale: f32) {
    let frame = rect.expand(8.0 * scale);
    ui.painter()
        .rect_filled(frame, 8.0 * scale, Color32::from_rgba_unmultiplied(255, 255, 255, 230));
    if let Some(texture) = texture {
        ui.painter().image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
    }
}

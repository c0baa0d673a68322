use crate::theme::Theme;
use eframe::egui::{self, Align, Color32, FontFamily, FontId, Pos2};

/// Create a wrapped LayoutJob for a single run of text.
pub fn text_job(
    text: &str,
    font_size: f32,
    color: Color32,
    max_width: f32,
    align: Align,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    job.halign = align;
    let format = egui::text::TextFormat {
        font_id: FontId::new(font_size, FontFamily::Proportional),
        color,
        ..Default::default()
    };
    job.append(text, 0.0, format);
    job
}

/// Layout and paint text, returning the height used.
///
/// With `Align::Center`, `pos.x` is the horizontal center of the text block.
pub fn draw_text(
    ui: &egui::Ui,
    text: &str,
    pos: Pos2,
    font_size: f32,
    color: Color32,
    max_width: f32,
    align: Align,
) -> f32 {
    let job = text_job(text, font_size, color, max_width, align);
    let galley = ui.painter().layout_job(job);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

pub fn measure_text(ui: &egui::Ui, text: &str, font_size: f32, max_width: f32) -> egui::Vec2 {
    let job = text_job(text, font_size, Color32::WHITE, max_width, Align::LEFT);
    ui.painter().layout_job(job).rect.size()
}

/// Draw a heading. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_heading(
    ui: &egui::Ui,
    text: &str,
    level: u8,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    align: Align,
    scale: f32,
) -> f32 {
    let size = theme.heading_size(level) * scale;
    draw_text(ui, text, pos, size, theme.heading_color, max_width, align)
}

/// Draw a paragraph. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_paragraph(
    ui: &egui::Ui,
    text: &str,
    muted: bool,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    align: Align,
    scale: f32,
) -> f32 {
    let color = if muted { theme.muted } else { theme.foreground };
    draw_text(ui, text, pos, theme.body_size * scale, color, max_width, align)
}

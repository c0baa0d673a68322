use std::path::{Path, PathBuf};

use anyhow::Context;
use eframe::egui;

use crate::config::Config;
use crate::deck::SlideDeck;
use crate::links::DemoLinkTable;
use crate::parser::{self, SlideContent};
use crate::render;
use crate::theme::Theme;

struct ExportApp {
    deck: SlideDeck<SlideContent>,
    theme: Theme,
    links: DemoLinkTable,
    output_dir: PathBuf,
    screenshot_requested: bool,
    done: bool,
    failures: usize,
}

impl ExportApp {
    fn save_current(&mut self, image: &egui::ColorImage) {
        let filename = format!("slide-{:02}.png", self.deck.current_index() + 1);
        let path = self.output_dir.join(&filename);
        match save_color_image(image, &path) {
            Ok(()) => eprintln!("  Saved {filename}"),
            Err(e) => {
                log::error!("{e:#}");
                self.failures += 1;
            }
        }
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Check for screenshot result from previous frame
        let mut screenshot = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot = Some(image.clone());
                }
            }
        });

        if let Some(image) = screenshot {
            self.save_current(&image);
            self.screenshot_requested = false;
            if self.deck.current_index() + 1 >= self.deck.count() {
                if self.failures > 0 {
                    log::warn!("{} slide(s) could not be saved", self.failures);
                }
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
            self.deck.next();
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                render::render_slide(ui, self.deck.current(), &self.theme, &self.links, rect, None);
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> anyhow::Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to save {}", path.display()))
}

pub fn run(
    file: Option<PathBuf>,
    output_dir: PathBuf,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let presentation = parser::load_or_builtin(file.as_deref())?;
    let config = Config::load_or_default();
    let (meta, deck) = presentation.into_deck()?;

    let theme_name = meta
        .theme
        .as_deref()
        .or_else(|| config.theme_name())
        .unwrap_or("dark");
    let theme = Theme::from_name(theme_name);
    let links = DemoLinkTable::new(config.link_settings());

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    eprintln!(
        "Exporting {} slides to {} ({}x{})",
        deck.count(),
        output_dir.display(),
        width,
        height,
    );

    let title = meta
        .title
        .clone()
        .unwrap_or_else(|| "pitchdeck export".to_string());

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ExportApp {
                deck,
                theme,
                links,
                output_dir,
                screenshot_requested: false,
                done: false,
                failures: 0,
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("Export complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_color_image_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slide-01.png");
        let image = egui::ColorImage::from_rgba_unmultiplied([4, 2], &[255, 0, 0, 255].repeat(8));
        save_color_image(&image, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }
}

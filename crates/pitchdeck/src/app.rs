use eframe::egui;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::deck::SlideDeck;
use crate::keys::{KeyBinding, KeyDispatcher, NavKey};
use crate::links::DemoLinkTable;
use crate::parser::{self, PresentationMeta, SlideContent};
use crate::qr::{self, QrSize};
use crate::render::{self, DemoButton};
use crate::theme::Theme;
use crate::watch::DeckWatcher;

const NAV_HEIGHT: f32 = 110.0;
const WATCH_POLL: Duration = Duration::from_millis(500);

/// Launch options gathered from the command line.
pub struct PresentOptions {
    pub file: Option<PathBuf>,
    pub windowed: bool,
    /// 1-based slide to start on.
    pub start_slide: Option<usize>,
    pub watch: bool,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

enum QrLoad {
    Pending,
    Ready(egui::ColorImage),
    Uploaded,
    Failed,
}

/// QR overlay: downloaded once in the background, uploaded as a texture on
/// the UI thread.
struct QrOverlay {
    size: QrSize,
    load: Arc<Mutex<QrLoad>>,
    texture: Option<egui::TextureHandle>,
}

impl QrOverlay {
    fn spawn(url: String, size: QrSize, ctx: egui::Context) -> Self {
        let load = Arc::new(Mutex::new(QrLoad::Pending));
        let slot = Arc::clone(&load);
        std::thread::spawn(move || {
            let result = match qr::fetch_qr_image(&url, size) {
                Ok(image) => QrLoad::Ready(image),
                Err(e) => {
                    log::warn!("QR code unavailable: {e:#}");
                    QrLoad::Failed
                }
            };
            if let Ok(mut slot) = slot.lock() {
                *slot = result;
            }
            ctx.request_repaint();
        });
        Self {
            size,
            load,
            texture: None,
        }
    }

    /// Upload the image if the download finished since the last frame.
    fn poll(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        let Ok(mut load) = self.load.lock() else {
            return;
        };
        if matches!(*load, QrLoad::Ready(_)) {
            if let QrLoad::Ready(image) = std::mem::replace(&mut *load, QrLoad::Uploaded) {
                self.texture =
                    Some(ctx.load_texture("qr-code", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn failed(&self) -> bool {
        self.load
            .lock()
            .is_ok_and(|load| matches!(*load, QrLoad::Failed))
    }
}

struct PresentationApp {
    deck: Rc<RefCell<SlideDeck<SlideContent>>>,
    meta: PresentationMeta,
    keys: KeyDispatcher,
    binding: KeyBinding,
    links: DemoLinkTable,
    theme: Theme,
    qr: Option<QrOverlay>,
    watcher: Option<DeckWatcher>,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    last_ctrl_c: Option<Instant>,
    /// Index of the demo button under the pointer on the previous frame
    hovered_demo: Option<usize>,
}

impl PresentationApp {
    fn new(
        deck: SlideDeck<SlideContent>,
        meta: PresentationMeta,
        links: DemoLinkTable,
        theme: Theme,
        qr: Option<QrOverlay>,
        watcher: Option<DeckWatcher>,
    ) -> Self {
        let deck = Rc::new(RefCell::new(deck));
        let keys = KeyDispatcher::new();
        let binding = keys.bind(&deck);
        Self {
            deck,
            meta,
            keys,
            binding,
            links,
            theme,
            qr,
            watcher,
            toast: None,
            last_esc: None,
            last_ctrl_c: None,
            hovered_demo: None,
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    fn go_to(&mut self, index: usize) {
        if let Err(e) = self.deck.borrow_mut().go_to(index) {
            log::warn!("{e}");
        }
    }

    /// Swap in a freshly loaded deck. The key binding moves to the new deck;
    /// the old binding is released when it is replaced.
    fn reload(&mut self) {
        let Some(path) = self.watcher.as_ref().map(|w| w.path().to_path_buf()) else {
            return;
        };
        let loaded = parser::load(&path).and_then(|p| p.into_deck().map_err(anyhow::Error::from));
        match loaded {
            Ok((meta, mut deck)) => {
                let keep = self.deck.borrow().current_index().min(deck.count() - 1);
                if let Err(e) = deck.go_to(keep) {
                    log::warn!("{e}");
                }
                log::info!("reloaded {} ({} slides)", path.display(), deck.count());
                let deck = Rc::new(RefCell::new(deck));
                self.binding = self.keys.bind(&deck);
                log::debug!("keys rebound (active: {})", self.binding.is_active());
                self.deck = deck;
                self.meta = meta;
                self.toast = Some(Toast::new("Deck reloaded"));
            }
            Err(e) => {
                log::error!("reload failed: {e:#}");
                self.toast = Some(Toast::new("Reload failed, keeping previous deck"));
            }
        }
    }

    fn draw_slide(&mut self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect) {
        let buttons: Vec<DemoButton> = {
            let deck = self.deck.borrow();
            render::render_slide(
                ui,
                deck.current(),
                &self.theme,
                &self.links,
                rect,
                self.hovered_demo,
            )
        };

        let mut hovered = None;
        for (i, button) in buttons.iter().enumerate() {
            if !button.enabled() {
                continue;
            }
            let mut response =
                ui.interact(button.rect, egui::Id::new(("demo", i)), egui::Sense::click());
            if let Some(description) = button.description {
                response = response.on_hover_text(description);
            }
            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                hovered = Some(i);
            }
            if response.clicked() {
                log::info!("opening {} -> {}", button.key, button.url);
                // The system browser gets no handle back to the presenter
                ctx.open_url(egui::OpenUrl::new_tab(&button.url));
            }
        }
        if hovered != self.hovered_demo {
            self.hovered_demo = hovered;
            ctx.request_repaint();
        }

        let scale = render::compute_scale(rect);
        if let Some(qr) = self.qr.as_mut() {
            qr.poll(ctx);
            if !qr.failed() {
                let side = qr.size.pixels() as f32 * scale;
                let qr_rect = egui::Rect::from_min_size(
                    egui::pos2(rect.right() - side - 24.0 * scale, rect.top() + 24.0 * scale),
                    egui::vec2(side, side),
                );
                render::draw_qr_frame(ui, qr_rect, qr.texture.as_ref(), scale);
            }
        }
    }

    fn draw_nav_bar(&mut self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let theme = &self.theme;
        ui.painter().rect_filled(rect, 0.0, theme.nav_background);

        let (index, count, label, titles) = {
            let deck = self.deck.borrow();
            let titles: Vec<String> = deck.slides().iter().map(|s| s.title.clone()).collect();
            (deck.current_index(), deck.count(), deck.position_label(), titles)
        };

        let button_size = egui::vec2(180.0 * scale, 56.0 * scale);
        let margin = 32.0 * scale;
        let back_rect = egui::Rect::from_min_size(
            egui::pos2(rect.left() + margin, rect.center().y - button_size.y / 2.0),
            button_size,
        );
        let next_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.right() - margin - button_size.x,
                rect.center().y - button_size.y / 2.0,
            ),
            button_size,
        );
        let font = egui::FontId::proportional(24.0 * scale);
        let white = egui::Color32::WHITE;

        ui.painter()
            .rect_filled(back_rect, 10.0 * scale, theme.card_background);
        ui.painter().text(
            back_rect.center(),
            egui::Align2::CENTER_CENTER,
            "\u{2039}  Back",
            font.clone(),
            theme.foreground,
        );
        ui.painter().rect_filled(next_rect, 10.0 * scale, theme.accent);
        ui.painter().text(
            next_rect.center(),
            egui::Align2::CENTER_CENTER,
            "Next  \u{203A}",
            font.clone(),
            white,
        );

        // Counter and one dot per slide; the current dot is stretched
        let counter = ui.painter().layout_no_wrap(label, font, theme.foreground);
        let dot = 12.0 * scale;
        let dot_gap = 8.0 * scale;
        let active_width = dot * 2.5;
        let dots_width = (count.saturating_sub(1)) as f32 * (dot + dot_gap) + active_width;
        let group_width = counter.rect.width() + 24.0 * scale + dots_width;
        let mut x = rect.center().x - group_width / 2.0;
        let counter_pos = egui::pos2(x, rect.center().y - counter.rect.height() / 2.0);
        x += counter.rect.width() + 24.0 * scale;
        ui.painter().galley(counter_pos, counter, theme.foreground);

        let mut dot_clicked = None;
        for i in 0..count {
            let width = if i == index { active_width } else { dot };
            let dot_rect = egui::Rect::from_min_size(
                egui::pos2(x, rect.center().y - dot / 2.0),
                egui::vec2(width, dot),
            );
            let response = ui
                .interact(dot_rect, egui::Id::new(("dot", i)), egui::Sense::click())
                .on_hover_text(titles[i].as_str());
            let color = if i == index {
                theme.accent
            } else if response.hovered() {
                Theme::with_opacity(theme.foreground, 0.5)
            } else {
                Theme::with_opacity(theme.foreground, 0.3)
            };
            ui.painter().rect_filled(dot_rect, dot / 2.0, color);
            if response.clicked() {
                dot_clicked = Some(i);
            }
            x += width + dot_gap;
        }

        let back = ui.interact(back_rect, egui::Id::new("nav-back"), egui::Sense::click());
        let next = ui.interact(next_rect, egui::Id::new("nav-next"), egui::Sense::click());
        if back.hovered() || next.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if back.clicked() {
            self.deck.borrow_mut().previous();
        }
        if next.clicked() {
            self.deck.borrow_mut().next();
        }
        if let Some(i) = dot_clicked {
            self.go_to(i);
        }
    }

    fn draw_toast(&self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let Some(ref toast) = self.toast else { return };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let toast_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let toast_bg = Theme::with_opacity(self.theme.nav_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, toast_color);
        ctx.request_repaint();
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut nav_keys: Vec<NavKey> = Vec::new();
        let mut toggle_theme = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            // Ctrl+C double-tap to quit
            if i.modifiers.ctrl && i.key_pressed(egui::Key::C) {
                if let Some(last) = self.last_ctrl_c {
                    if last.elapsed().as_secs_f32() < 1.0 {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_ctrl_c = Some(Instant::now());
                self.toast = Some(Toast::new("Press Ctrl+C again to quit"));
                return;
            }

            if i.key_pressed(egui::Key::Escape) {
                if let Some(last) = self.last_esc {
                    if last.elapsed().as_secs_f32() < 1.0 {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_esc = Some(Instant::now());
                self.toast = Some(Toast::new("Press Esc again to exit"));
                return;
            }

            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
            }

            if i.key_pressed(egui::Key::ArrowRight) {
                nav_keys.push(NavKey::Forward);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                nav_keys.push(NavKey::Backward);
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_theme {
            self.toggle_theme();
        }
        // Dispatch outside the input closure; listeners borrow the deck mutably
        for key in nav_keys {
            self.keys.dispatch(key);
        }

        if self.watcher.as_ref().is_some_and(|w| w.poll_changed()) {
            self.reload();
        }
        if self.watcher.is_some() {
            ctx.request_repaint_after(WATCH_POLL);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                let scale = render::compute_scale(rect);
                let nav_height = NAV_HEIGHT * scale;
                let slide_rect = egui::Rect::from_min_max(
                    rect.min,
                    egui::pos2(rect.right(), rect.bottom() - nav_height),
                );
                let nav_rect =
                    egui::Rect::from_min_max(egui::pos2(rect.left(), slide_rect.bottom()), rect.max);

                self.draw_slide(ui, ctx, slide_rect);
                self.draw_footer(ui, slide_rect, scale);
                self.draw_nav_bar(ui, ctx, nav_rect, scale);
                self.draw_toast(ui, ctx, slide_rect, scale);
            });
    }
}

impl PresentationApp {
    fn draw_footer(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(ref footer) = self.meta.footer else { return };
        let footer_color = Theme::with_opacity(self.theme.foreground, 0.4);
        let galley = ui.painter().layout_no_wrap(
            footer.clone(),
            egui::FontId::proportional(16.0 * scale),
            footer_color,
        );
        let pos = egui::pos2(
            rect.left() + 24.0 * scale,
            rect.bottom() - galley.rect.height() - 16.0 * scale,
        );
        ui.painter().galley(pos, galley, footer_color);
    }
}

pub fn run(options: PresentOptions) -> anyhow::Result<()> {
    let presentation = parser::load_or_builtin(options.file.as_deref())?;
    let config = Config::load_or_default();

    let links = DemoLinkTable::new(config.link_settings());
    for key in presentation.demo_keys() {
        if !crate::links::is_resolved(&links.resolve_key(key, None)) {
            log::warn!("demo link {key} is not registered; its button will be disabled");
        }
    }
    if links.settings().is_development() {
        log::info!("serving demo links from a development origin");
    }

    let (meta, mut deck) = presentation.into_deck()?;

    let start = options
        .start_slide
        .or_else(|| config.defaults.as_ref().and_then(|d| d.start_slide));
    if let Some(n) = start {
        deck.go_to(n.saturating_sub(1).min(deck.count() - 1))?;
    }

    let theme_name = meta
        .theme
        .as_deref()
        .or_else(|| config.theme_name())
        .unwrap_or("dark");
    let theme = Theme::from_name(theme_name);

    let watcher = match (&options.file, options.watch) {
        (Some(file), true) => Some(DeckWatcher::new(file)?),
        (None, true) => {
            log::warn!("--watch needs a deck file; the built-in deck is not watched");
            None
        }
        _ => None,
    };

    let title = meta
        .title
        .clone()
        .unwrap_or_else(|| "pitchdeck".to_string());

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let qr_config = config.qr();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            let qr = qr_config.enabled().then(|| {
                QrOverlay::spawn(
                    qr_config.url().to_string(),
                    qr_config.size(),
                    cc.egui_ctx.clone(),
                )
            });
            Ok(Box::new(PresentationApp::new(
                deck, meta, links, theme, qr, watcher,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

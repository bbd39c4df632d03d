use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Instant;

use chrono::Local;

use crate::commands::target::PAST_DATE_PROMPT;
use crate::config::Config;
use crate::countdown::TargetDate;
use crate::dashboard::Dashboard;
use crate::data_url::{self, FileBlob};
use crate::display::{DisplayState, SlideImage};
use crate::slideshow::SAVE_WARNING;
use crate::store::{MemoryStore, Store};
use crate::theme::Theme;
use crate::timer::{Clock, Millis, SystemClock};

const TOAST_DURATION: f32 = 1.5;
const TOAST_FADE_START: f32 = 1.0;

type AppDashboard = Dashboard<Box<dyn Store>, DisplayState, Local>;

/// A modal message. Shortcuts and panels are inert while one is open.
enum Dialog {
    Alert(String),
    ConfirmPastDate(TargetDate),
}

enum DialogChoice {
    Dismiss,
    Apply(TargetDate),
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

/// Slide textures, decoded once per data URL. `None` marks a URL that failed
/// to decode so it is not retried every frame.
struct SlideTextures {
    slides: HashMap<Arc<str>, Option<egui::TextureHandle>>,
    /// Last slide drawn. Matched by pointer so an unchanged slide is not
    /// hashed again every frame.
    shown: Option<(Arc<str>, Option<egui::TextureHandle>)>,
    placeholder_path: Option<PathBuf>,
    placeholder: Option<Option<egui::TextureHandle>>,
}

impl SlideTextures {
    fn new(placeholder_path: Option<PathBuf>) -> Self {
        Self {
            slides: HashMap::new(),
            shown: None,
            placeholder_path,
            placeholder: None,
        }
    }

    fn get(&mut self, ctx: &egui::Context, image: &SlideImage) -> Option<egui::TextureHandle> {
        match image {
            SlideImage::Embedded(url) => {
                if let Some((shown, texture)) = &self.shown {
                    if Arc::ptr_eq(shown, url) {
                        return texture.clone();
                    }
                }
                let texture = self
                    .slides
                    .entry(Arc::clone(url))
                    .or_insert_with(|| load_embedded(ctx, url))
                    .clone();
                self.shown = Some((Arc::clone(url), texture.clone()));
                texture
            }
            SlideImage::Placeholder => self
                .placeholder
                .get_or_insert_with(|| {
                    self.placeholder_path
                        .as_deref()
                        .and_then(|path| load_file(ctx, path))
                })
                .clone(),
        }
    }

    /// Drop textures for slides that are no longer in the collection.
    fn retain(&mut self, images: &[String]) {
        self.slides
            .retain(|url, _| images.iter().any(|image| image.as_str() == &**url));
        self.shown = None;
    }
}

fn load_embedded(ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
    let decoded = data_url::decode(url)
        .inspect_err(|e| tracing::warn!("Cannot show slide: {e}"))
        .ok()?;
    texture_from_bytes(ctx, "slide", &decoded.bytes)
}

fn load_file(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    let bytes = std::fs::read(path)
        .inspect_err(|e| tracing::warn!("Cannot read placeholder {}: {e}", path.display()))
        .ok()?;
    texture_from_bytes(ctx, "placeholder", &bytes)
}

fn texture_from_bytes(ctx: &egui::Context, name: &str, bytes: &[u8]) -> Option<egui::TextureHandle> {
    let image = image::load_from_memory(bytes)
        .inspect_err(|e| tracing::warn!("Cannot decode {name} image: {e}"))
        .ok()?
        .into_rgba8();
    let (w, h) = image.dimensions();
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], image.as_raw());
    Some(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

struct CountdownApp {
    dashboard: AppDashboard,
    clock: SystemClock,
    theme: Theme,
    textures: SlideTextures,
    settings_open: bool,
    date_input: String,
    path_input: String,
    dialog: Option<Dialog>,
    toast: Option<Toast>,
    uploads: Vec<mpsc::Receiver<Vec<String>>>,
    window_title: String,
    /// Central panel rect from the last frame, used to place the toast
    last_panel_rect: egui::Rect,
}

impl CountdownApp {
    fn new(
        store: Box<dyn Store>,
        theme: Theme,
        advance_interval: Millis,
        placeholder: Option<PathBuf>,
    ) -> Self {
        let clock = SystemClock;
        let dashboard = Dashboard::open(
            store,
            DisplayState::default(),
            Local,
            advance_interval,
            clock.now_ms(),
        );
        let date_input = dashboard.countdown().target().input_prefill();

        Self {
            dashboard,
            clock,
            theme,
            textures: SlideTextures::new(placeholder),
            settings_open: false,
            date_input,
            path_input: String::new(),
            dialog: None,
            toast: None,
            uploads: Vec::new(),
            window_title: String::new(),
            last_panel_rect: egui::Rect::ZERO,
        }
    }

    fn apply_date_input(&mut self) {
        let now = self.clock.now_ms();
        match self.dashboard.parse_target(&self.date_input) {
            Ok(target) if target.is_past(now) => {
                self.dialog = Some(Dialog::ConfirmPastDate(target));
            }
            Ok(target) => self.apply_target(target, now),
            Err(e) => self.dialog = Some(Dialog::Alert(e.to_string())),
        }
    }

    fn apply_target(&mut self, target: TargetDate, now: Millis) {
        if let Err(e) = self.dashboard.apply_target(target, now) {
            self.dialog = Some(Dialog::Alert(format!(
                "Could not save the target date: {e}"
            )));
        }
    }

    /// Convert files on a worker thread. The window keeps running and picks
    /// the result up in [`Self::collect_uploads`]; if the window closes
    /// first the result is dropped.
    fn start_upload(&mut self, ctx: &egui::Context, files: Vec<FileBlob>) {
        if files.is_empty() {
            return;
        }
        tracing::debug!("Converting {} file(s)", files.len());
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!("Failed to start file conversion: {e}");
                    return;
                }
            };
            let urls = runtime.block_on(data_url::read_all(&files));
            if tx.send(urls).is_ok() {
                ctx.request_repaint();
            }
        });
        self.uploads.push(rx);
    }

    /// Apply finished conversions. Waits while a dialog is open so a save
    /// warning never replaces a pending question.
    fn collect_uploads(&mut self) {
        if self.dialog.is_some() {
            return;
        }
        let mut finished = Vec::new();
        self.uploads.retain(|rx| match rx.try_recv() {
            Ok(urls) => {
                finished.push(urls);
                false
            }
            Err(mpsc::TryRecvError::Empty) => true,
            Err(mpsc::TryRecvError::Disconnected) => false,
        });

        for urls in finished {
            if urls.is_empty() {
                self.toast = Some(Toast::new("No readable images".to_string()));
                continue;
            }
            let count = urls.len();
            let now = self.clock.now_ms();
            match self.dashboard.append_images(urls, now) {
                Ok(()) => self.toast = Some(Toast::new(format!("Added {count} photo(s)"))),
                Err(_) => self.dialog = Some(Dialog::Alert(SAVE_WARNING.to_string())),
            }
        }
    }

    fn clear_photos(&mut self) {
        self.dashboard.clear_images(self.clock.now_ms());
        self.textures.retain(self.dashboard.slideshow().images());
        self.toast = Some(Toast::new("Photos cleared".to_string()));
    }

    fn add_typed_path(&mut self, ctx: &egui::Context) {
        let path = PathBuf::from(self.path_input.trim());
        if !path.is_file() {
            self.dialog = Some(Dialog::Alert(format!("File not found: {}", path.display())));
            return;
        }
        self.path_input.clear();
        self.start_upload(ctx, vec![FileBlob::Path(path)]);
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if self.dialog.is_some() || ctx.wants_keyboard_input() {
            return;
        }

        // Collect viewport commands to send after the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut delta = 0i64;
        let mut toggle_settings = false;
        let mut toggle_theme = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
            }
            if i.key_pressed(egui::Key::S) {
                toggle_settings = true;
            }
            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                delta += 1;
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                delta -= 1;
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_settings {
            self.settings_open = !self.settings_open;
        }
        if toggle_theme {
            self.toggle_theme();
        }
        if delta != 0 {
            self.dashboard.navigate(delta, self.clock.now_ms());
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let files: Vec<FileBlob> = dropped
            .into_iter()
            .filter_map(|file| match (file.path, file.bytes) {
                (Some(path), _) => Some(FileBlob::Path(path)),
                (None, Some(bytes)) => Some(FileBlob::Bytes {
                    name: file.name,
                    bytes: bytes.to_vec(),
                }),
                (None, None) => None,
            })
            .collect();
        self.start_upload(ctx, files);
    }

    fn draw_settings(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(12.0);
        ui.heading("Settings");
        ui.add_space(12.0);

        ui.label("Target date");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.date_input).hint_text("YYYY-MM-DDTHH:MM"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Apply").clicked() || submitted {
            self.apply_date_input();
        }

        ui.add_space(16.0);
        ui.separator();
        ui.label("Photos");
        ui.add(egui::TextEdit::singleline(&mut self.path_input).hint_text("Path to an image"));
        ui.horizontal(|ui| {
            if ui.button("Add").clicked() {
                self.add_typed_path(ctx);
            }
            if ui.button("Clear photos").clicked() {
                self.clear_photos();
            }
        });
        if !self.uploads.is_empty() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Reading photos...");
            });
        }
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Or drop image files on the window.")
                .small()
                .color(self.theme.muted),
        );
    }

    fn draw_countdown(&self, ui: &mut egui::Ui) {
        let display = self.dashboard.display();
        let theme = &self.theme;

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(&display.title)
                    .size(theme.title_size)
                    .color(theme.heading_color)
                    .strong(),
            );
            ui.label(
                egui::RichText::new(&display.date_label)
                    .size(theme.label_size)
                    .color(theme.muted),
            );
        });
        ui.add_space(16.0);

        let fields = &display.countdown;
        let cells = [
            (&fields.days, "Days"),
            (&fields.hours, "Hours"),
            (&fields.minutes, "Minutes"),
            (&fields.seconds, "Seconds"),
        ];
        ui.columns(cells.len(), |columns| {
            for (ui, (value, unit)) in columns.iter_mut().zip(cells) {
                ui.vertical_centered(|ui| draw_field(ui, theme, value, unit));
            }
        });
    }

    /// Draw the slide (or placeholder) and the navigation row. Returns the
    /// requested navigation delta.
    fn draw_slideshow(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> i64 {
        let view = self.dashboard.display().slide.clone();
        let controls_height = if view.controls_visible { 40.0 } else { 0.0 };
        let available = ui.available_size();
        let size = egui::vec2(available.x, (available.y - controls_height).max(0.0));
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());

        match self.textures.get(ctx, &view.image) {
            Some(texture) => {
                let draw_rect = fit_rect(texture.size_vec2(), rect);
                ui.painter().image(
                    texture.id(),
                    draw_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => self.draw_empty_slide(ui, rect, &view.image),
        }

        let mut delta = 0;
        let accent = self.theme.accent;
        if view.controls_visible {
            ui.columns(3, |columns| {
                columns[0].with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Prev").clicked() {
                        delta -= 1;
                    }
                });
                columns[1].vertical_centered(|ui| {
                    if let Some(indicator) = &view.indicator {
                        ui.label(egui::RichText::new(indicator).color(accent));
                    }
                });
                columns[2].with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                    if ui.button("Next").clicked() {
                        delta += 1;
                    }
                });
            });
        }
        delta
    }

    fn draw_empty_slide(&self, ui: &egui::Ui, rect: egui::Rect, image: &SlideImage) {
        let message = match image {
            SlideImage::Placeholder => "Add photos in the settings panel",
            SlideImage::Embedded(_) => "This photo cannot be shown",
        };
        let inner = rect.shrink(24.0);
        ui.painter()
            .rect_filled(inner, 12.0, self.theme.panel_background);
        let galley = ui.painter().layout_no_wrap(
            message.to_string(),
            egui::FontId::proportional(self.theme.label_size),
            self.theme.muted,
        );
        let pos = inner.center() - galley.rect.size() / 2.0;
        ui.painter().galley(pos, galley, self.theme.muted);
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else { return };

        let mut choice = None;
        let (title, message) = match dialog {
            Dialog::Alert(message) => ("Notice", message.as_str()),
            Dialog::ConfirmPastDate(_) => ("Confirm", PAST_DATE_PROMPT),
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(12.0);
                ui.horizontal(|ui| match dialog {
                    Dialog::Alert(_) => {
                        if ui.button("OK").clicked() {
                            choice = Some(DialogChoice::Dismiss);
                        }
                    }
                    Dialog::ConfirmPastDate(target) => {
                        if ui.button("Cancel").clicked() {
                            choice = Some(DialogChoice::Dismiss);
                        }
                        if ui.button("Continue").clicked() {
                            choice = Some(DialogChoice::Apply(target.clone()));
                        }
                    }
                });
            });

        match choice {
            Some(DialogChoice::Dismiss) => self.dialog = None,
            Some(DialogChoice::Apply(target)) => {
                self.dialog = None;
                self.apply_target(target, self.clock.now_ms());
            }
            None => {}
        }
    }

    fn draw_toast(&self, ctx: &egui::Context) {
        let Some(toast) = &self.toast else { return };
        let opacity = toast.opacity();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("toast"),
        ));
        let screen = self.last_panel_rect;
        let galley = painter.layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(16.0),
            Theme::with_opacity(self.theme.foreground, opacity),
        );
        let size = galley.rect.size() + egui::vec2(32.0, 16.0);
        let rect = egui::Rect::from_center_size(
            egui::pos2(screen.center().x, screen.bottom() - 48.0),
            size,
        );
        painter.rect_filled(
            rect,
            8.0,
            Theme::with_opacity(self.theme.panel_background, 0.9 * opacity),
        );
        painter.galley(
            rect.min + egui::vec2(16.0, 8.0),
            galley,
            Theme::with_opacity(self.theme.foreground, opacity),
        );
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let title = &self.dashboard.display().title;
        if *title != self.window_title {
            self.window_title = title.clone();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
        }
    }
}

fn draw_field(ui: &mut egui::Ui, theme: &Theme, value: &str, unit: &str) {
    egui::Frame::new()
        .fill(theme.field_background)
        .corner_radius(12.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(value)
                        .size(theme.digit_size)
                        .color(theme.heading_color)
                        .monospace(),
                );
                ui.label(
                    egui::RichText::new(unit)
                        .size(theme.unit_size)
                        .color(theme.muted),
                );
            });
        });
}

/// Largest rect with the image's aspect ratio that fits centered in `bounds`.
fn fit_rect(image_size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.clock.now_ms();
        self.dashboard.poll(now);
        self.collect_uploads();
        if self.dialog.is_none() {
            self.handle_dropped_files(ctx);
        }
        self.handle_keyboard(ctx);
        self.sync_window_title(ctx);

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let blocked = self.dialog.is_some();
        let bg = self.theme.background;

        egui::SidePanel::right("settings")
            .resizable(false)
            .default_width(280.0)
            .frame(
                egui::Frame::new()
                    .fill(self.theme.panel_background)
                    .inner_margin(16.0),
            )
            .show_animated(ctx, self.settings_open, |ui| {
                ui.add_enabled_ui(!blocked, |ui| self.draw_settings(ui, ctx));
            });

        let mut delta = 0;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(24.0))
            .show(ctx, |ui| {
                self.last_panel_rect = ui.max_rect();
                ui.add_enabled_ui(!blocked, |ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        let label = if self.settings_open {
                            "Close settings"
                        } else {
                            "Settings"
                        };
                        if ui.button(label).clicked() {
                            self.settings_open = !self.settings_open;
                        }
                    });
                    self.draw_countdown(ui);
                    ui.add_space(24.0);
                    delta = self.draw_slideshow(ui, ctx);
                });
            });

        if delta != 0 {
            self.dashboard.navigate(delta, self.clock.now_ms());
        }

        self.draw_dialog(ctx);
        self.draw_toast(ctx);

        if self.toast.is_some() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.dashboard.next_wakeup(self.clock.now_ms()));
        }
    }
}

pub fn run(fullscreen: bool, ephemeral: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default();

    let store: Box<dyn Store> = if ephemeral {
        tracing::info!("Ephemeral mode: nothing will be saved");
        Box::new(MemoryStore::with_quota(config.quota_bytes()))
    } else {
        Box::new(config.open_store()?)
    };

    let theme = Theme::from_name(config.theme());
    let advance_interval = config.advance_interval_ms();
    let placeholder = config.placeholder().map(Path::to_path_buf);
    let fullscreen = fullscreen || config.fullscreen();

    let title = "countdeck";
    let viewport = if fullscreen {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(title)
    } else {
        egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(CountdownApp::new(
                store,
                theme,
                advance_interval,
                placeholder,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_keeps_aspect() {
        let bounds = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 200.0));
        let fitted = fit_rect(egui::vec2(100.0, 100.0), bounds);
        assert_eq!(fitted.size(), egui::vec2(200.0, 200.0));
        assert_eq!(fitted.center(), bounds.center());

        let wide = fit_rect(egui::vec2(800.0, 100.0), bounds);
        assert_eq!(wide.size(), egui::vec2(400.0, 50.0));
    }

    #[test]
    fn test_fit_rect_degenerate_image() {
        let bounds = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(10.0, 10.0));
        assert_eq!(fit_rect(egui::vec2(0.0, 5.0), bounds), bounds);
    }

    #[test]
    fn test_toast_fades_out() {
        let toast = Toast::new("Theme: dark".to_string());
        assert_eq!(toast.opacity(), 1.0);
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_textures_cache_by_url() {
        let ctx = egui::Context::default();
        let mut textures = SlideTextures::new(None);
        let image = SlideImage::Embedded(Arc::from("data:,not an image"));

        assert!(textures.get(&ctx, &image).is_none());
        assert!(textures.get(&ctx, &image.clone()).is_none());
        assert_eq!(textures.slides.len(), 1);
        assert!(textures.shown.is_some());

        textures.retain(&[]);
        assert!(textures.slides.is_empty());
        assert!(textures.shown.is_none());
    }

    #[test]
    fn test_uploads_wait_for_open_dialog() {
        let mut app = CountdownApp::new(
            Box::new(MemoryStore::with_quota(16)),
            Theme::dark(),
            5_000,
            None,
        );
        let past = app.dashboard.parse_target("2000-01-01T00:00").unwrap();
        app.dialog = Some(Dialog::ConfirmPastDate(past));

        let (tx, rx) = mpsc::channel();
        tx.send(vec!["data:,a".to_string(), "data:,b".to_string()])
            .unwrap();
        app.uploads.push(rx);

        app.collect_uploads();
        assert!(matches!(app.dialog, Some(Dialog::ConfirmPastDate(_))));
        assert_eq!(app.uploads.len(), 1);
        assert!(app.dashboard.slideshow().is_empty());

        app.dialog = None;
        app.collect_uploads();
        assert!(app.uploads.is_empty());
        assert_eq!(app.dashboard.slideshow().len(), 2);
        assert!(matches!(&app.dialog, Some(Dialog::Alert(msg)) if msg == SAVE_WARNING));
    }
}

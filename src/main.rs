#![windows_subsystem = "windows"]
//! Slice Previewer - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod content;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use ui::components;
use ui::testimonial;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "slice-previewer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slice_previewer=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME);

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Slice Previewer starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(980.0, 820.0)))
        .with_min_inner_size([640.0, 480.0])
        .with_title(APP_NAME);

    // Window/taskbar icon rasterized from the embedded SVG
    {
        let (rgba, w, h) = utils::rasterize_icon_square(64);
        let icon = egui::IconData { rgba, width: w, height: h };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Keyboard shortcuts (when no modal is open)
        if !self.show_settings {
            let (open_doc, reload_doc) = ctx.input(|i| {
                (
                    i.modifiers.command && i.key_pressed(egui::Key::O),
                    i.modifiers.command && i.key_pressed(egui::Key::R),
                )
            });
            if open_doc {
                self.open_document_dialog(ctx);
            }
            if reload_doc {
                self.reload(ctx);
            }
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.render_toolbar(ctx);
        self.render_document(ctx);
        self.render_settings_modal(ctx);
        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// CHROME (Toolbar, Settings Modal, Toast)
// ============================================================================

impl App {
    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .exact_height(theme::TOOLBAR_HEIGHT)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(12, 0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    // Wordmark
                    let texture = self.mark_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_mark(64);
                        ctx.load_texture(
                            "wordmark",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                    let mark_w = 26.0;
                    ui.image(egui::load::SizedTexture::new(
                        texture.id(),
                        egui::vec2(mark_w, mark_w * aspect),
                    ));

                    ui.add_space(theme::SPACING_SM);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("SLICE PREVIEWER")
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );

                    // Document title
                    let title = self
                        .document
                        .as_ref()
                        .and_then(|d| d.title.clone())
                        .or_else(|| {
                            self.document_path
                                .as_ref()
                                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                        })
                        .unwrap_or_else(|| "Sample document".to_string());
                    ui.add_space(theme::SPACING_LG);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(title)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .truncate()
                        .selectable(false),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if components::toolbar_button(ui, egui_phosphor::regular::GEAR, "Settings") {
                            self.show_settings = true;
                        }
                        if components::toolbar_button(
                            ui,
                            egui_phosphor::regular::ARROW_CLOCKWISE,
                            "Reload",
                        ) {
                            self.reload(ctx);
                        }
                        if components::toolbar_button(
                            ui,
                            egui_phosphor::regular::FOLDER_OPEN,
                            "Open\u{2026}",
                        ) {
                            self.open_document_dialog(ctx);
                        }

                        if self.skipped_slices > 0 {
                            ui.add_space(theme::SPACING_MD);
                            let note = format!(
                                "{} slice{} skipped",
                                self.skipped_slices,
                                if self.skipped_slices == 1 { "" } else { "s" }
                            );
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(note)
                                        .size(theme::FONT_CAPTION)
                                        .color(theme::STATUS_WARNING),
                                )
                                .selectable(false),
                            )
                            .on_hover_text("Slice types without a registered renderer");
                        }
                    });
                });
            });
    }

    fn render_document(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE))
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());

                if let Some(error) = self.document_error.clone() {
                    components::empty_state(
                        ui,
                        egui_phosphor::regular::WARNING,
                        "Couldn't load document",
                        Some(&error),
                    );
                    ui.vertical_centered(|ui| {
                        ui.add_space(theme::SPACING_XL);
                        if ui
                            .add(theme::button(format!(
                                "{}  Try Again",
                                egui_phosphor::regular::ARROW_CLOCKWISE
                            )))
                            .clicked()
                        {
                            self.reload(ctx);
                        }
                    });
                    return;
                }

                if self.views.is_empty() {
                    components::empty_state(
                        ui,
                        egui_phosphor::regular::QUOTES,
                        "No renderable slices in this document",
                        Some("Open a document with testimonial slices to preview them"),
                    );
                    ui.vertical_centered(|ui| {
                        ui.add_space(theme::SPACING_XL);
                        if ui
                            .add(theme::button_accent(format!(
                                "{}  Open Document\u{2026}",
                                egui_phosphor::regular::FOLDER_OPEN
                            )))
                            .clicked()
                        {
                            self.open_document_dialog(ctx);
                        }
                    });
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add_space(theme::SLICE_GAP);

                        let views = self.views.clone();
                        for (idx, view) in views.iter().enumerate() {
                            let logo_tex = view
                                .logo
                                .as_ref()
                                .and_then(|f| f.url.clone())
                                .and_then(|url| self.load_image(ctx, &url));
                            let avatar_tex = view
                                .avatar
                                .as_ref()
                                .and_then(|f| f.url.clone())
                                .and_then(|url| self.load_image(ctx, &url));

                            ui.push_id(idx, |ui| {
                                ui.vertical_centered(|ui| {
                                    testimonial::show(
                                        ui,
                                        view,
                                        logo_tex.as_ref(),
                                        avatar_tex.as_ref(),
                                        self.show_slice_info,
                                    );
                                });
                            });
                            ui.add_space(theme::SLICE_GAP);
                        }
                    });
            });
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(320.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — View —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("View")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                if theme::settings_checkbox(ui, self.show_slice_info, "Show slice info", true) {
                    self.show_slice_info = !self.show_slice_info;
                    self.save_settings();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Cache —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Cache")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                ui.horizontal(|ui| {
                    if ui
                        .add(theme::button_danger(format!(
                            "{}  Clear Cache",
                            egui_phosphor::regular::TRASH
                        )))
                        .clicked()
                    {
                        self.clear_image_cache(ui.ctx());
                        self.show_toast("Image cache cleared".to_string());
                    }
                    if ui
                        .add(theme::button(format!(
                            "{}  Open Folder",
                            egui_phosphor::regular::FOLDER_OPEN
                        )))
                        .clicked()
                    {
                        std::fs::create_dir_all(&self.cache_dir).ok();
                        let _ = open::that(&self.cache_dir);
                    }
                });

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_CAPTION)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }

    // Toast notification (bottom-right of central panel, 3s visible then fade, pause on hover)
    fn render_toast(&mut self, ctx: &egui::Context) {
        if let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect)
        {
            let visible_duration = 3.0;
            let fade_duration = 0.5;
            let total_duration = visible_duration + fade_duration;
            let margin = 12.0;

            let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

            let response = egui::Area::new(egui::Id::new("toast"))
                .fixed_pos(toast_pos)
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .show(ctx, |ui| {
                    let elapsed = self
                        .toast_start
                        .map(|t| t.elapsed().as_secs_f32())
                        .unwrap_or(0.0);
                    let alpha = if elapsed > visible_duration {
                        (total_duration - elapsed) / fade_duration
                    } else {
                        1.0
                    };

                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(
                            0x1a,
                            0x1a,
                            0x1e,
                            (230.0 * alpha) as u8,
                        ))
                        .stroke(egui::Stroke::new(
                            1.0,
                            egui::Color32::from_rgba_unmultiplied(
                                theme::ACCENT.r(),
                                theme::ACCENT.g(),
                                theme::ACCENT.b(),
                                (100.0 * alpha) as u8,
                            ),
                        ))
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(msg).color(
                                egui::Color32::from_rgba_unmultiplied(
                                    255,
                                    255,
                                    255,
                                    (255.0 * alpha) as u8,
                                ),
                            ));
                        });
                });

            // Pause timer while hovering
            if response.response.hovered() {
                self.toast_start = Some(std::time::Instant::now());
            }

            let elapsed = self
                .toast_start
                .map(|t| t.elapsed().as_secs_f32())
                .unwrap_or(0.0);
            if elapsed >= total_duration {
                self.toast_message = None;
                self.toast_start = None;
            } else {
                ctx.request_repaint();
            }
        }
    }
}

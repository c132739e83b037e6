//! App module - application state and document handling

mod assets;

use crate::content;
use crate::settings::Settings;
use crate::theme;
use crate::types::SliceDocument;
use crate::ui::testimonial::{self, TestimonialView};
use crate::utils::get_cache_dir;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Document
    pub(crate) document: Option<SliceDocument>,
    pub(crate) document_path: Option<PathBuf>,
    pub(crate) document_error: Option<String>,
    /// Projected visual trees, one per renderable slice, in document order
    pub(crate) views: Vec<TestimonialView>,
    pub(crate) skipped_slices: usize,
    // Chrome
    pub(crate) show_settings: bool,
    pub(crate) show_slice_info: bool,
    pub(crate) mark_texture: Option<egui::TextureHandle>,
    // Image delivery
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) texture_cache: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) cache_dir: PathBuf,
    pub(crate) prefetch_token: Option<CancellationToken>,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & DOCUMENT HANDLING
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = get_cache_dir();
        std::fs::create_dir_all(&cache_dir).ok();

        let mut app = Self {
            document: None,
            document_path: None,
            document_error: None,
            views: Vec::new(),
            skipped_slices: 0,
            show_settings: false,
            show_slice_info: settings.show_slice_info,
            mark_texture: None,
            runtime: tokio::runtime::Runtime::new().unwrap(),
            texture_cache: HashMap::new(),
            cache_dir,
            prefetch_token: None,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        };

        // Restore the last document, falling back to the bundled sample
        match settings.document_path_buf() {
            Some(path) => app.load_document(&cc.egui_ctx, path, false),
            None => app.set_document(&cc.egui_ctx, content::sample_document(), None),
        }

        app
    }

    /// Load a document from disk. On failure the error replaces the
    /// document view; the last-known path is kept so Reload can retry.
    pub fn load_document(&mut self, ctx: &egui::Context, path: PathBuf, announce: bool) {
        match content::load_file(&path) {
            Ok(doc) => {
                self.document_error = None;
                self.set_document(ctx, doc, Some(path));
                if announce {
                    let count = self.views.len();
                    self.show_toast(format!(
                        "Loaded {} slice{}",
                        count,
                        if count == 1 { "" } else { "s" }
                    ));
                }
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to load document");
                self.document_error = Some(e.to_string());
                self.show_toast("Failed to load document".to_string());
            }
        }
    }

    /// Open a document via the native file dialog.
    pub fn open_document_dialog(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Slice document", &["json"])
            .pick_file()
        {
            self.load_document(ctx, path, true);
        }
    }

    /// Re-read the current document from disk (sample documents reload
    /// from the bundled copy).
    pub fn reload(&mut self, ctx: &egui::Context) {
        match self.document_path.clone() {
            Some(path) => self.load_document(ctx, path, true),
            None => {
                self.set_document(ctx, content::sample_document(), None);
                self.show_toast("Sample document reloaded".to_string());
            }
        }
    }

    fn set_document(&mut self, ctx: &egui::Context, doc: SliceDocument, path: Option<PathBuf>) {
        info!(
            slices = doc.slices.len(),
            path = %path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<sample>".into()),
            "Document set"
        );
        self.document_path = path;
        self.project(&doc);
        self.document = Some(doc);
        self.start_image_prefetch(ctx);
    }

    /// Project every renderable slice into its visual tree. Unknown slice
    /// types and undecodable payloads are skipped, not errors.
    fn project(&mut self, doc: &SliceDocument) {
        self.views.clear();
        self.skipped_slices = 0;

        for env in &doc.slices {
            if env.slice_type != testimonial::SLICE_TYPE {
                debug!(slice_type = %env.slice_type, "No renderer registered, skipping slice");
                self.skipped_slices += 1;
                continue;
            }
            match content::decode_testimonial(env) {
                Ok(slice) => self.views.push(testimonial::layout(&slice)),
                Err(e) => {
                    warn!(error = %e, "Undecodable testimonial payload, skipping slice");
                    self.skipped_slices += 1;
                }
            }
        }
    }

    pub fn show_toast(&mut self, message: String) {
        self.toast_message = Some(message);
        self.toast_start = Some(std::time::Instant::now());
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            document_path: self
                .document_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            show_slice_info: self.show_slice_info,
        };
        settings.save(&self.data_dir);
    }
}

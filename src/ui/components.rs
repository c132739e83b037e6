//! Reusable UI components
//!
//! Standalone widgets shared by the toolbar and the document view.

use crate::theme;
use eframe::egui;

/// Compact toolbar button with an icon prefix. Returns true if clicked.
pub fn toolbar_button(ui: &mut egui::Ui, icon: &str, label: &str) -> bool {
    let text = format!("{}  {}", icon, label);
    let galley = ui.painter().layout_no_wrap(
        text.clone(),
        egui::FontId::proportional(theme::FONT_LABEL),
        theme::TEXT_SECONDARY,
    );
    let size = egui::vec2(galley.size().x + 20.0, theme::BUTTON_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    if ui.is_rect_visible(rect) {
        let (fill, draw_rect) = theme::button_visual(&response, theme::BG_SURFACE, rect);
        ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            &text,
            egui::FontId::proportional(theme::FONT_LABEL),
            egui::Color32::WHITE,
        );
    }
    response.clicked()
}

/// Centered empty-state block: big icon, title, optional detail line.
pub fn empty_state(ui: &mut egui::Ui, icon: &str, title: &str, detail: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.add(
            egui::Label::new(egui::RichText::new(icon).size(48.0).color(theme::TEXT_DIM))
                .selectable(false),
        );
        ui.add_space(theme::SPACING_MD);
        ui.add(
            egui::Label::new(
                egui::RichText::new(title)
                    .size(theme::FONT_HEADING)
                    .color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
        if let Some(detail) = detail {
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(detail)
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        }
    });
}

//! Testimonial slice renderer
//!
//! Maps one testimonial payload onto a fixed card layout: logo, block
//! quotation, circular avatar, author identity. `layout` is a pure
//! projection from the payload to a flat visual tree; `show` paints that
//! tree. The renderer is total — absent fields become empty regions,
//! never errors — and holds no state between invocations.

use crate::theme;
use crate::types::{BlockKind, ImageField, TestimonialSlice};
use eframe::egui;

/// The `slice_type` this renderer is registered for.
pub const SLICE_TYPE: &str = "testimonial";

/// Flattened visual tree for one testimonial slice.
#[derive(Debug, Clone)]
pub struct TestimonialView {
    /// Root-node debug attribute, verbatim from the payload
    pub slice_type: String,
    /// Root-node debug attribute, verbatim from the payload
    pub variation: String,
    pub logo: Option<ImageField>,
    pub quote: Vec<QuoteSegment>,
    pub avatar: Option<ImageField>,
    pub author_name: String,
    /// Pre-composed `<position>, <company>` line; the separator is always
    /// present, even when both fields are empty
    pub author_line: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteSegment {
    /// Paragraph block, already wrapped in curly-quote glyphs
    Quoted(String),
    /// Non-paragraph block, rendered with its default presentation
    Plain { kind: BlockKind, text: String },
}

/// Project a testimonial payload into its visual tree.
pub fn layout(slice: &TestimonialSlice) -> TestimonialView {
    let primary = &slice.primary;

    let quote = primary
        .quote
        .blocks
        .iter()
        .map(|block| match block.kind {
            BlockKind::Paragraph => {
                QuoteSegment::Quoted(format!("\u{201c}{}\u{201d}", block.text))
            }
            kind => QuoteSegment::Plain {
                kind,
                text: block.text.clone(),
            },
        })
        .collect();

    TestimonialView {
        slice_type: slice.slice_type.clone(),
        variation: slice.variation.clone(),
        logo: (!primary.logo.is_empty()).then(|| primary.logo.clone()),
        quote,
        avatar: (!primary.avatar.is_empty()).then(|| primary.avatar.clone()),
        author_name: primary.author_name.clone(),
        author_line: format!("{}, {}", primary.author_position, primary.author_company),
    }
}

/// Paint a projected testimonial. Image textures are resolved by the
/// caller; a referenced image whose bytes have not arrived yet paints as
/// a neutral placeholder of the declared size.
pub fn show(
    ui: &mut egui::Ui,
    view: &TestimonialView,
    logo_tex: Option<&egui::TextureHandle>,
    avatar_tex: Option<&egui::TextureHandle>,
    show_info: bool,
) {
    ui.push_id((&view.slice_type, &view.variation), |ui| {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(theme::SLICE_COLUMN_WIDTH.min(ui.available_width()));
            ui.vertical_centered(|ui| {
                if let Some(logo) = &view.logo {
                    show_logo(ui, logo, logo_tex);
                    ui.add_space(theme::SPACING_XL);
                }

                for segment in &view.quote {
                    show_segment(ui, segment);
                    ui.add_space(theme::SPACING_SM);
                }

                ui.add_space(theme::SPACING_LG);

                if let Some(avatar) = &view.avatar {
                    show_avatar(ui, avatar, avatar_tex);
                    ui.add_space(theme::SPACING_MD);
                }

                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&view.author_name)
                            .size(theme::FONT_BODY)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&view.author_line)
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
            });
        });

        if show_info {
            ui.add_space(2.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("{} \u{2022} {}", view.slice_type, view.variation))
                        .size(theme::FONT_CAPTION)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        }
    });
}

fn show_segment(ui: &mut egui::Ui, segment: &QuoteSegment) {
    match segment {
        QuoteSegment::Quoted(text) => {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(text)
                        .size(theme::FONT_QUOTE)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                )
                .selectable(false),
            );
        }
        QuoteSegment::Plain { kind, text } => {
            let rich = if kind.is_heading() {
                egui::RichText::new(text)
                    .size(theme::FONT_HEADING)
                    .strong()
                    .color(theme::TEXT_SECONDARY)
            } else {
                match kind {
                    BlockKind::ListItem | BlockKind::OListItem => {
                        egui::RichText::new(format!("\u{2022} {text}"))
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_SECONDARY)
                    }
                    BlockKind::Preformatted => egui::RichText::new(text)
                        .monospace()
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_SECONDARY),
                    _ => egui::RichText::new(text)
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_SECONDARY),
                }
            };
            ui.add(egui::Label::new(rich).selectable(false));
        }
    }
}

fn show_logo(ui: &mut egui::Ui, field: &ImageField, tex: Option<&egui::TextureHandle>) {
    match tex {
        Some(tex) => {
            let [w, h] = tex.size();
            let scale = (theme::LOGO_MAX_HEIGHT / h.max(1) as f32).min(1.0);
            let size = egui::vec2(w as f32 * scale, h as f32 * scale);
            let response = ui.image(egui::load::SizedTexture::new(tex.id(), size));
            if let Some(alt) = &field.alt {
                response.on_hover_text(alt);
            }
        }
        None => {
            let (rect, _) =
                ui.allocate_exact_size(placeholder_size(field), egui::Sense::hover());
            if ui.is_rect_visible(rect) {
                ui.painter()
                    .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_ELEVATED);
            }
        }
    }
}

fn show_avatar(ui: &mut egui::Ui, field: &ImageField, tex: Option<&egui::TextureHandle>) {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(theme::AVATAR_SIZE, theme::AVATAR_SIZE),
        egui::Sense::hover(),
    );
    if !ui.is_rect_visible(rect) {
        return;
    }
    let radius = egui::CornerRadius::same((theme::AVATAR_SIZE / 2.0) as u8);

    match tex {
        Some(tex) => {
            // Textured RectShape clips the image to the circle; uv picks the
            // central square so the crop is cover-fit
            let brush = egui::epaint::Brush {
                fill_texture_id: tex.id(),
                uv: cover_crop_uv(tex.size()),
            };
            let mut shape = egui::epaint::RectShape::filled(rect, radius, egui::Color32::WHITE);
            shape.brush = Some(std::sync::Arc::new(brush));
            ui.painter().add(shape);
            if let Some(alt) = &field.alt {
                response.on_hover_text(alt);
            }
        }
        None => {
            ui.painter().rect_filled(rect, radius, theme::BG_ELEVATED);
        }
    }
}

/// Central-square uv rect for a cover-fit crop of a texture into a square.
fn cover_crop_uv(size: [usize; 2]) -> egui::Rect {
    let (w, h) = (size[0] as f32, size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    if w > h {
        let margin = (1.0 - h / w) / 2.0;
        egui::Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
    } else {
        let margin = (1.0 - w / h) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
    }
}

/// Declared-size placeholder while image bytes are in flight.
fn placeholder_size(field: &ImageField) -> egui::Vec2 {
    match field.dimensions {
        Some(d) if d.height > 0 => {
            let scale = (theme::LOGO_MAX_HEIGHT / d.height as f32).min(1.0);
            egui::vec2(d.width as f32 * scale, d.height as f32 * scale)
        }
        _ => egui::vec2(theme::LOGO_MAX_HEIGHT * 2.0, theme::LOGO_MAX_HEIGHT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slice(value: serde_json::Value) -> TestimonialSlice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_payload_projects_to_empty_regions() {
        let view = layout(&slice(json!({ "slice_type": "testimonial" })));
        assert!(view.logo.is_none());
        assert!(view.avatar.is_none());
        assert!(view.quote.is_empty());
        assert_eq!(view.author_name, "");
        assert_eq!(view.author_line, ", ");
    }

    #[test]
    fn empty_image_object_yields_no_region() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": { "logo": {}, "avatar": { "url": "" } },
        })));
        assert!(view.logo.is_none());
        assert!(view.avatar.is_none());
    }

    #[test]
    fn present_images_stay_bound_to_their_reference() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": {
                "logo": { "url": "https://cdn.example/logo.png" },
                "avatar": { "url": "https://cdn.example/jane.jpg", "alt": "Jane" },
            },
        })));
        assert_eq!(
            view.logo.unwrap().url.as_deref(),
            Some("https://cdn.example/logo.png")
        );
        let avatar = view.avatar.unwrap();
        assert_eq!(avatar.url.as_deref(), Some("https://cdn.example/jane.jpg"));
        assert_eq!(avatar.alt.as_deref(), Some("Jane"));
    }

    #[test]
    fn each_paragraph_is_wrapped_in_curly_quotes() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": {
                "quote": [
                    { "type": "paragraph", "text": "First." },
                    { "type": "paragraph", "text": "Second." },
                    { "type": "paragraph", "text": "Third." },
                ],
            },
        })));
        assert_eq!(
            view.quote,
            vec![
                QuoteSegment::Quoted("\u{201c}First.\u{201d}".into()),
                QuoteSegment::Quoted("\u{201c}Second.\u{201d}".into()),
                QuoteSegment::Quoted("\u{201c}Third.\u{201d}".into()),
            ]
        );
    }

    #[test]
    fn non_paragraph_blocks_are_not_wrapped() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": {
                "quote": [
                    { "type": "heading3", "text": "A year in" },
                    { "type": "paragraph", "text": "Great." },
                    { "type": "list-item", "text": "fast" },
                ],
            },
        })));
        assert_eq!(
            view.quote,
            vec![
                QuoteSegment::Plain { kind: BlockKind::Heading3, text: "A year in".into() },
                QuoteSegment::Quoted("\u{201c}Great.\u{201d}".into()),
                QuoteSegment::Plain { kind: BlockKind::ListItem, text: "fast".into() },
            ]
        );
    }

    #[test]
    fn zero_block_quote_renders_an_empty_quotation_region() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": { "quote": [] },
        })));
        assert!(view.quote.is_empty());
    }

    #[test]
    fn author_line_always_keeps_the_separator() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": { "author_position": "CEO", "author_company": "Acme" },
        })));
        assert_eq!(view.author_line, "CEO, Acme");

        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": { "author_position": "", "author_company": "" },
        })));
        assert_eq!(view.author_line, ", ");

        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "primary": { "author_company": "Acme" },
        })));
        assert_eq!(view.author_line, ", Acme");
    }

    #[test]
    fn debug_attributes_carry_verbatim() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "variation": "withDarkBackground",
        })));
        assert_eq!(view.slice_type, "testimonial");
        assert_eq!(view.variation, "withDarkBackground");
    }

    #[test]
    fn worked_example() {
        let view = layout(&slice(json!({
            "slice_type": "testimonial",
            "variation": "default",
            "primary": {
                "logo": {},
                "quote": [{ "type": "paragraph", "text": "Great product" }],
                "avatar": { "url": "https://cdn.example/jane.jpg" },
                "author_name": "Jane Doe",
                "author_position": "CEO",
                "author_company": "Acme",
            },
        })));

        assert!(view.logo.is_none());
        assert_eq!(
            view.quote,
            vec![QuoteSegment::Quoted("\u{201c}Great product\u{201d}".into())]
        );
        assert!(view.avatar.is_some());
        assert_eq!(view.author_name, "Jane Doe");
        assert_eq!(view.author_line, "CEO, Acme");
        assert_eq!(view.slice_type, "testimonial");
        assert_eq!(view.variation, "default");
    }

    #[test]
    fn cover_crop_centers_the_shorter_axis() {
        let uv = cover_crop_uv([200, 100]);
        assert!((uv.min.x - 0.25).abs() < f32::EPSILON);
        assert!((uv.max.x - 0.75).abs() < f32::EPSILON);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);

        let uv = cover_crop_uv([128, 128]);
        assert_eq!(uv, egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)));
    }
}

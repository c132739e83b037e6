//! Utility functions

use crate::constants::DATA_DIR_NAME;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

// Quote-mark glyph on a rounded tile — for the window/taskbar icon
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 96 96"><rect width="96" height="96" rx="20" fill="#818cf8"/><path fill="#fff" d="M43 30c-12 3-20 12-20 24 0 8 5 14 12 14s12-5 12-12-5-11-11-11c-1 0-2 0-3 .4 2-5 6-8 12-10l-2-5.4z"/><path fill="#fff" d="M75 30c-12 3-20 12-20 24 0 8 5 14 12 14s12-5 12-12-5-11-11-11c-1 0-2 0-3 .4 2-5 6-8 12-10L75 30z"/></svg>"##;

// Glyph only, accent-tinted — for the toolbar wordmark
pub const MARK_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 48"><path fill="#818cf8" d="M26 2C12 5 3 15 3 29c0 10 6 17 14 17s14-6 14-14-6-13-13-13c-1 0-2 0-3 .5C17 13 22 9 29 7L26 2z"/><path fill="#818cf8" d="M60 2C46 5 37 15 37 29c0 10 6 17 14 17s14-6 14-14-6-13-13-13c-1 0-2 0-3 .5C51 13 56 9 63 7L60 2z"/></svg>"##;

/// Rasterize the toolbar mark at the given width, preserving aspect ratio.
pub fn rasterize_mark(width: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(MARK_SVG, &resvg::usvg::Options::default()).unwrap();
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), width, height)
}

/// Rasterize the icon SVG to a square image (for window/taskbar icons).
pub fn rasterize_icon_square(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the image cache directory path
pub fn get_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join("cache")
}

/// Filename-safe cache key for an image URL.
pub fn url_cache_key(url: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    url.hash(&mut hasher);
    format!("{:016x}.img", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_stable_and_distinct() {
        let a = url_cache_key("https://cdn.example/a.png");
        let b = url_cache_key("https://cdn.example/b.png");
        assert_eq!(a, url_cache_key("https://cdn.example/a.png"));
        assert_ne!(a, b);
    }

    #[test]
    fn cache_keys_are_filename_safe() {
        let key = url_cache_key("https://cdn.example/x.png?w=640&h=480#frag");
        assert!(key.ends_with(".img"));
        assert!(key
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '.' || c == 'i' || c == 'm' || c == 'g'));
    }
}

//! Image delivery: prefetch, disk cache and texture loading
//!
//! The renderers never see this layer. They receive already-resolved
//! textures, and a reference whose bytes are still in flight simply
//! resolves to None.

use super::App;
use crate::constants::PREFETCH_CONCURRENCY;
use crate::utils::url_cache_key;
use eframe::egui;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

impl App {
    /// Every distinct image URL the current document references, in paint order.
    fn image_urls(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.views
            .iter()
            .flat_map(|v| [v.logo.as_ref(), v.avatar.as_ref()])
            .flatten()
            .filter_map(|field| field.url.clone())
            .filter(|url| !url.is_empty() && seen.insert(url.clone()))
            .collect()
    }

    /// Fetch every referenced image into the disk cache. A new document
    /// cancels whatever the previous one still had in flight.
    pub fn start_image_prefetch(&mut self, ctx: &egui::Context) {
        if let Some(token) = self.prefetch_token.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.prefetch_token = Some(token.clone());

        let urls = self.image_urls();
        let cache_dir = self.cache_dir.clone();
        let ctx_clone = ctx.clone();

        debug!(count = urls.len(), "Starting image prefetch");

        self.runtime.spawn(async move {
            let client = reqwest::Client::new();
            let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(PREFETCH_CONCURRENCY));

            std::fs::create_dir_all(&cache_dir).ok();

            let mut handles = vec![];

            for url in urls {
                let cache_path = cache_dir.join(url_cache_key(&url));
                if cache_path.exists() {
                    continue;
                }

                let sem = semaphore.clone();
                let client = client.clone();
                let ctx = ctx_clone.clone();
                let token = token.clone();

                let handle = tokio::spawn(async move {
                    let _permit = sem.acquire().await.ok();
                    let response = tokio::select! {
                        _ = token.cancelled() => return,
                        r = client.get(&url).send() => r,
                    };
                    match response {
                        Ok(response) if response.status().is_success() => {
                            if let Ok(bytes) = response.bytes().await {
                                std::fs::write(&cache_path, &bytes).ok();
                                ctx.request_repaint();
                            }
                        }
                        Ok(response) => {
                            warn!(url = %url, status = %response.status(), "Image fetch failed");
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "Image fetch failed");
                        }
                    }
                });
                handles.push(handle);
            }

            for handle in handles {
                handle.await.ok();
            }
        });
    }

    /// Resolve an image URL to a texture: memory cache first, then the
    /// disk cache. Returns None while the fetch is still in flight.
    pub fn load_image(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.texture_cache.get(url) {
            return cached.clone();
        }

        let cache_path = self.cache_dir.join(url_cache_key(url));
        if cache_path.exists() {
            let texture = std::fs::read(&cache_path)
                .ok()
                .and_then(|bytes| image::load_from_memory(&bytes).ok())
                .map(|img| {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let pixels = rgba.into_raw();
                    ctx.load_texture(
                        url,
                        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                        egui::TextureOptions::LINEAR,
                    )
                });
            if texture.is_none() {
                warn!(url = %url, "Cached image failed to decode");
            }
            self.texture_cache.insert(url.to_string(), texture.clone());
            return texture;
        }

        None
    }

    /// Drop the disk cache and all loaded textures, then refetch what the
    /// current document needs.
    pub fn clear_image_cache(&mut self, ctx: &egui::Context) {
        let _ = std::fs::remove_dir_all(&self.cache_dir);
        std::fs::create_dir_all(&self.cache_dir).ok();
        self.texture_cache.clear();
        self.start_image_prefetch(ctx);
    }
}

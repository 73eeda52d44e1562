//! Lazily populated map from tile IDs to textures.

use std::collections::HashMap;

use crate::backend::{TextureId, TextureLoader};

/// Assets tried in order when a tile has no texture of its own.
pub const FALLBACK_ASSETS: [&str; 2] = ["wood.jpg", "android_robot.png"];

/// Asset path of a tile ID, if the tile set has one.
pub fn tile_asset_path(tile_id: i32) -> Option<&'static str> {
    match tile_id {
        1 => Some("deserttileset/Tile/1.png"),
        2 => Some("deserttileset/Tile/2.png"),
        3 => Some("deserttileset/Tile/3.png"),
        5 => Some("deserttileset/Tile/5.png"),
        7 => Some("deserttileset/Tile/7.png"),
        _ => None,
    }
}

/// Owns every texture it loads. Entries are never evicted, so a tile ID keeps
/// resolving to the same handle for the cache's lifetime.
#[derive(Debug, Default)]
pub struct TileTextureCache {
    cache: HashMap<i32, TextureId>,
    fallback: Option<TextureId>,
}

impl TileTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `tile_id`, loading its texture on first use.
    ///
    /// Unknown IDs and failed loads resolve to the shared fallback texture.
    /// `None` means nothing can be drawn: the loader has no assets, or the
    /// fallback failed as well.
    pub fn texture_id<L: TextureLoader + ?Sized>(
        &mut self,
        tile_id: i32,
        loader: &mut L,
    ) -> Option<TextureId> {
        if !loader.assets_available() {
            return None;
        }
        if let Some(&texture) = self.cache.get(&tile_id) {
            return Some(texture);
        }
        if let Some(path) = tile_asset_path(tile_id) {
            match loader.load_texture(path) {
                Ok(texture) => {
                    self.cache.insert(tile_id, texture);
                    return Some(texture);
                }
                Err(e) => log::warn!("Tile {} ({}) failed to load: {:#}", tile_id, path, e),
            }
        }
        self.fallback(loader)
    }

    fn fallback<L: TextureLoader + ?Sized>(&mut self, loader: &mut L) -> Option<TextureId> {
        if self.fallback.is_none() {
            self.fallback = FALLBACK_ASSETS.iter().find_map(|name| {
                loader
                    .load_texture(name)
                    .inspect_err(|e| log::warn!("Fallback texture {} failed to load: {:#}", name, e))
                    .ok()
            });
        }
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Deletes every texture this cache loaded.
    pub fn release<L: TextureLoader + ?Sized>(&mut self, loader: &mut L) {
        for (_, texture) in self.cache.drain() {
            loader.delete_texture(texture);
        }
        if let Some(texture) = self.fallback.take() {
            loader.delete_texture(texture);
        }
    }
}

//! Loading of external files: images, level text and the overlay label.
//!
//! Every path is resolved against an [`AssetDir`], which replaces the fixed
//! `./assets` root so tests and the binary can point anywhere.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub mod texture;

/// Default asset root, relative to the working directory.
pub const DEFAULT_ASSET_ROOT: &str = "assets";

/// Root directory that asset names are relative to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDir {
    root: PathBuf,
}

impl Default for AssetDir {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_ROOT)
    }
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The copy of `assets/` made by the build script, if there was one.
    pub fn bundled() -> Option<Self> {
        option_env!("GENESIS_BUNDLED_ASSETS")
            .map(Self::new)
            .filter(Self::exists)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `false` if the root is not an existing directory.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn load_binary(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path(file_name);
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_under_the_root() {
        let assets = AssetDir::new("/data/genesis");
        assert_eq!(
            assets.path("deserttileset/Tile/1.png"),
            PathBuf::from("/data/genesis/deserttileset/Tile/1.png")
        );
        assert_eq!(AssetDir::default().root(), Path::new(DEFAULT_ASSET_ROOT));
    }

    #[test]
    fn missing_files_name_the_path() {
        let assets = AssetDir::new("/definitely/not/here");
        assert!(!assets.exists());
        let err = assets.load_binary("wood.jpg").unwrap_err();
        assert!(format!("{:#}", err).contains("wood.jpg"));
    }
}

//! Run configuration, read from the environment.
//!
//! | variable          | meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `GENESIS_EXAMPLE` | example index, 0 is the base scene        |
//! | `GENESIS_SCENE`   | level scene index, wins over the example  |
//! | `GENESIS_ASSETS`  | asset root, default `assets`              |
//! | `GENESIS_LEVEL`   | level file for the tile scene             |
//! | `GENESIS_LABEL`   | back button label image, under the assets |
//! | `RUST_LOG`        | log filter                                |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    logging::LoggingConfig,
    platform::{BASE_EXAMPLE, Selection},
    resources::{AssetDir, DEFAULT_ASSET_ROOT},
    scene::recipes,
};

pub const EXAMPLE_VAR: &str = "GENESIS_EXAMPLE";
pub const SCENE_VAR: &str = "GENESIS_SCENE";
pub const ASSETS_VAR: &str = "GENESIS_ASSETS";
pub const LEVEL_VAR: &str = "GENESIS_LEVEL";
pub const LABEL_VAR: &str = "GENESIS_LABEL";
pub const LOG_VAR: &str = "RUST_LOG";

pub const DEFAULT_LABEL: &str = "back_menu.png";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub selection: Selection,
    pub asset_root: PathBuf,
    pub level_file: Option<PathBuf>,
    pub label_image: String,
    pub log_filter: Option<String>,
    pub window_size: (u32, u32),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            selection: Selection::example(BASE_EXAMPLE),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            level_file: None,
            label_image: DEFAULT_LABEL.to_string(),
            log_filter: None,
            window_size: (800, 600),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(example) = get(EXAMPLE_VAR) {
            config.selection = Selection::example(parse_index(EXAMPLE_VAR, &example)?);
        }
        if let Some(scene) = get(SCENE_VAR) {
            config.selection = Selection::scene(parse_index(SCENE_VAR, &scene)?);
        }
        if let Some(root) = get(ASSETS_VAR) {
            config.asset_root = PathBuf::from(root);
        }
        config.level_file = get(LEVEL_VAR).map(PathBuf::from);
        if let Some(label) = get(LABEL_VAR) {
            config.label_image = label;
        }
        config.log_filter = get(LOG_VAR);
        Ok(config)
    }

    /// The configured asset root. An unset root that does not exist in the
    /// working directory falls back to the assets bundled at build time.
    pub fn assets(&self) -> AssetDir {
        let assets = AssetDir::new(&self.asset_root);
        if assets.exists() || self.asset_root != Path::new(DEFAULT_ASSET_ROOT) {
            return assets;
        }
        AssetDir::bundled().unwrap_or(assets)
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..Default::default()
        }
    }

    pub fn window_title(&self) -> String {
        let scene = self.selection.scene_index();
        let title = if scene >= 0 {
            recipes::scene_title(scene)
        } else {
            recipes::example_title(self.selection.example_index())
        };
        format!("Genesis V - {}", title)
    }
}

fn parse_index(key: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be an integer, got {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_the_base_scene() {
        let config = config(&[]).unwrap();
        assert_eq!(config.selection, Selection::example(0));
        assert_eq!(config.asset_root, PathBuf::from("assets"));
        assert_eq!(config.label_image, "back_menu.png");
        assert!(config.level_file.is_none());
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn scene_wins_over_example() {
        let config = config(&[(EXAMPLE_VAR, "7"), (SCENE_VAR, "0")]).unwrap();
        assert_eq!(config.selection.scene_index(), 0);
        assert_eq!(config.selection.example_index(), 0);
    }

    #[test]
    fn malformed_index_is_an_error() {
        let err = config(&[(EXAMPLE_VAR, "seven")]).unwrap_err();
        assert!(err.to_string().contains(EXAMPLE_VAR));
    }

    #[test]
    fn paths_and_filters_are_taken_verbatim() {
        let config = config(&[
            (EXAMPLE_VAR, " 12 "),
            (ASSETS_VAR, "/opt/genesis"),
            (LEVEL_VAR, "levels/one.txt"),
            (LOG_VAR, "debug"),
            (LABEL_VAR, ""),
        ])
        .unwrap();
        assert_eq!(config.selection, Selection::example(12));
        assert_eq!(config.assets().path("wood.jpg"), PathBuf::from("/opt/genesis/wood.jpg"));
        assert_eq!(config.level_file, Some(PathBuf::from("levels/one.txt")));
        assert_eq!(config.logging().env_filter.as_deref(), Some("debug"));
        assert_eq!(config.label_image, DEFAULT_LABEL);
        assert_eq!(config.window_title(), "Genesis V - 012: Wood cube and grass pyramid");
    }
}

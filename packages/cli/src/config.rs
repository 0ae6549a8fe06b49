use serde::{Deserialize, Serialize};
use sitecraft_editor::EditorConfig;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "sitecraft.config.json";

/// Sitecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Session settings shared with the browser editor
    #[serde(default)]
    pub editor: EditorConfig,

    /// Directory holding autosave records
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Where `sitecraft export` writes the page
    #[serde(default = "default_out_file")]
    pub out_file: String,
}

fn default_store_dir() -> String {
    ".sitecraft".to_string()
}

fn default_out_file() -> String {
    "index.html".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    pub fn get_out_file(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            store_dir: default_store_dir(),
            out_file: default_out_file(),
        }
    }
}

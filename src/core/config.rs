use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Content root: an http(s) base URL or a local directory.
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_index_file")]
    pub index_file: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_initial_book")]
    pub initial_book: String,

    /// Sidebar entries. Empty means "derive from the catalog".
    #[serde(default)]
    pub books: Vec<BookEntry>,

    #[serde(default = "default_render_delay_ms")]
    pub render_delay_ms: u64,

    #[serde(default = "default_start_fade_ms")]
    pub start_fade_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl BookEntry {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

fn default_source() -> String {
    ".".to_string()
}
fn default_index_file() -> String {
    "book_index.json".to_string()
}
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_initial_book() -> String {
    "TMGD".to_string()
}
fn default_render_delay_ms() -> u64 {
    300
}
fn default_start_fade_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            index_file: default_index_file(),
            data_dir: default_data_dir(),
            initial_book: default_initial_book(),
            books: Vec::new(),
            render_delay_ms: default_render_delay_ms(),
            start_fade_ms: default_start_fade_ms(),
        }
    }
}

impl Config {
    /// Load a YAML config, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Like `load_from`, but writes the defaults to `path` when it is missing
    /// so there is a file to edit on the next run.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        log::info!("Wrote default settings to {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }

    pub fn start_fade(&self) -> Duration {
        Duration::from_millis(self.start_fade_ms)
    }

    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

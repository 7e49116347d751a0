use crate::core::config::Config;

/// Derives every resource path from a `(book, character)` pair. Paths are
/// relative to the content root handed to the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLayout {
    index_file: String,
    data_dir: String,
}

impl ContentLayout {
    pub fn new(index_file: impl Into<String>, data_dir: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
            data_dir: data_dir.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.index_file.clone(), config.data_dir.clone())
    }

    pub fn index_path(&self) -> &str {
        &self.index_file
    }

    pub fn record_path(&self, book: &str, character: &str) -> String {
        format!("{}/{}/{}.json", self.data_dir, book, character)
    }

    pub fn icon_path(&self, book: &str, character: &str) -> String {
        format!("{}/{}/{}.png", self.data_dir, book, character)
    }

    pub fn portrait_path(&self, book: &str, image_large: &str) -> String {
        format!("{}/{}/{}", self.data_dir, book, image_large)
    }
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Book id -> ordered character ids, exactly as stored in `book_index.json`.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct CatalogIndex {
    books: HashMap<String, Vec<String>>,
}

impl CatalogIndex {
    pub fn new(books: HashMap<String, Vec<String>>) -> Self {
        Self { books }
    }

    /// Characters listed for `book`. Unknown books yield an empty slice.
    pub fn characters(&self, book: &str) -> &[String] {
        self.books.get(book).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn book_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.books.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for CatalogIndex {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(map.into_iter().collect())
    }
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct CharacterRecord {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "vc", default)]
    pub voice_credit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quote: String,
    /// Portrait filename, relative to the book's data directory.
    #[serde(rename = "image_large", default)]
    pub image_large: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub book: String,
    pub character: String,
}

impl CacheKey {
    pub fn new(book: &str, character: &str) -> Self {
        Self {
            book: book.to_string(),
            character: character.to_string(),
        }
    }
}

/// Icon caption: the id with its first letter upper-cased.
pub fn display_name(character: &str) -> String {
    let mut chars = character.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

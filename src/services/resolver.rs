use crate::core::error::BrowserError;
use crate::core::io::{fetch_json, Fetcher};
use crate::core::layout::ContentLayout;
use crate::core::state::{CacheKey, CharacterRecord};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Resolves `(book, character)` pairs to records, fetching each pair at most
/// once. Entries are never evicted or replaced.
pub struct CharacterResolver {
    fetcher: Arc<dyn Fetcher>,
    layout: ContentLayout,
    cache: Mutex<HashMap<CacheKey, Arc<CharacterRecord>>>,
}

impl CharacterResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, layout: ContentLayout) -> Self {
        Self {
            fetcher,
            layout,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<CharacterRecord>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cached(&self, book: &str, character: &str) -> Option<Arc<CharacterRecord>> {
        self.cache().get(&CacheKey::new(book, character)).cloned()
    }

    pub fn cached_len(&self) -> usize {
        self.cache().len()
    }

    pub async fn resolve(
        &self,
        book: &str,
        character: &str,
    ) -> Result<Arc<CharacterRecord>, BrowserError> {
        if let Some(record) = self.cached(book, character) {
            debug!("Cache hit for {}/{}", book, character);
            return Ok(record);
        }

        let path = self.layout.record_path(book, character);
        debug!("Cache miss for {}/{}, fetching {}", book, character, path);
        let record: CharacterRecord = fetch_json(self.fetcher.as_ref(), &path)
            .await
            .map_err(|source| BrowserError::CharacterLoad {
                book: book.to_string(),
                character: character.to_string(),
                source,
            })?;

        // A concurrent miss may have landed first; keep whichever was stored first.
        let stored = self
            .cache()
            .entry(CacheKey::new(book, character))
            .or_insert_with(|| Arc::new(record))
            .clone();
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::tests::MockFetcher;
    use anyhow::Result;

    const ALICE: &str = r#"{"name": "Alice", "vc": "Jane Doe", "description": "Lead.", "quote": "Hello.", "image_large": "alice_large.png"}"#;

    fn resolver_with(fetcher: Arc<MockFetcher>) -> CharacterResolver {
        CharacterResolver::new(fetcher, ContentLayout::default())
    }

    #[tokio::test]
    async fn test_second_resolve_is_cache_hit() -> Result<()> {
        let fetcher = Arc::new(MockFetcher::new(&[("data/TMGD/alice.json", ALICE)]));
        let resolver = resolver_with(fetcher.clone());

        let first = resolver.resolve("TMGD", "alice").await?;
        let second = resolver.resolve("TMGD", "alice").await?;

        assert_eq!(first.name, "Alice");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.request_count("data/TMGD/alice.json"), 1);
        assert_eq!(resolver.cached_len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_key_includes_book() -> Result<()> {
        let fetcher = Arc::new(MockFetcher::new(&[
            ("data/TMGD/alice.json", ALICE),
            ("data/SIDE/alice.json", r#"{"name": "Other Alice"}"#),
        ]));
        let resolver = resolver_with(fetcher.clone());

        assert_eq!(resolver.resolve("TMGD", "alice").await?.name, "Alice");
        assert_eq!(resolver.resolve("SIDE", "alice").await?.name, "Other Alice");
        assert_eq!(fetcher.total_requests(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_resolve_is_not_cached() {
        let fetcher = Arc::new(MockFetcher::new(&[]));
        let resolver = resolver_with(fetcher.clone());

        for _ in 0..2 {
            let result = resolver.resolve("TMGD", "ghost").await;
            match result {
                Err(BrowserError::CharacterLoad { book, character, .. }) => {
                    assert_eq!(book, "TMGD");
                    assert_eq!(character, "ghost");
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }

        assert!(resolver.cached("TMGD", "ghost").is_none());
        assert_eq!(fetcher.request_count("data/TMGD/ghost.json"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_keep_first_record() -> Result<()> {
        let fetcher = Arc::new(MockFetcher::new(&[("data/TMGD/alice.json", ALICE)]));
        let resolver = resolver_with(fetcher);

        let (a, b) = futures_util::join!(
            resolver.resolve("TMGD", "alice"),
            resolver.resolve("TMGD", "alice")
        );
        assert!(Arc::ptr_eq(&a?, &b?));
        assert_eq!(resolver.cached_len(), 1);
        Ok(())
    }
}

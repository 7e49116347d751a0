use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Could not load book index")]
    CatalogLoad(#[source] anyhow::Error),

    #[error("Failed to load data for {character} ({book})")]
    CharacterLoad {
        book: String,
        character: String,
        #[source]
        source: anyhow::Error,
    },
}

use crate::core::error::BrowserError;
use crate::core::io::{fetch_json, Fetcher};
use crate::core::layout::ContentLayout;
use crate::core::state::CatalogIndex;
use log::info;

/// Fetch and parse the book index. Callers decide what an error means for the
/// UI; this function only performs the single fetch.
pub async fn load_catalog(
    fetcher: &dyn Fetcher,
    layout: &ContentLayout,
) -> Result<CatalogIndex, BrowserError> {
    let catalog: CatalogIndex = fetch_json(fetcher, layout.index_path())
        .await
        .map_err(BrowserError::CatalogLoad)?;
    info!("Book index loaded successfully.");
    Ok(catalog)
}

use crate::core::config::Config;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

#[cfg(target_arch = "wasm32")]
pub trait FetcherBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> FetcherBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait FetcherBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> FetcherBounds for T {}

/// Read-only access to the static content tree. `path` is always relative to
/// the content root (e.g. `data/TMGD/alice.json`).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Fetcher: FetcherBounds {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>>;

    /// Human readable location of the content root, for logs.
    fn describe(&self) -> String;
}

pub async fn fetch_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, path: &str) -> Result<T> {
    let bytes = fetcher.fetch(path).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path))
}

pub fn create_fetcher(config: &Config) -> Result<Arc<dyn Fetcher>> {
    if config.is_remote() {
        return Ok(Arc::new(HttpFetcher::new(&config.source)?));
    }

    local_fetcher(&config.source)
}

#[cfg(not(target_arch = "wasm32"))]
fn local_fetcher(source: &str) -> Result<Arc<dyn Fetcher>> {
    Ok(Arc::new(DirFetcher::new(source)))
}

/// On the web a relative source is resolved against the page location.
#[cfg(target_arch = "wasm32")]
fn local_fetcher(source: &str) -> Result<Arc<dyn Fetcher>> {
    let page = web_sys::window()
        .ok_or_else(|| anyhow!("No window available"))?
        .location()
        .href()
        .map_err(|e| anyhow!("Failed to read page location: {:?}", e))?;
    let base = Url::parse(&page)?
        .join(&with_trailing_slash(source))
        .context("Invalid content source")?;
    Ok(Arc::new(HttpFetcher::from_url(base)))
}

fn with_trailing_slash(s: &str) -> String {
    if s.ends_with('/') {
        s.to_string()
    } else {
        format!("{}/", s)
    }
}

// --- HTTP Implementation ---

pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(&with_trailing_slash(base))
            .with_context(|| format!("Invalid base URL: {}", base))?;
        Ok(Self::from_url(base))
    }

    pub fn from_url(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid resource path: {}", path))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP error! status: {}", status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

// --- Local Directory Implementation ---

#[cfg(not(target_arch = "wasm32"))]
pub struct DirFetcher {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirFetcher {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        tokio::fs::read(&full)
            .await
            .with_context(|| format!("Failed to read {}", full.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use character_codex::core::config::{Config, CONFIG_FILE};
#[cfg(not(target_arch = "wasm32"))]
use character_codex::core::io::create_fetcher;
#[cfg(not(target_arch = "wasm32"))]
use character_codex::services::browser::Browser;
#[cfg(not(target_arch = "wasm32"))]
use character_codex::ui::terminal;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 1. Load Config (defaults are written out when the file is absent)
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = match Config::load_or_init(std::path::Path::new(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            return Err(e);
        }
    };

    // 2. Content source
    let fetcher = create_fetcher(&config)?;
    let browser = Browser::new(config, fetcher);

    // 3. Book index. A failure is shown in the character bar and start stays available.
    let _ = browser.load_catalog().await;

    // 4. Interactive browsing
    terminal::run(&browser).await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

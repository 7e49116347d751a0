pub mod core;
pub mod services;
pub mod ui;
pub mod utils;

pub use crate::core::config::Config;
pub use crate::core::error::BrowserError;
pub use crate::core::state::{CatalogIndex, CharacterRecord};
pub use crate::services::browser::{Browser, BrowserEvent};
pub use crate::services::view::ViewState;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use leptos::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).unwrap_or(());

    leptos::mount_to_body(|| {
        use crate::ui::App;
        view! { <App/> }
    });
}

use crate::core::config::Config;
use crate::core::io::create_fetcher;
use crate::services::browser::{Browser, BrowserEvent};
use crate::services::view::{CharacterBar, NoticeKind, StartPhase, ViewState};
use leptos::*;
use std::sync::Arc;

#[component]
pub fn App() -> impl IntoView {
    let config = Config::default();
    match create_fetcher(&config) {
        Ok(fetcher) => {
            let browser = Arc::new(Browser::new(config, fetcher));
            view! { <Codex browser=browser/> }.into_view()
        }
        Err(e) => {
            leptos::logging::error!("Failed to set up content source: {:?}", e);
            view! { <p>"Error: " {e.to_string()}</p> }.into_view()
        }
    }
}

#[component]
fn Codex(browser: Arc<Browser>) -> impl IntoView {
    let state = create_rw_signal(browser.view());
    browser.subscribe(move |_event: &BrowserEvent, view: &ViewState| state.set(view.clone()));

    let loader = browser.clone();
    spawn_local(async move {
        // Errors end up in the character bar; start stays available.
        let _ = loader.load_catalog().await;
    });

    let starter = browser.clone();
    let on_start = move |_| {
        let browser = starter.clone();
        spawn_local(async move {
            browser.start().await;
        });
    };

    let start_class = move || match state.with(|v| v.start) {
        StartPhase::Visible => "",
        StartPhase::FadingOut => "fading-out",
        StartPhase::Hidden => "hidden",
    };
    let app_class = move || {
        if state.with(|v| v.app_visible) {
            "visible"
        } else {
            "hidden"
        }
    };

    let sidebar_browser = browser.clone();
    let sidebar = move || {
        state
            .with(|v| v.sidebar.clone())
            .into_iter()
            .map(|item| {
                let browser = sidebar_browser.clone();
                let book = item.id.clone();
                let on_click = move |_| {
                    let browser = browser.clone();
                    let book = book.clone();
                    spawn_local(async move {
                        browser.select_book(&book).await;
                    });
                };
                view! {
                    <div class="nav-item" class:active=item.active data-book=item.id.clone() on:click=on_click>
                        {item.title}
                    </div>
                }
            })
            .collect_view()
    };

    let bar_browser = browser.clone();
    let character_bar = move || match state.with(|v| v.character_bar.clone()) {
        CharacterBar::Empty => ().into_view(),
        CharacterBar::Notice { kind, text } => {
            let style = match kind {
                NoticeKind::Error => "color:red; opacity:0.8; padding: 15px;",
                NoticeKind::Info => "color:white; opacity:0.6;",
            };
            view! { <p style=style>{text}</p> }.into_view()
        }
        CharacterBar::Icons(icons) => icons
            .into_iter()
            .map(|icon| {
                let browser = bar_browser.clone();
                let character = icon.id.clone();
                let on_click = move |_| {
                    let browser = browser.clone();
                    let character = character.clone();
                    spawn_local(async move {
                        let _ = browser.select_character(&character).await;
                    });
                };
                view! {
                    <div class="char-icon-wrapper" class:active=icon.active data-char=icon.id.clone() on:click=on_click>
                        <img class="char-icon" src=icon.icon_path alt=icon.id.to_uppercase()/>
                        <p class="char-name">{icon.label}</p>
                    </div>
                }
            })
            .collect_view(),
    };

    let portrait = move || state.with(|v| v.detail.portrait.clone().unwrap_or_default());
    let portrait_opacity = move || if state.with(|v| v.detail.portrait_visible) { "1" } else { "0" };

    view! {
        <div id="start-screen" class=start_class>
            <button id="start-button" disabled=move || !state.with(|v| v.start_ready) on:click=on_start>
                "Start"
            </button>
        </div>
        <div id="app-container" class=app_class>
            <nav class="sidebar-nav">{sidebar}</nav>
            <div id="character-selection-bar">{character_bar}</div>
            <div class="character-detail">
                <img id="main-character-img" src=portrait style:opacity=portrait_opacity/>
                <h2 id="character-name">{move || state.with(|v| v.detail.name.clone())}</h2>
                <p id="vc-name">{move || state.with(|v| v.detail.voice_credit.clone())}</p>
                <p id="character-description">{move || state.with(|v| v.detail.description.clone())}</p>
                <p id="character-quote">{move || state.with(|v| v.detail.quote.clone())}</p>
            </div>
        </div>
    }
}

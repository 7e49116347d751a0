use crate::core::config::Config;
use crate::core::error::BrowserError;
use crate::core::io::Fetcher;
use crate::core::layout::ContentLayout;
use crate::core::state::{display_name, CatalogIndex, CharacterRecord};
use crate::services::catalog;
use crate::services::resolver::CharacterResolver;
use crate::services::view::{
    CharacterBar, CharacterIcon, NoticeKind, SidebarItem, StartPhase, ViewState,
    CATALOG_ERROR_NOTICE, NOT_INDEXED_NOTICE,
};
use crate::utils::timer::sleep;
use log::{debug, error, info, warn};
use std::error::Error as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    CatalogLoaded,
    CatalogFailed,
    Started,
    StartScreenHidden,
    BookListed { book: String },
    BookEmpty { book: String },
    /// Icon marked active and portrait faded out; the detail swap is pending.
    CharacterSelected { book: String, character: String, token: u64 },
    CharacterShown { book: String, character: String, token: u64 },
    CharacterFailed { book: String, character: String },
    StaleDiscarded { token: u64 },
}

#[cfg(target_arch = "wasm32")]
pub trait ListenerBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> ListenerBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait ListenerBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> ListenerBounds for T {}

/// Receives every state change together with the snapshot it produced.
pub trait ViewListener: ListenerBounds {
    fn on_change(&self, event: &BrowserEvent, view: &ViewState);
}

impl<F> ViewListener for F
where
    F: Fn(&BrowserEvent, &ViewState) + ListenerBounds,
{
    fn on_change(&self, event: &BrowserEvent, view: &ViewState) {
        self(event, view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogStatus {
    Pending,
    Loading,
    Loaded,
    Failed,
}

struct AppState {
    current_book: String,
    catalog: CatalogIndex,
    catalog_status: CatalogStatus,
    started: bool,
    view: ViewState,
}

/// Owns the whole browsing session: catalog, current book, character cache
/// and the presentation model handed to front-ends.
pub struct Browser {
    config: Config,
    layout: ContentLayout,
    fetcher: Arc<dyn Fetcher>,
    resolver: CharacterResolver,
    state: Mutex<AppState>,
    latest_request: AtomicU64,
    listeners: Mutex<Vec<Arc<dyn ViewListener>>>,
}

impl Browser {
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let layout = ContentLayout::from_config(&config);
        let resolver = CharacterResolver::new(fetcher.clone(), layout.clone());
        let view = ViewState {
            sidebar: config
                .books
                .iter()
                .map(|entry| SidebarItem {
                    id: entry.id.clone(),
                    title: entry.title().to_string(),
                    active: false,
                })
                .collect(),
            ..ViewState::default()
        };

        debug!("Browsing content from {}", fetcher.describe());

        Self {
            state: Mutex::new(AppState {
                current_book: config.initial_book.clone(),
                catalog: CatalogIndex::default(),
                catalog_status: CatalogStatus::Pending,
                started: false,
                view,
            }),
            config,
            layout,
            fetcher,
            resolver,
            latest_request: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, listener: impl ViewListener + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    fn emit(&self, event: BrowserEvent, view: &ViewState) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.on_change(&event, view);
        }
    }

    pub fn view(&self) -> ViewState {
        self.state().view.clone()
    }

    pub fn current_book(&self) -> String {
        self.state().current_book.clone()
    }

    pub fn catalog(&self) -> CatalogIndex {
        self.state().catalog.clone()
    }

    pub fn resolver(&self) -> &CharacterResolver {
        &self.resolver
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    pub fn is_start_ready(&self) -> bool {
        self.state().view.start_ready
    }

    fn next_token(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token
    }

    /// Fetch the book index. Only the first call touches the network; later
    /// calls return whatever that call produced (an empty index on failure).
    /// A call made while the first one is still in flight does not wait for
    /// it and yields an empty index; watch for `CatalogLoaded` instead.
    /// The start action is unlocked either way.
    pub async fn load_catalog(&self) -> Result<CatalogIndex, BrowserError> {
        {
            let mut st = self.state();
            match st.catalog_status {
                CatalogStatus::Pending => st.catalog_status = CatalogStatus::Loading,
                CatalogStatus::Loading => {
                    debug!("Book index still loading, returning empty index");
                    return Ok(CatalogIndex::default());
                }
                CatalogStatus::Loaded | CatalogStatus::Failed => {
                    debug!("Book index already requested, skipping fetch");
                    return Ok(st.catalog.clone());
                }
            }
        }

        let result = catalog::load_catalog(self.fetcher.as_ref(), &self.layout).await;

        let (event, snapshot) = {
            let mut st = self.state();
            st.view.start_ready = true;
            match &result {
                Ok(index) => {
                    st.catalog = index.clone();
                    st.catalog_status = CatalogStatus::Loaded;
                    if self.config.books.is_empty() {
                        st.view.sidebar = index
                            .book_ids()
                            .into_iter()
                            .map(|id| SidebarItem {
                                title: id.clone(),
                                id,
                                active: false,
                            })
                            .collect();
                    }
                    (BrowserEvent::CatalogLoaded, st.view.clone())
                }
                Err(err) => {
                    error!("{}", error_chain(err));
                    st.catalog_status = CatalogStatus::Failed;
                    st.view.character_bar = CharacterBar::Notice {
                        kind: NoticeKind::Error,
                        text: CATALOG_ERROR_NOTICE.to_string(),
                    };
                    (BrowserEvent::CatalogFailed, st.view.clone())
                }
            }
        };
        self.emit(event, &snapshot);
        result
    }

    /// Reveal the main UI and list the current book. Refused until the
    /// catalog request has settled, and accepted only once.
    pub async fn start(&self) -> bool {
        let (book, snapshot) = {
            let mut st = self.state();
            if !st.view.start_ready {
                warn!("Start requested before the book index settled; ignoring");
                return false;
            }
            if st.started {
                warn!("Start requested twice; ignoring");
                return false;
            }
            st.started = true;
            st.view.start = StartPhase::FadingOut;
            st.view.app_visible = true;
            (st.current_book.clone(), st.view.clone())
        };
        info!("Starting on book {}", book);
        self.emit(BrowserEvent::Started, &snapshot);

        futures_util::join!(self.select_book(&book), self.finish_start_fade());
        true
    }

    async fn finish_start_fade(&self) {
        sleep(self.config.start_fade()).await;
        let snapshot = {
            let mut st = self.state();
            st.view.start = StartPhase::Hidden;
            st.view.clone()
        };
        self.emit(BrowserEvent::StartScreenHidden, &snapshot);
    }

    /// Switch to `book`, rebuild the icon bar and show its first character.
    /// Books without characters clear the detail pane and fetch nothing.
    pub async fn select_book(&self, book: &str) {
        // Any render still pending for the previous book must not land.
        self.next_token();

        let (first, snapshot) = {
            let mut st = self.state();
            st.current_book = book.to_string();
            let characters = st.catalog.characters(book).to_vec();
            st.view.set_active_book(book);

            if characters.is_empty() {
                st.view.character_bar = CharacterBar::Notice {
                    kind: NoticeKind::Info,
                    text: NOT_INDEXED_NOTICE.to_string(),
                };
                st.view.detail.clear();
            } else {
                // A fade cut short by the switch must not leave the pane hidden.
                st.view.detail.portrait_visible = true;
                st.view.character_bar = CharacterBar::Icons(
                    characters
                        .iter()
                        .map(|character| CharacterIcon {
                            id: character.clone(),
                            label: display_name(character),
                            icon_path: self.layout.icon_path(book, character),
                            active: false,
                        })
                        .collect(),
                );
            }
            (characters.into_iter().next(), st.view.clone())
        };

        let Some(first) = first else {
            info!("Book {} has no indexed characters", book);
            self.emit(
                BrowserEvent::BookEmpty {
                    book: book.to_string(),
                },
                &snapshot,
            );
            return;
        };

        self.emit(
            BrowserEvent::BookListed {
                book: book.to_string(),
            },
            &snapshot,
        );
        // Failures are already logged; the pane keeps what it had.
        let _ = self.resolve_character(book, &first).await;
    }

    /// Icon click: resolve `character` within the current book.
    pub async fn select_character(
        &self,
        character: &str,
    ) -> Result<Arc<CharacterRecord>, BrowserError> {
        let book = self.current_book();
        self.resolve_character(&book, character).await
    }

    pub async fn resolve_character(
        &self,
        book: &str,
        character: &str,
    ) -> Result<Arc<CharacterRecord>, BrowserError> {
        match self.resolver.resolve(book, character).await {
            Ok(record) => {
                self.render_transition(book, character, &record).await;
                Ok(record)
            }
            Err(err) => {
                error!("{}", error_chain(&err));
                let snapshot = self.view();
                self.emit(
                    BrowserEvent::CharacterFailed {
                        book: book.to_string(),
                        character: character.to_string(),
                    },
                    &snapshot,
                );
                Err(err)
            }
        }
    }

    /// Mark the icon and fade out now; swap the detail pane after the render
    /// delay unless a newer resolution or book switch happened meanwhile.
    /// Only successful resolutions take a token, so a failed request never
    /// cancels a pending swap.
    async fn render_transition(
        &self,
        book: &str,
        character: &str,
        record: &CharacterRecord,
    ) -> bool {
        let selected = {
            let mut st = self.state();
            if st.current_book == book {
                let token = self.next_token();
                st.view.character_bar.set_active(character);
                st.view.detail.portrait_visible = false;
                Some((token, st.view.clone()))
            } else {
                None
            }
        };
        let Some((token, snapshot)) = selected else {
            // Fetched for a book the user has already left.
            debug!("Dropping {}/{}: book is no longer current", book, character);
            return false;
        };
        self.emit(
            BrowserEvent::CharacterSelected {
                book: book.to_string(),
                character: character.to_string(),
                token,
            },
            &snapshot,
        );

        sleep(self.config.render_delay()).await;

        let snapshot = {
            let mut st = self.state();
            if self.is_latest(token) {
                let portrait = self
                    .layout
                    .portrait_path(&st.current_book, &record.image_large);
                st.view.detail.show(record, portrait);
                Some(st.view.clone())
            } else {
                None
            }
        };
        let Some(snapshot) = snapshot else {
            self.discard_stale(token);
            return false;
        };
        self.emit(
            BrowserEvent::CharacterShown {
                book: book.to_string(),
                character: character.to_string(),
                token,
            },
            &snapshot,
        );
        true
    }

    fn discard_stale(&self, token: u64) {
        debug!("Discarding stale render for request {}", token);
        let snapshot = self.view();
        self.emit(BrowserEvent::StaleDiscarded { token }, &snapshot);
    }
}

fn error_chain(err: &BrowserError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

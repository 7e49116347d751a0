//! Presentation model. Front-ends render a `ViewState` snapshot and never
//! reach into the controller's internals.

use crate::core::state::CharacterRecord;

pub const CATALOG_ERROR_NOTICE: &str =
    "Error: Could not load book index data. (Check JSON contents or console for details)";
pub const NOT_INDEXED_NOTICE: &str = "Content for this book is not yet available or indexed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPhase {
    #[default]
    Visible,
    FadingOut,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarItem {
    pub id: String,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterIcon {
    pub id: String,
    pub label: String,
    pub icon_path: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CharacterBar {
    #[default]
    Empty,
    Notice { kind: NoticeKind, text: String },
    Icons(Vec<CharacterIcon>),
}

impl CharacterBar {
    pub fn icons(&self) -> &[CharacterIcon] {
        match self {
            CharacterBar::Icons(icons) => icons,
            _ => &[],
        }
    }

    pub fn active_icon(&self) -> Option<&CharacterIcon> {
        self.icons().iter().find(|icon| icon.active)
    }

    pub(crate) fn set_active(&mut self, character: &str) {
        if let CharacterBar::Icons(icons) = self {
            for icon in icons.iter_mut() {
                icon.active = icon.id == character;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPane {
    pub portrait: Option<String>,
    pub portrait_visible: bool,
    pub name: String,
    pub voice_credit: String,
    pub description: String,
    pub quote: String,
}

impl Default for DetailPane {
    fn default() -> Self {
        Self {
            portrait: None,
            portrait_visible: true,
            name: String::new(),
            voice_credit: String::new(),
            description: String::new(),
            quote: String::new(),
        }
    }
}

impl DetailPane {
    pub fn is_blank(&self) -> bool {
        self.portrait.is_none()
            && self.name.is_empty()
            && self.voice_credit.is_empty()
            && self.description.is_empty()
            && self.quote.is_empty()
    }

    pub(crate) fn show(&mut self, record: &CharacterRecord, portrait: String) {
        self.portrait = Some(portrait);
        self.name = record.name.clone();
        self.voice_credit = record.voice_credit.clone();
        self.description = record.description.clone();
        self.quote = record.quote.clone();
        self.portrait_visible = true;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub start: StartPhase,
    pub start_ready: bool,
    pub app_visible: bool,
    pub sidebar: Vec<SidebarItem>,
    pub character_bar: CharacterBar,
    pub detail: DetailPane,
}

impl ViewState {
    pub fn active_book(&self) -> Option<&str> {
        self.sidebar
            .iter()
            .find(|item| item.active)
            .map(|item| item.id.as_str())
    }

    pub(crate) fn set_active_book(&mut self, book: &str) {
        for item in self.sidebar.iter_mut() {
            item.active = item.id == book;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(id: &str) -> CharacterIcon {
        CharacterIcon {
            id: id.to_string(),
            label: id.to_string(),
            icon_path: format!("data/B/{}.png", id),
            active: false,
        }
    }

    #[test]
    fn test_set_active_marks_single_icon() {
        let mut bar = CharacterBar::Icons(vec![icon("alice"), icon("bob")]);
        bar.set_active("bob");
        assert_eq!(bar.active_icon().map(|i| i.id.as_str()), Some("bob"));
        bar.set_active("alice");
        assert_eq!(bar.icons().iter().filter(|i| i.active).count(), 1);
        bar.set_active("nobody");
        assert!(bar.active_icon().is_none());
    }

    #[test]
    fn test_notice_bar_has_no_icons() {
        let mut bar = CharacterBar::Notice {
            kind: NoticeKind::Info,
            text: NOT_INDEXED_NOTICE.to_string(),
        };
        bar.set_active("alice");
        assert!(bar.icons().is_empty());
    }

    #[test]
    fn test_detail_show_and_clear() {
        let mut detail = DetailPane::default();
        assert!(detail.is_blank());

        detail.portrait_visible = false;
        let record = CharacterRecord {
            name: "Alice".to_string(),
            ..Default::default()
        };
        detail.show(&record, "data/B/alice_large.png".to_string());
        assert!(detail.portrait_visible);
        assert!(!detail.is_blank());

        detail.clear();
        assert!(detail.is_blank());
    }
}

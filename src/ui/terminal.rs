use crate::services::browser::Browser;
use crate::services::view::{CharacterBar, NoticeKind, StartPhase, ViewState};
use anyhow::Result;
use inquire::{Confirm, InquireError, Select};
use std::fmt;

enum MenuChoice {
    Book { id: String, title: String, active: bool },
    Character { id: String, label: String, active: bool },
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::Book { title, active, .. } => {
                write!(f, "Book: {}{}", title, if *active { " (current)" } else { "" })
            }
            MenuChoice::Character { label, active, .. } => {
                write!(f, "Character: {}{}", label, if *active { " (shown)" } else { "" })
            }
            MenuChoice::Quit => write!(f, "Quit"),
        }
    }
}

fn menu(view: &ViewState) -> Vec<MenuChoice> {
    let mut choices: Vec<MenuChoice> = view
        .character_bar
        .icons()
        .iter()
        .map(|icon| MenuChoice::Character {
            id: icon.id.clone(),
            label: icon.label.clone(),
            active: icon.active,
        })
        .collect();
    choices.extend(view.sidebar.iter().map(|item| MenuChoice::Book {
        id: item.id.clone(),
        title: item.title.clone(),
        active: item.active,
    }));
    choices.push(MenuChoice::Quit);
    choices
}

/// Text rendering of the sidebar, character bar and detail pane.
pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    if view.start != StartPhase::Hidden && !view.app_visible {
        out.push_str("== Character Codex ==\n");
        return out;
    }

    out.push_str("== Books ==\n");
    if view.sidebar.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in &view.sidebar {
        let marker = if item.active { '>' } else { ' ' };
        out.push_str(&format!(" {} {}\n", marker, item.title));
    }

    out.push_str("== Characters ==\n");
    match &view.character_bar {
        CharacterBar::Empty => out.push_str("  (none)\n"),
        CharacterBar::Notice { kind, text } => match kind {
            NoticeKind::Error => out.push_str(&format!("  ! {}\n", text)),
            NoticeKind::Info => out.push_str(&format!("  {}\n", text)),
        },
        CharacterBar::Icons(icons) => {
            let labels: Vec<String> = icons
                .iter()
                .map(|icon| {
                    if icon.active {
                        format!("[{}]", icon.label)
                    } else {
                        icon.label.clone()
                    }
                })
                .collect();
            out.push_str(&format!("  {}\n", labels.join("  ")));
        }
    }

    let detail = &view.detail;
    if detail.is_blank() {
        return out;
    }
    out.push_str(&format!("== {} ==\n", detail.name));
    if let Some(portrait) = &detail.portrait {
        out.push_str(&format!("Portrait: {}\n", portrait));
    }
    if !detail.voice_credit.is_empty() {
        out.push_str(&format!("VC: {}\n", detail.voice_credit));
    }
    if !detail.description.is_empty() {
        out.push_str(&format!("{}\n", detail.description));
    }
    if !detail.quote.is_empty() {
        out.push_str(&format!("\"{}\"\n", detail.quote));
    }
    out
}

fn is_exit(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Interactive loop: start screen, then book/character selection until quit.
pub async fn run(browser: &Browser) -> Result<()> {
    print!("{}", render(&browser.view()));
    if let CharacterBar::Notice { kind: NoticeKind::Error, text } = &browser.view().character_bar {
        println!("{}", text);
    }

    match Confirm::new("Start browsing?").with_default(true).prompt() {
        Ok(true) => {}
        Ok(false) => return Ok(()),
        Err(e) if is_exit(&e) => return Ok(()),
        Err(e) => return Err(e.into()),
    }
    browser.start().await;

    loop {
        let view = browser.view();
        println!();
        print!("{}", render(&view));

        let choice = match Select::new("Select:", menu(&view)).prompt() {
            Ok(choice) => choice,
            Err(e) if is_exit(&e) => break,
            Err(e) => return Err(e.into()),
        };

        match choice {
            MenuChoice::Book { id, .. } => browser.select_book(&id).await,
            MenuChoice::Character { id, .. } => {
                // Failures are logged; the previous character stays on screen.
                let _ = browser.select_character(&id).await;
            }
            MenuChoice::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::view::{CharacterIcon, DetailPane, SidebarItem};

    fn browsing_view() -> ViewState {
        ViewState {
            start: StartPhase::Hidden,
            start_ready: true,
            app_visible: true,
            sidebar: vec![
                SidebarItem {
                    id: "TMGD".to_string(),
                    title: "The Main Gate Diaries".to_string(),
                    active: true,
                },
                SidebarItem {
                    id: "SIDE".to_string(),
                    title: "SIDE".to_string(),
                    active: false,
                },
            ],
            character_bar: CharacterBar::Icons(vec![
                CharacterIcon {
                    id: "alice".to_string(),
                    label: "Alice".to_string(),
                    icon_path: "data/TMGD/alice.png".to_string(),
                    active: true,
                },
                CharacterIcon {
                    id: "bob".to_string(),
                    label: "Bob".to_string(),
                    icon_path: "data/TMGD/bob.png".to_string(),
                    active: false,
                },
            ]),
            detail: DetailPane {
                portrait: Some("data/TMGD/alice_large.png".to_string()),
                portrait_visible: true,
                name: "Alice".to_string(),
                voice_credit: "Jane Doe".to_string(),
                description: "The lead.".to_string(),
                quote: "Hello there.".to_string(),
            },
        }
    }

    #[test]
    fn test_render_full_view() {
        let text = render(&browsing_view());
        assert_eq!(
            text,
            "== Books ==\n > The Main Gate Diaries\n   SIDE\n== Characters ==\n  [Alice]  Bob\n== Alice ==\nPortrait: data/TMGD/alice_large.png\nVC: Jane Doe\nThe lead.\n\"Hello there.\"\n"
        );
    }

    #[test]
    fn test_render_before_start() {
        assert_eq!(render(&ViewState::default()), "== Character Codex ==\n");
    }

    #[test]
    fn test_render_error_notice() {
        let view = ViewState {
            app_visible: true,
            character_bar: CharacterBar::Notice {
                kind: NoticeKind::Error,
                text: "boom".to_string(),
            },
            ..ViewState::default()
        };
        let text = render(&view);
        assert!(text.contains("  ! boom\n"));
        assert!(!text.contains("Portrait"));
    }

    #[test]
    fn test_menu_lists_characters_books_and_quit() {
        let labels: Vec<String> = menu(&browsing_view()).iter().map(|c| c.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Character: Alice (shown)",
                "Character: Bob",
                "Book: The Main Gate Diaries (current)",
                "Book: SIDE",
                "Quit",
            ]
        );
    }
}

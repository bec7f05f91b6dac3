//! Headless menu system provider.
//!
//! Holds menu and dialog state without rendering anything; a UI layer
//! reads the queued lines and the session drives dismissal.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use tileworld_core::{DialogFinish, MenuSystem};

#[derive(Debug, Default)]
struct MenuEntry {
    lines: VecDeque<String>,
    on_finish: DialogFinish,
}

#[derive(Debug, Default)]
struct MenusInner {
    menus: HashMap<String, MenuEntry>,
    active: Option<String>,
}

/// One dismissal of the active dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogAdvance {
    /// The next line to display.
    Line(String),

    /// The last line was already dismissed; the menu closed and its
    /// completion action is handed back.
    Finished(DialogFinish),

    /// No active menu.
    Idle,
}

/// Menu system holding dialog state in memory.
#[derive(Debug, Default)]
pub struct HeadlessMenus {
    inner: RefCell<MenusInner>,
}

impl HeadlessMenus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dismisses one dialog line of the active menu. Returns the line, or
    /// the completion action once the lines run out.
    pub fn advance(&self) -> DialogAdvance {
        let mut inner = self.inner.borrow_mut();
        let Some(active) = inner.active.clone() else {
            return DialogAdvance::Idle;
        };
        let Some(entry) = inner.menus.get_mut(&active) else {
            inner.active = None;
            return DialogAdvance::Idle;
        };

        match entry.lines.pop_front() {
            Some(line) => DialogAdvance::Line(line),
            None => {
                let finish = std::mem::take(&mut entry.on_finish);
                inner.menus.remove(&active);
                inner.active = None;
                DialogAdvance::Finished(finish)
            }
        }
    }

    /// Lines still queued in a menu.
    pub fn pending_lines(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .menus
            .get(name)
            .map(|entry| entry.lines.len())
            .unwrap_or(0)
    }
}

impl MenuSystem for HeadlessMenus {
    fn create_menu(&self, name: &str) {
        self.inner
            .borrow_mut()
            .menus
            .insert(name.to_owned(), MenuEntry::default());
    }

    fn add_menu_dialog(&self, name: &str, lines: &[String], on_finish: DialogFinish) {
        let mut inner = self.inner.borrow_mut();
        let entry = inner.menus.entry(name.to_owned()).or_default();
        entry.lines.extend(lines.iter().cloned());
        entry.on_finish = on_finish;
    }

    fn set_active_menu(&self, name: &str) {
        self.inner.borrow_mut().active = Some(name.to_owned());
    }

    fn close_active_menu(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(active) = inner.active.take() {
            inner.menus.remove(&active);
        }
    }

    fn active_menu(&self) -> Option<String> {
        self.inner.borrow().active.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::ThingId;

    #[test]
    fn dialog_lines_then_finish_action() {
        let menus = HeadlessMenus::new();
        menus.create_menu("GeneralText");
        menus.add_menu_dialog(
            "GeneralText",
            &["Hello.".to_owned(), "Bye.".to_owned()],
            DialogFinish::EndDialog {
                mover: ThingId::new("player"),
                other: ThingId::new("npc"),
            },
        );
        menus.set_active_menu("GeneralText");

        assert_eq!(menus.advance(), DialogAdvance::Line("Hello.".to_owned()));
        assert_eq!(menus.advance(), DialogAdvance::Line("Bye.".to_owned()));
        assert!(matches!(
            menus.advance(),
            DialogAdvance::Finished(DialogFinish::EndDialog { .. })
        ));
        assert_eq!(menus.active_menu(), None);
        assert_eq!(menus.advance(), DialogAdvance::Idle);
    }
}

//! Menu system collaborator: dialog boxes and menu focus.
//!
//! The core never renders menus. It asks the environment to open them, hand
//! over dialog lines, and report which menu holds focus; the runtime decides
//! what that looks like. Menu calls are presentation-soft: operations degrade
//! gracefully when no menu system is wired in.

use crate::state::ThingId;

/// What should happen once the player dismisses the last dialog line.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DialogFinish {
    /// Nothing; the menu simply closes.
    #[default]
    None,

    /// Re-enter the movement layer: un-freeze both talkers and restore the
    /// listener's preferred facing.
    EndDialog { mover: ThingId, other: ThingId },

    /// Advance a scene routine to its next step.
    AdvanceScene { routine: String, step: usize },
}

/// Menu and dialog surface supplied by the runtime.
pub trait MenuSystem {
    /// Creates (or resets) a named menu.
    fn create_menu(&self, name: &str);

    /// Queues dialog lines into a menu, with a completion action the
    /// runtime must hand back once the player dismisses the last line.
    fn add_menu_dialog(&self, name: &str, lines: &[String], on_finish: DialogFinish);

    /// Gives a menu input focus.
    fn set_active_menu(&self, name: &str);

    /// Closes whichever menu holds focus.
    fn close_active_menu(&self);

    /// Name of the focused menu, if any.
    fn active_menu(&self) -> Option<String>;
}

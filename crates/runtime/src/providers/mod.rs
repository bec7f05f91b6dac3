//! Concrete providers for the core's collaborator traits.
//!
//! Catalogs from `tileworld-content` cover the data collaborators; this
//! module supplies the presentation ones: menus, graphics, persistence,
//! and event broadcast. All are headless and deterministic, ready for an
//! embedding client to read from or replace.

pub mod events;
pub mod graphics;
pub mod menus;
pub mod store;

pub use events::EventBroadcaster;
pub use graphics::{NullGraphics, RecordingGraphics};
pub use menus::{DialogAdvance, HeadlessMenus};
pub use store::{FileStore, MemoryStore};

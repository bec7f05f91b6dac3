//! Runtime harness for the tileworld engine.
//!
//! `tileworld-runtime` wires the pure core to concrete providers: content
//! catalogs loaded from disk, a headless menu system, recording graphics,
//! and key-value persistence. The [`session::Session`] type is the front
//! door: build one, enter a map, and drive it with ticks and input.

pub mod error;
pub mod providers;
pub mod session;
pub mod telemetry;

pub use error::{Result, RuntimeError};
pub use providers::{
    DialogAdvance, EventBroadcaster, FileStore, HeadlessMenus, MemoryStore, NullGraphics,
    RecordingGraphics,
};
pub use session::{Session, SessionBuilder, SessionProviders};

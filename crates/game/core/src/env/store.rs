//! Key-value store collaborator for persisted flags and thing snapshots.
//!
//! Keys follow a few conventions the core relies on:
//! - `badge::{gym}` marks a gym badge as earned.
//! - `thing::{id}` holds a saved-thing snapshot applied on re-materialization.

/// Mutable string store supplied by the runtime.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Key for a gym badge flag.
pub fn badge_key(gym: &str) -> String {
    format!("badge::{gym}")
}

/// Key for a saved-thing snapshot.
pub fn thing_key(id: &str) -> String {
    format!("thing::{id}")
}

//! Recording graphics provider.
//!
//! Tracks sprite classes and mirroring per thing so a renderer (or a
//! test) can query the current presentation state.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

use tileworld_core::{Graphics, ThingId};

/// Graphics sink that drops every call, for embedders that render from
/// state directly.
#[derive(Debug, Default)]
pub struct NullGraphics;

impl Graphics for NullGraphics {
    fn add_class(&self, _thing: &ThingId, _class: &str) {}

    fn remove_class(&self, _thing: &ThingId, _class: &str) {}

    fn flip_horiz(&self, _thing: &ThingId) {}

    fn unflip_horiz(&self, _thing: &ThingId) {}
}

#[derive(Debug, Default)]
pub struct RecordingGraphics {
    classes: RefCell<HashMap<ThingId, BTreeSet<String>>>,
    flipped: RefCell<HashSet<ThingId>>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_class(&self, thing: &ThingId, class: &str) -> bool {
        self.classes
            .borrow()
            .get(thing)
            .is_some_and(|set| set.contains(class))
    }

    pub fn classes_of(&self, thing: &ThingId) -> Vec<String> {
        self.classes
            .borrow()
            .get(thing)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_flipped(&self, thing: &ThingId) -> bool {
        self.flipped.borrow().contains(thing)
    }
}

impl Graphics for RecordingGraphics {
    fn add_class(&self, thing: &ThingId, class: &str) {
        self.classes
            .borrow_mut()
            .entry(thing.clone())
            .or_default()
            .insert(class.to_owned());
    }

    fn remove_class(&self, thing: &ThingId, class: &str) {
        if let Some(set) = self.classes.borrow_mut().get_mut(thing) {
            set.remove(class);
        }
    }

    fn flip_horiz(&self, thing: &ThingId) {
        self.flipped.borrow_mut().insert(thing.clone());
    }

    fn unflip_horiz(&self, thing: &ThingId) {
        self.flipped.borrow_mut().remove(thing);
    }
}

//! Saved-thing snapshots in the key-value store.
//!
//! Snapshots let a thing's position, facing, and liveness survive a map
//! switch: materialization overlays any stored snapshot on top of the
//! authored creation record. The format is a plain
//! `left,top,direction,alive` line, kept dependency-free on purpose since
//! stores may be backed by anything from memory to browser storage.

use crate::env::{Env, thing_key};
use crate::geometry::Direction;
use crate::state::{ThingId, ThingState};

/// Writes a thing's snapshot, if a store is wired in.
pub fn persist_thing(env: &Env<'_>, thing: &ThingState) {
    let Some(store) = env.store() else {
        return;
    };
    let snapshot = format!(
        "{},{},{},{}",
        thing.bounds.left,
        thing.bounds.top,
        thing.direction.index(),
        u8::from(thing.alive),
    );
    store.set(&thing_key(thing.id.as_str()), snapshot);
}

/// Overlays a stored snapshot onto a freshly materialized thing.
/// Malformed snapshots are ignored wholesale.
pub fn apply_saved_state(env: &Env<'_>, id: &ThingId, thing: &mut ThingState) {
    let Some(store) = env.store() else {
        return;
    };
    let Some(snapshot) = store.get(&thing_key(id.as_str())) else {
        return;
    };

    let fields: Vec<&str> = snapshot.split(',').collect();
    if fields.len() != 4 {
        return;
    }
    let (Ok(left), Ok(top), Ok(direction), Ok(alive)) = (
        fields[0].parse::<i32>(),
        fields[1].parse::<i32>(),
        fields[2].parse::<usize>(),
        fields[3].parse::<u8>(),
    ) else {
        return;
    };

    thing.bounds.set_left(left);
    thing.bounds.set_top(top);
    if let Some(direction) = Direction::from_index(direction) {
        thing.direction = direction;
    }
    thing.alive = alive != 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::KeyValueStore;
    use crate::geometry::Bounds;
    use crate::state::GroupKind;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: String) {
            self.values.borrow_mut().insert(key.to_owned(), value);
        }
    }

    #[test]
    fn snapshot_round_trips_through_the_store() {
        let store = MemoryStore::default();
        let env = Env::empty().with_store(&store);
        let id = ThingId::new("town::main::npc::0");

        let mut original = ThingState::new(
            id.clone(),
            "npc",
            GroupKind::Character,
            Bounds::from_origin(48, 96, 16, 16),
        );
        original.direction = Direction::Left;
        original.alive = false;
        persist_thing(&env, &original);

        let mut fresh = ThingState::new(
            id.clone(),
            "npc",
            GroupKind::Character,
            Bounds::from_origin(0, 0, 16, 16),
        );
        apply_saved_state(&env, &id, &mut fresh);

        assert_eq!(fresh.bounds.left, 48);
        assert_eq!(fresh.bounds.top, 96);
        assert_eq!(fresh.direction, Direction::Left);
        assert!(!fresh.alive);
    }

    #[test]
    fn malformed_snapshots_are_ignored() {
        let store = MemoryStore::default();
        store.set("thing::x", "garbage".to_owned());
        let env = Env::empty().with_store(&store);
        let id = ThingId::new("x");

        let mut thing = ThingState::new(
            id.clone(),
            "npc",
            GroupKind::Character,
            Bounds::from_origin(8, 8, 16, 16),
        );
        apply_saved_state(&env, &id, &mut thing);

        assert_eq!(thing.bounds.left, 8);
        assert!(thing.alive);
    }
}

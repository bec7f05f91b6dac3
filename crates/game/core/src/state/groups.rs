//! The live-thing registry, grouped by category.

use crate::geometry::Bounds;

use super::{CharacterState, GroupKind, ThingId, ThingState};

/// Aggregate registry for every live thing, split by group.
///
/// The registry owns things for their lifetime: a thing whose `alive` flag
/// drops is removed (not merely hidden) by the maintenance pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupsState {
    pub player: Option<CharacterState>,
    pub npcs: Vec<CharacterState>,
    pub solids: Vec<ThingState>,
    pub scenery: Vec<ThingState>,
    pub terrain: Vec<ThingState>,
    pub text: Vec<ThingState>,
}

impl GroupsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a non-character thing into its group.
    pub fn insert(&mut self, thing: ThingState) {
        match thing.group {
            GroupKind::Character => {
                // Characters must come with movement state.
                let speed = 1;
                self.npcs.push(CharacterState::new(thing, speed));
            }
            GroupKind::Solid => self.solids.push(thing),
            GroupKind::Scenery => self.scenery.push(thing),
            GroupKind::Terrain => self.terrain.push(thing),
            GroupKind::Text => self.text.push(thing),
        }
    }

    pub fn insert_character(&mut self, character: CharacterState) {
        if character.is_player {
            self.player = Some(character);
        } else {
            self.npcs.push(character);
        }
    }

    /// Looks up any thing by id.
    pub fn thing(&self, id: &ThingId) -> Option<&ThingState> {
        if let Some(player) = &self.player
            && player.id() == id
        {
            return Some(&player.thing);
        }
        if let Some(npc) = self.npcs.iter().find(|npc| npc.id() == id) {
            return Some(&npc.thing);
        }
        self.solids
            .iter()
            .chain(self.scenery.iter())
            .chain(self.terrain.iter())
            .chain(self.text.iter())
            .find(|thing| &thing.id == id)
    }

    /// Looks up any thing by id, mutably.
    pub fn thing_mut(&mut self, id: &ThingId) -> Option<&mut ThingState> {
        if let Some(player) = &mut self.player
            && player.id() == id
        {
            return Some(&mut player.thing);
        }
        if let Some(npc) = self.npcs.iter_mut().find(|npc| npc.id() == id) {
            return Some(&mut npc.thing);
        }
        self.solids
            .iter_mut()
            .chain(self.scenery.iter_mut())
            .chain(self.terrain.iter_mut())
            .chain(self.text.iter_mut())
            .find(|thing| &thing.id == id)
    }

    /// Looks up a character (player or NPC) by id.
    pub fn character(&self, id: &ThingId) -> Option<&CharacterState> {
        if let Some(player) = &self.player
            && player.id() == id
        {
            return Some(player);
        }
        self.npcs.iter().find(|npc| npc.id() == id)
    }

    /// Looks up a character by id, mutably.
    pub fn character_mut(&mut self, id: &ThingId) -> Option<&mut CharacterState> {
        if let Some(player) = &mut self.player
            && player.id() == id
        {
            return Some(player);
        }
        self.npcs.iter_mut().find(|npc| npc.id() == id)
    }

    /// Iterates all characters, player first.
    pub fn all_characters(&self) -> impl Iterator<Item = &CharacterState> {
        self.player.iter().chain(self.npcs.iter())
    }

    /// Ids of all live characters in processing order (player first).
    pub fn character_ids(&self) -> Vec<ThingId> {
        self.all_characters()
            .filter(|character| character.thing.alive)
            .map(|character| character.id().clone())
            .collect()
    }

    /// Iterates every live thing with its group, characters included.
    pub fn all_things(&self) -> impl Iterator<Item = &ThingState> {
        self.player
            .iter()
            .map(|player| &player.thing)
            .chain(self.npcs.iter().map(|npc| &npc.thing))
            .chain(self.solids.iter())
            .chain(self.scenery.iter())
            .chain(self.terrain.iter())
            .chain(self.text.iter())
    }

    /// Bounds lookup shortcut used by the collision engine.
    pub fn bounds_of(&self, id: &ThingId) -> Option<Bounds> {
        self.thing(id).map(|thing| thing.bounds)
    }

    /// Removes every dead thing and returns their ids.
    ///
    /// A dead player is left in place; ending the session is the runtime's
    /// decision, not the registry's.
    pub fn maintain(&mut self) -> Vec<ThingId> {
        let mut removed = Vec::new();

        let mut collect = |things: &mut Vec<ThingState>| {
            things.retain(|thing| {
                if thing.alive {
                    true
                } else {
                    removed.push(thing.id.clone());
                    false
                }
            });
        };

        collect(&mut self.solids);
        collect(&mut self.scenery);
        collect(&mut self.terrain);
        collect(&mut self.text);

        self.npcs.retain(|npc| {
            if npc.thing.alive {
                true
            } else {
                removed.push(npc.id().clone());
                false
            }
        });

        removed
    }

    /// Empties every group (map/location switch).
    pub fn clear(&mut self) {
        self.player = None;
        self.npcs.clear();
        self.solids.clear();
        self.scenery.clear();
        self.terrain.clear();
        self.text.clear();
    }
}

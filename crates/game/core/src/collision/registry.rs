//! Group-pair dispatch table for collision handling.

use std::collections::HashMap;

use crate::state::{GroupKind, ThingState};

/// Classification of the moving side of a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoverClass {
    Player,
    Npc,
}

/// Classification of the touched side, derived from group and traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchClass {
    Character,
    Solid,
    Ledge,
    Transporter,
    DialogSource,
    GymStatue,
    Grass,
}

/// Derives the touch class of a thing, or `None` for things collision
/// ignores entirely (plain scenery, text).
pub fn touch_class(thing: &ThingState) -> Option<TouchClass> {
    if thing.group == GroupKind::Character {
        return Some(TouchClass::Character);
    }
    let traits = &thing.traits;
    if traits.grass {
        return Some(TouchClass::Grass);
    }
    if traits.ledge {
        return Some(TouchClass::Ledge);
    }
    if traits.transport.is_some() {
        return Some(TouchClass::Transporter);
    }
    if traits.gym_statue.is_some() {
        return Some(TouchClass::GymStatue);
    }
    if traits.dialog.is_some() {
        return Some(TouchClass::DialogSource);
    }
    match thing.group {
        GroupKind::Solid => Some(TouchClass::Solid),
        _ => None,
    }
}

/// What a registered contact pair does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitBehavior {
    /// Bordering bookkeeping, flush snap, dialog when the mover is the
    /// player and the other side talks.
    Character,

    /// Bordering bookkeeping and flush snap.
    Solid,

    /// Hop when pushed from the authored direction, solid otherwise.
    Ledge,

    /// Arm on matching-direction contact, fire on axis overlap.
    Transporter,

    /// Open the thing's dialog, then behave as solid.
    Dialog,

    /// Generated plaque dialog with a badge-aware bonus line.
    GymStatue,

    /// Record grass containment; walk-through, no snap.
    Grass,
}

/// Maps (mover class, touch class) pairs to their contact behavior.
///
/// Unregistered pairs are ignored, which is how walk-through contacts
/// (an NPC over grass) fall out naturally.
#[derive(Debug, Default)]
pub struct HitRegistry {
    table: HashMap<(MoverClass, TouchClass), HitBehavior>,
}

impl HitRegistry {
    /// The standard overworld table.
    pub fn standard() -> Self {
        let mut table = HashMap::new();

        table.insert((MoverClass::Player, TouchClass::Character), HitBehavior::Character);
        table.insert((MoverClass::Player, TouchClass::Solid), HitBehavior::Solid);
        table.insert((MoverClass::Player, TouchClass::Ledge), HitBehavior::Ledge);
        table.insert(
            (MoverClass::Player, TouchClass::Transporter),
            HitBehavior::Transporter,
        );
        table.insert(
            (MoverClass::Player, TouchClass::DialogSource),
            HitBehavior::Dialog,
        );
        table.insert(
            (MoverClass::Player, TouchClass::GymStatue),
            HitBehavior::GymStatue,
        );
        table.insert((MoverClass::Player, TouchClass::Grass), HitBehavior::Grass);

        // NPCs treat every special surface as plain geometry.
        table.insert((MoverClass::Npc, TouchClass::Character), HitBehavior::Character);
        table.insert((MoverClass::Npc, TouchClass::Solid), HitBehavior::Solid);
        table.insert((MoverClass::Npc, TouchClass::Ledge), HitBehavior::Solid);
        table.insert(
            (MoverClass::Npc, TouchClass::Transporter),
            HitBehavior::Solid,
        );
        table.insert(
            (MoverClass::Npc, TouchClass::DialogSource),
            HitBehavior::Solid,
        );
        table.insert((MoverClass::Npc, TouchClass::GymStatue), HitBehavior::Solid);

        Self { table }
    }

    pub fn behavior(&self, mover: MoverClass, touch: TouchClass) -> Option<HitBehavior> {
        self.table.get(&(mover, touch)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::state::{ThingId, ThingTraits};

    fn thing(group: GroupKind, traits: ThingTraits) -> ThingState {
        ThingState::new(
            ThingId::new("x"),
            "x",
            group,
            Bounds::from_origin(0, 0, 16, 16),
        )
        .with_traits(traits)
    }

    #[test]
    fn trait_flags_override_group_class() {
        let grass = thing(
            GroupKind::Scenery,
            ThingTraits {
                grass: true,
                ..ThingTraits::default()
            },
        );
        assert_eq!(touch_class(&grass), Some(TouchClass::Grass));

        let scenery = thing(GroupKind::Scenery, ThingTraits::default());
        assert_eq!(touch_class(&scenery), None);
    }

    #[test]
    fn npcs_see_ledges_as_solids() {
        let registry = HitRegistry::standard();
        assert_eq!(
            registry.behavior(MoverClass::Npc, TouchClass::Ledge),
            Some(HitBehavior::Solid)
        );
        assert_eq!(
            registry.behavior(MoverClass::Player, TouchClass::Ledge),
            Some(HitBehavior::Ledge)
        );
        assert_eq!(registry.behavior(MoverClass::Npc, TouchClass::Grass), None);
    }
}

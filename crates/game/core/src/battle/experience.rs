//! Experience gain, leveling, and evolution.

use crate::env::{Env, WorldEvent};

use super::BattleActor;

/// Experience awarded for knocking out an opponent of the given species
/// and level.
pub fn experience_gained(species: &dyn crate::env::SpeciesOracle, title: &str, level: u8) -> u32 {
    let base = species.base_experience(title).unwrap_or(0);
    base * u32::from(level) / 7
}

/// Adds experience to an actor, leveling up as thresholds pass and
/// evolving when a new level unlocks an evolution.
///
/// Level-ups rescale statistics while preserving damage already taken, so
/// a weakened actor does not come out of a level-up fully healed.
pub fn gain_experience(actor: &mut BattleActor, amount: u32, env: &Env<'_>) {
    let Ok(species) = env.species() else {
        actor.experience += amount;
        return;
    };

    actor.experience += amount;

    loop {
        let next_level = match actor.level.checked_add(1) {
            Some(level) => level,
            None => break,
        };
        let Some(threshold) = species.experience_to_level(&actor.title, next_level) else {
            break;
        };
        if actor.experience < threshold {
            break;
        }

        actor.level = next_level;
        if let Some(base) = species.base_statistics(&actor.title) {
            actor.statistics.grow_from_base(&base, actor.level);
        }
        env.fire(WorldEvent::LevelUp {
            actor: actor.title.clone(),
            level: actor.level,
        });

        if let Some(into) = species.evolution(&actor.title, actor.level) {
            let from = std::mem::replace(&mut actor.title, into.clone());
            if let Some(base) = species.base_statistics(&actor.title) {
                actor.statistics.grow_from_base(&base, actor.level);
            }
            env.fire(WorldEvent::Evolved { from, into });
        }
    }
}

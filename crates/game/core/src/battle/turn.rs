//! Turn resolution: ordering, move execution, damage, and fainting.

use crate::config::GameConfig;
use crate::env::{BattleSide, Env, MoveEffectSchema, MoveOracle, RandomSource, StatKind, WorldEvent};
use crate::error::ContentError;
use crate::state::{WorldRng, WorldState};

use super::experience;
use super::{BattleAction, BattleError, BattleOutcome, BattlePhase, BattleState};

/// Queues the opponent's action for the turn: a uniformly random usable
/// move, falling back to the first slot when everything is exhausted.
pub fn queue_opponent_action(world: &mut WorldState, env: &Env<'_>) -> Result<(), BattleError> {
    let random = env.random()?;
    let Some(battle) = world.battle.as_mut() else {
        return Err(BattleError::NoActiveBattle);
    };
    if battle
        .queued
        .iter()
        .any(|(side, _)| *side == BattleSide::Opponent)
    {
        return Ok(());
    }

    let slot = match battle.opponent.active() {
        Some(active) => {
            let usable: Vec<usize> = active
                .moves
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.remaining > 0)
                .map(|(index, _)| index)
                .collect();
            if usable.is_empty() {
                0
            } else {
                let pick = world.rng.random_int(random, usable.len() as u32) as usize;
                usable[pick]
            }
        }
        None => 0,
    };

    battle
        .queued
        .push((BattleSide::Opponent, BattleAction::Move { slot }));
    Ok(())
}

/// Resolves one full turn from the queued actions.
///
/// Ordering: flee, then switches, then items, then moves; moves order by
/// schema priority, then active speed, and the player wins exact ties.
///
/// # Errors
///
/// Requires the move oracle and random source. Unknown move titles abort
/// the turn with a content error.
pub fn resolve_turn(world: &mut WorldState, env: &Env<'_>) -> Result<(), BattleError> {
    let Some(mut battle) = world.battle.take() else {
        return Err(BattleError::NoActiveBattle);
    };
    let result = run_turn(&mut battle, &mut world.rng, env);
    world.battle = Some(battle);
    result
}

fn side_index(side: BattleSide) -> u8 {
    match side {
        BattleSide::Player => 0,
        BattleSide::Opponent => 1,
    }
}

fn run_turn(
    battle: &mut BattleState,
    rng: &mut WorldRng,
    env: &Env<'_>,
) -> Result<(), BattleError> {
    let moves = env.moves()?;
    let random = env.random()?;

    let mut queued = std::mem::take(&mut battle.queued);
    queued.sort_by_key(|(side, action)| {
        let priority = match action {
            BattleAction::Move { slot } => battle
                .team(*side)
                .active()
                .and_then(|active| active.moves.get(*slot))
                .and_then(|known| moves.move_schema(&known.title))
                .map(|schema| schema.priority)
                .unwrap_or(0),
            _ => 0,
        };
        let speed = battle
            .team(*side)
            .active()
            .map(|active| active.statistics.speed.current)
            .unwrap_or(0);
        (
            action.rank(),
            -i16::from(priority),
            std::cmp::Reverse(speed),
            side_index(*side),
        )
    });

    for (side, action) in queued {
        if matches!(battle.phase, BattlePhase::Ended(_)) {
            break;
        }
        match action {
            BattleAction::Flee => attempt_flee(battle, rng, random, env),
            BattleAction::Switch { slot } => {
                battle.team_mut(side).selected = slot;
                if matches!(battle.phase, BattlePhase::AwaitingSwitch { side: waiting } if waiting == side)
                {
                    battle.phase = BattlePhase::Selecting;
                }
            }
            BattleAction::Item { .. } => {
                // Items restore health; a richer item system lives outside
                // the battle core.
                if let Some(active) = battle.team_mut(side).active_mut() {
                    active.statistics.health.heal(20);
                }
            }
            BattleAction::Move { slot } => {
                if battle.team(side).active_fainted() {
                    continue;
                }
                execute_move(battle, side, slot, moves, rng, random, env)?;
            }
        }
    }

    battle.turn += 1;
    Ok(())
}

/// Escape odds follow the classic speed-ratio formula, improving with each
/// failed attempt.
fn attempt_flee(
    battle: &mut BattleState,
    rng: &mut WorldRng,
    random: &dyn RandomSource,
    env: &Env<'_>,
) {
    let player_speed = battle
        .player
        .active()
        .map(|active| u32::from(active.statistics.speed.current))
        .unwrap_or(0);
    let opponent_speed = battle
        .opponent
        .active()
        .map(|active| u32::from(active.statistics.speed.current))
        .unwrap_or(1);

    let divisor = ((opponent_speed / 4) % 256).max(1);
    let odds = player_speed * 32 / divisor + 30 * battle.flee_attempts;

    if odds >= 256 || rng.random_int(random, 256) < odds {
        battle.phase = BattlePhase::Ended(BattleOutcome::Fled);
    } else {
        battle.flee_attempts += 1;
        env.fire(WorldEvent::Custom {
            name: "flee_failed".to_owned(),
        });
    }
}

fn execute_move(
    battle: &mut BattleState,
    side: BattleSide,
    slot: usize,
    moves: &dyn MoveOracle,
    rng: &mut WorldRng,
    random: &dyn RandomSource,
    env: &Env<'_>,
) -> Result<(), BattleError> {
    let (title, level, attack) = {
        let Some(attacker) = battle.team(side).active() else {
            return Ok(());
        };
        let Some(known) = attacker.moves.get(slot) else {
            return Ok(());
        };
        (
            known.title.clone(),
            attacker.level,
            u32::from(attacker.statistics.attack.current),
        )
    };

    let schema = moves
        .move_schema(&title)
        .ok_or_else(|| ContentError::UnknownMove(title.clone()))?
        .clone();

    if let Some(attacker) = battle.team_mut(side).active_mut()
        && let Some(known) = attacker.moves.get_mut(slot)
    {
        known.remaining = known.remaining.saturating_sub(1);
    }

    if let Some(accuracy) = schema.accuracy
        && rng.random_int(random, 100) >= u32::from(accuracy)
    {
        return Ok(());
    }

    let target = side.opponent();
    for effect in &schema.effects {
        match effect {
            MoveEffectSchema::Damage { power } => {
                let defense = battle
                    .team(target)
                    .active()
                    .map(|defender| u32::from(defender.statistics.defense.current))
                    .unwrap_or(1);
                let variance = rng.random_int_within(
                    random,
                    GameConfig::DAMAGE_VARIANCE_MIN,
                    GameConfig::DAMAGE_VARIANCE_MAX,
                );
                let amount = damage(level, *power, attack, defense, variance);
                if let Some(defender) = battle.team_mut(target).active_mut() {
                    defender.statistics.health.damage(amount);
                }
                if battle.team(target).active_fainted() {
                    handle_faint(battle, target, env);
                    return Ok(());
                }
            }
            MoveEffectSchema::StatStage {
                stat,
                stages,
                on_self,
            } => {
                let affected = if *on_self { side } else { target };
                if let Some(actor) = battle.team_mut(affected).active_mut() {
                    apply_stat_stages(actor, *stat, *stages);
                }
            }
            MoveEffectSchema::Status { status } => {
                if let Some(defender) = battle.team_mut(target).active_mut()
                    && defender.status.is_none()
                {
                    defender.status = Some(status.clone());
                }
            }
        }
    }

    Ok(())
}

/// The classic damage formula with its 217-255/255 variance factor.
/// Saturates instead of overflowing on extreme inputs.
pub fn damage(level: u8, power: u32, attack: u32, defense: u32, variance: u32) -> u16 {
    let base = (2 * u32::from(level) / 5 + 2)
        .saturating_mul(power)
        .saturating_mul(attack)
        / defense.max(1)
        / 50
        + 2;
    let varied = base.saturating_mul(variance) / 255;
    varied.min(u32::from(u16::MAX)) as u16
}

/// Stat stages scale the live statistic up or down by half per stage,
/// clamped to a sane range.
fn apply_stat_stages(actor: &mut super::BattleActor, stat: StatKind, stages: i8) {
    let statistic = match stat {
        StatKind::Attack => &mut actor.statistics.attack,
        StatKind::Defense => &mut actor.statistics.defense,
        StatKind::Special => &mut actor.statistics.special,
        StatKind::Speed => &mut actor.statistics.speed,
    };
    let mut value = u32::from(statistic.current);
    if stages >= 0 {
        for _ in 0..stages {
            value = value * 3 / 2;
        }
    } else {
        for _ in 0..stages.unsigned_abs() {
            value = value * 2 / 3;
        }
    }
    statistic.current = value.clamp(1, u32::from(u16::MAX)) as u16;
}

fn handle_faint(battle: &mut BattleState, side: BattleSide, env: &Env<'_>) {
    let fainted_title = battle
        .team(side)
        .active()
        .map(|actor| actor.title.clone())
        .unwrap_or_default();
    let fainted_level = battle.team(side).active().map(|actor| actor.level).unwrap_or(0);

    env.fire(WorldEvent::Knockout {
        team: side,
        actor: fainted_title.clone(),
    });

    // Knocking out an opponent pays experience to the player's active actor.
    if side == BattleSide::Opponent
        && let Ok(species) = env.species()
    {
        let amount = experience::experience_gained(species, &fainted_title, fainted_level);
        if let Some(active) = battle.player.active_mut() {
            experience::gain_experience(active, amount, env);
        }
    }

    if battle.team(side).has_live() {
        battle.phase = BattlePhase::AwaitingSwitch { side };
    } else {
        battle.phase = BattlePhase::Ended(match side {
            BattleSide::Opponent => BattleOutcome::Victory,
            BattleSide::Player => BattleOutcome::Defeat,
        });
    }
}

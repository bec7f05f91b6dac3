//! The battle pipeline: a self-contained turn engine the overworld hands
//! control to.
//!
//! While [`WorldState::battle`](crate::state::WorldState) is set, the
//! engine's overworld tick suspends entirely; the runtime drives battles by
//! queuing actions and resolving turns. The party and the battle roster are
//! separate copies, reconciled once at battle end.

mod actions;
mod actor;
mod experience;
mod turn;

pub use actions::{BattleAction, BattleActionError, queue_action};
pub use actor::{BattleActor, MoveSlot, Statistic, StatisticSet};
pub use experience::{experience_gained, gain_experience};
pub use turn::{damage, queue_opponent_action, resolve_turn};

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{BattleSide, Env, OracleError, WorldEvent};
use crate::error::{ContentError, ErrorSeverity, GameError};
use crate::state::WorldState;

/// What kind of battle is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleKind {
    Wild,
    Trainer,
}

/// How a finished battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Where the battle currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    /// Both sides are choosing actions.
    Selecting,

    /// One side's active actor fainted; it must switch before anything
    /// else happens.
    AwaitingSwitch { side: BattleSide },

    Ended(BattleOutcome),
}

/// One side's roster and active selection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleTeam {
    pub actors: ArrayVec<BattleActor, { GameConfig::MAX_PARTY }>,
    pub selected: usize,

    /// Trainer name for trainer battles.
    pub trainer: Option<String>,
}

impl BattleTeam {
    /// Builds a team from up to [`GameConfig::MAX_PARTY`] actors.
    pub fn new(actors: Vec<BattleActor>) -> Self {
        let mut roster = ArrayVec::new();
        for actor in actors.into_iter().take(GameConfig::MAX_PARTY) {
            roster.push(actor);
        }
        Self {
            actors: roster,
            selected: 0,
            trainer: None,
        }
    }

    pub fn active(&self) -> Option<&BattleActor> {
        self.actors.get(self.selected)
    }

    pub fn active_mut(&mut self) -> Option<&mut BattleActor> {
        self.actors.get_mut(self.selected)
    }

    pub fn active_fainted(&self) -> bool {
        self.active().is_none_or(BattleActor::fainted)
    }

    /// Whether any roster member can still fight.
    pub fn has_live(&self) -> bool {
        self.actors.iter().any(|actor| !actor.fainted())
    }
}

/// The full state of a running battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub kind: BattleKind,
    pub phase: BattlePhase,
    pub player: BattleTeam,
    pub opponent: BattleTeam,

    /// Actions queued for the turn, at most one per side.
    pub queued: Vec<(BattleSide, BattleAction)>,

    pub turn: u32,

    /// Failed escape attempts, which sweeten the next attempt's odds.
    pub flee_attempts: u32,
}

impl BattleState {
    pub fn team(&self, side: BattleSide) -> &BattleTeam {
        match side {
            BattleSide::Player => &self.player,
            BattleSide::Opponent => &self.opponent,
        }
    }

    pub fn team_mut(&mut self, side: BattleSide) -> &mut BattleTeam {
        match side {
            BattleSide::Player => &mut self.player,
            BattleSide::Opponent => &mut self.opponent,
        }
    }
}

/// Failures while running the battle pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("no battle in progress")]
    NoActiveBattle,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveBattle => ErrorSeverity::Validation,
            Self::Oracle(error) => error.severity(),
            Self::Content(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveBattle => "BATTLE_NO_ACTIVE",
            Self::Oracle(error) => error.error_code(),
            Self::Content(error) => error.error_code(),
        }
    }
}

/// Starts a wild battle against a single opponent of the given species.
///
/// Freezes the overworld: menu mode is entered and the tick loop suspends
/// until [`end_battle`] runs.
///
/// # Errors
///
/// Requires the species oracle; unknown species are content errors.
pub fn start_wild(
    world: &mut WorldState,
    env: &Env<'_>,
    title: &str,
    level: u8,
) -> Result<(), BattleError> {
    let species = env.species()?;
    let mut opponent = BattleActor::from_species(species, title, level)?;
    if opponent.moves.is_empty() {
        opponent = opponent.with_move("Tackle", 35);
    }

    world.battle = Some(BattleState {
        kind: BattleKind::Wild,
        phase: BattlePhase::Selecting,
        player: BattleTeam::new(world.party.clone()),
        opponent: BattleTeam::new(vec![opponent]),
        queued: Vec::new(),
        turn: 0,
        flee_attempts: 0,
    });
    world.screen.in_menu = true;
    env.fire(WorldEvent::BattleStarted);
    Ok(())
}

/// Starts a trainer battle against a named trainer's roster.
pub fn start_trainer(
    world: &mut WorldState,
    env: &Env<'_>,
    trainer: &str,
    roster: Vec<BattleActor>,
) {
    let mut opponent = BattleTeam::new(roster);
    opponent.trainer = Some(trainer.to_owned());

    world.battle = Some(BattleState {
        kind: BattleKind::Trainer,
        phase: BattlePhase::Selecting,
        player: BattleTeam::new(world.party.clone()),
        opponent,
        queued: Vec::new(),
        turn: 0,
        flee_attempts: 0,
    });
    world.screen.in_menu = true;
    env.fire(WorldEvent::BattleStarted);
}

/// Tears the battle down and reconciles the player's party with the
/// battle roster (damage, experience, and level changes persist).
pub fn end_battle(world: &mut WorldState, env: &Env<'_>) -> Option<BattleOutcome> {
    let battle = world.battle.take()?;
    let outcome = match battle.phase {
        BattlePhase::Ended(outcome) => Some(outcome),
        _ => None,
    };

    world.party = battle.player.actors.to_vec();
    world.screen.in_menu = false;
    env.fire(WorldEvent::BattleEnded);
    outcome
}

/// Rolls for a wild encounter after a walking segment ended in grass.
///
/// Returns true when a battle started. Degrades to no encounter when the
/// needed collaborators (maps, species, random) are not wired in, or when
/// the player has no party to fight with.
pub fn grass_encounter_check(world: &mut WorldState, env: &Env<'_>) -> Result<bool, ContentError> {
    let (Ok(maps), Ok(random), Ok(_)) = (env.maps(), env.random(), env.species()) else {
        return Ok(false);
    };
    if world.party.is_empty() || world.battle.is_some() {
        return Ok(false);
    }

    let Some(area) = maps.area(&world.screen.map_name, &world.screen.area_name) else {
        return Ok(false);
    };
    if area.wild_grass.is_empty() || area.encounter_rate == 0 {
        return Ok(false);
    }

    if world.rng.random_int(random, 256) >= area.encounter_rate {
        return Ok(false);
    }

    // Weighted species pick, then a uniform level from its table.
    let total: u32 = area.wild_grass.iter().map(|entry| entry.rate).sum();
    let mut draw = world.rng.random_int(random, total.max(1));
    let mut chosen = &area.wild_grass[0];
    for entry in &area.wild_grass {
        if draw < entry.rate {
            chosen = entry;
            break;
        }
        draw -= entry.rate;
    }
    let level = if chosen.levels.is_empty() {
        2
    } else {
        let pick = world.rng.random_int(random, chosen.levels.len() as u32) as usize;
        chosen.levels[pick]
    };

    let title = chosen.title.clone();
    match start_wild(world, env, &title, level) {
        Ok(()) => Ok(true),
        Err(BattleError::Content(error)) => Err(error),
        Err(_) => Ok(false),
    }
}

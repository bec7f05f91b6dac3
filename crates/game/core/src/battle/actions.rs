//! Battle actions: validation at queue time and priority ordering.

use crate::env::BattleSide;
use crate::error::{ErrorSeverity, GameError};

use super::{BattlePhase, BattleState};

/// One action a side can take for the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    /// Use the move in the given roster slot.
    Move { slot: usize },

    /// Use an item by title.
    Item { title: String },

    /// Swap the active actor for the one in the given roster slot.
    Switch { slot: usize },

    /// Attempt to run from a wild battle.
    Flee,
}

impl BattleAction {
    /// Coarse ordering bracket: flee resolves before switches, switches
    /// before items, items before moves.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Flee => 0,
            Self::Switch { .. } => 1,
            Self::Item { .. } => 2,
            Self::Move { .. } => 3,
        }
    }
}

/// Rejections raised when queuing an action. All are validation errors:
/// the submitting side re-prompts with corrected input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleActionError {
    #[error("no battle in progress")]
    NoActiveBattle,

    #[error("actions cannot be queued in the current phase")]
    NotSelecting,

    #[error("a replacement must be switched in first")]
    SwitchRequired,

    #[error("side already queued an action this turn")]
    AlreadyQueued,

    #[error("no move in slot {0}")]
    InvalidMoveSlot(usize),

    #[error("move {0:?} has no uses left")]
    MoveExhausted(String),

    #[error("no actor in slot {0}")]
    InvalidSwitchSlot(usize),

    #[error("actor in slot {0} has fainted")]
    SwitchTargetFainted(usize),

    #[error("actor in slot {0} is already active")]
    SwitchTargetActive(usize),

    #[error("cannot flee a trainer battle")]
    FleeFromTrainer,
}

impl GameError for BattleActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveBattle => "BATTLE_NO_ACTIVE",
            Self::NotSelecting => "BATTLE_NOT_SELECTING",
            Self::SwitchRequired => "BATTLE_SWITCH_REQUIRED",
            Self::AlreadyQueued => "BATTLE_ALREADY_QUEUED",
            Self::InvalidMoveSlot(_) => "BATTLE_INVALID_MOVE_SLOT",
            Self::MoveExhausted(_) => "BATTLE_MOVE_EXHAUSTED",
            Self::InvalidSwitchSlot(_) => "BATTLE_INVALID_SWITCH_SLOT",
            Self::SwitchTargetFainted(_) => "BATTLE_SWITCH_TARGET_FAINTED",
            Self::SwitchTargetActive(_) => "BATTLE_SWITCH_TARGET_ACTIVE",
            Self::FleeFromTrainer => "BATTLE_FLEE_FROM_TRAINER",
        }
    }
}

/// Validates and queues an action for a side.
///
/// During `AwaitingSwitch`, only the named side may act and only with a
/// switch; everything else waits for the replacement.
pub fn queue_action(
    battle: &mut BattleState,
    side: BattleSide,
    action: BattleAction,
) -> Result<(), BattleActionError> {
    match battle.phase {
        BattlePhase::Selecting => {}
        BattlePhase::AwaitingSwitch { side: waiting } => {
            if waiting != side || !matches!(action, BattleAction::Switch { .. }) {
                return Err(BattleActionError::SwitchRequired);
            }
        }
        BattlePhase::Ended(_) => return Err(BattleActionError::NotSelecting),
    }

    if battle.queued.iter().any(|(queued, _)| *queued == side) {
        return Err(BattleActionError::AlreadyQueued);
    }

    let team = battle.team(side);
    match &action {
        BattleAction::Move { slot } => {
            let active = team.active().ok_or(BattleActionError::InvalidMoveSlot(*slot))?;
            let known = active
                .moves
                .get(*slot)
                .ok_or(BattleActionError::InvalidMoveSlot(*slot))?;
            if known.remaining == 0 {
                return Err(BattleActionError::MoveExhausted(known.title.clone()));
            }
        }
        BattleAction::Switch { slot } => {
            let target = team
                .actors
                .get(*slot)
                .ok_or(BattleActionError::InvalidSwitchSlot(*slot))?;
            if target.fainted() {
                return Err(BattleActionError::SwitchTargetFainted(*slot));
            }
            if *slot == team.selected && !team.active_fainted() {
                return Err(BattleActionError::SwitchTargetActive(*slot));
            }
        }
        BattleAction::Flee => {
            if battle.kind == super::BattleKind::Trainer {
                return Err(BattleActionError::FleeFromTrainer);
            }
        }
        BattleAction::Item { .. } => {}
    }

    battle.queued.push((side, action));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleKind, BattleOutcome, BattleTeam, test_support};

    fn wild_battle() -> BattleState {
        BattleState {
            kind: BattleKind::Wild,
            phase: BattlePhase::Selecting,
            player: BattleTeam::new(vec![test_support::actor("Squirtle", 5)]),
            opponent: BattleTeam::new(vec![test_support::actor("Rattata", 3)]),
            queued: Vec::new(),
            turn: 0,
            flee_attempts: 0,
        }
    }

    #[test]
    fn exhausted_move_is_rejected() {
        let mut battle = wild_battle();
        battle.player.actors[0].moves[0].remaining = 0;
        let title = battle.player.actors[0].moves[0].title.clone();

        let result = queue_action(&mut battle, BattleSide::Player, BattleAction::Move { slot: 0 });

        assert_eq!(result, Err(BattleActionError::MoveExhausted(title)));
    }

    #[test]
    fn flee_is_wild_only() {
        let mut battle = wild_battle();
        battle.kind = BattleKind::Trainer;

        let result = queue_action(&mut battle, BattleSide::Player, BattleAction::Flee);

        assert_eq!(result, Err(BattleActionError::FleeFromTrainer));
    }

    #[test]
    fn one_action_per_side_per_turn() {
        let mut battle = wild_battle();
        queue_action(&mut battle, BattleSide::Player, BattleAction::Move { slot: 0 }).unwrap();

        let result = queue_action(&mut battle, BattleSide::Player, BattleAction::Flee);

        assert_eq!(result, Err(BattleActionError::AlreadyQueued));
    }

    #[test]
    fn awaiting_switch_rejects_everything_but_the_switch() {
        let mut battle = wild_battle();
        battle.player.actors.push(test_support::actor("Pidgey", 4));
        battle.phase = BattlePhase::AwaitingSwitch {
            side: BattleSide::Player,
        };

        let result = queue_action(&mut battle, BattleSide::Player, BattleAction::Move { slot: 0 });
        assert_eq!(result, Err(BattleActionError::SwitchRequired));

        queue_action(
            &mut battle,
            BattleSide::Player,
            BattleAction::Switch { slot: 1 },
        )
        .unwrap();
    }

    #[test]
    fn ended_battle_accepts_nothing() {
        let mut battle = wild_battle();
        battle.phase = BattlePhase::Ended(BattleOutcome::Fled);

        let result = queue_action(&mut battle, BattleSide::Player, BattleAction::Flee);

        assert_eq!(result, Err(BattleActionError::NotSelecting));
    }
}

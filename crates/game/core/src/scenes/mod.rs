//! Scene routines: scripted sequences driving the movement and battle
//! primitives.
//!
//! A routine is pure data, a named list of [`SceneStep`]s. The
//! [`SceneDirector`] owns the registered routines and at most one active
//! playback; advancement travels through the timeline as
//! [`StepKind::SceneAdvance`] steps, so a running scene is inspectable and
//! cancellation is a single operation (clearing the active slot strands
//! every pending advance step).

use std::collections::HashMap;

use crate::battle;
use crate::collision::DIALOG_MENU;
use crate::env::{DialogFinish, Env, WorldEvent};
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::Direction;
use crate::movement;
use crate::state::{ThingId, WorldState};
use crate::timeline::{StepKind, Timeline};

/// One scripted instruction. Steps are data so routines can be authored,
/// serialized, and inspected without touching engine internals.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SceneStep {
    /// Turn a character to face a direction.
    Face { target: ThingId, direction: Direction },

    /// Walk a character a number of whole blocks.
    WalkSteps {
        target: ThingId,
        direction: Direction,
        blocks: u32,
    },

    /// Freeze a character in place, stopping any walk in progress.
    Freeze { target: ThingId },

    /// Release a frozen character.
    Thaw { target: ThingId },

    /// Open a dialog; playback resumes when the player dismisses it.
    Dialog { lines: Vec<String> },

    /// Idle for a number of ticks.
    Wait { ticks: u64 },

    /// Broadcast a named event.
    FireEvent { name: String },

    /// Enter a wild battle. Playback resumes once the battle ends and the
    /// overworld thaws.
    StartWildBattle { title: String, level: u8 },

    /// Finish the routine.
    End,
}

/// A named, ordered sequence of steps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneRoutine {
    pub name: String,
    pub steps: Vec<SceneStep>,
}

impl SceneRoutine {
    pub fn new(name: impl Into<String>, steps: Vec<SceneStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }
}

/// Errors raised while playing a scene routine.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A playback was requested for a routine nobody registered.
    #[error("unknown scene routine {0:?}")]
    UnknownRoutine(String),

    /// A battle step failed to start.
    #[error(transparent)]
    Battle(#[from] battle::BattleError),
}

impl GameError for SceneError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownRoutine(_) => ErrorSeverity::Fatal,
            Self::Battle(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownRoutine(_) => "SCENE_UNKNOWN_ROUTINE",
            Self::Battle(inner) => inner.error_code(),
        }
    }
}

/// Playback cursor for the routine currently on stage.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ActiveScene {
    routine: String,
    index: usize,

    /// Blocks left in a multi-block walk step, zero outside one.
    walk_remaining: u32,
}

/// Registry and playback head for scene routines. At most one routine
/// plays at a time; starting another cancels the current one.
#[derive(Debug, Default)]
pub struct SceneDirector {
    routines: HashMap<String, SceneRoutine>,
    active: Option<ActiveScene>,
}

impl SceneDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a routine, replacing any previous one of the same name.
    pub fn register(&mut self, routine: SceneRoutine) {
        self.routines.insert(routine.name.clone(), routine);
    }

    /// Name of the routine currently playing, if any.
    pub fn active_routine(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.routine.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a routine from its first step on the next tick.
    ///
    /// # Errors
    ///
    /// Unregistered routines are errors.
    pub fn play(
        &mut self,
        world: &WorldState,
        timeline: &mut Timeline,
        name: &str,
    ) -> Result<(), SceneError> {
        if !self.routines.contains_key(name) {
            return Err(SceneError::UnknownRoutine(name.to_owned()));
        }
        self.active = Some(ActiveScene {
            routine: name.to_owned(),
            index: 0,
            walk_remaining: 0,
        });
        timeline.add_event(
            world.clock,
            1,
            None,
            StepKind::SceneAdvance {
                routine: name.to_owned(),
                index: 0,
            },
        );
        Ok(())
    }

    /// Stops playback. Pending advance steps for the cancelled routine
    /// become no-ops.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Resumes playback at a step, used when a dialog's completion hands
    /// back a [`DialogFinish::AdvanceScene`].
    pub fn resume(
        &mut self,
        world: &mut WorldState,
        env: &Env<'_>,
        timeline: &mut Timeline,
        routine: &str,
        index: usize,
    ) -> Result<(), SceneError> {
        if let Some(active) = &mut self.active
            && active.routine == routine
        {
            active.index = index;
            active.walk_remaining = 0;
        } else {
            return Ok(());
        }
        self.advance(world, env, timeline, routine, index)
    }

    /// Runs one step of the active routine. Called by the engine for each
    /// due [`StepKind::SceneAdvance`]; stale steps from a cancelled or
    /// superseded playback are silently dropped.
    ///
    /// # Errors
    ///
    /// Propagates battle-start failures from battle steps.
    pub fn advance(
        &mut self,
        world: &mut WorldState,
        env: &Env<'_>,
        timeline: &mut Timeline,
        routine: &str,
        index: usize,
    ) -> Result<(), SceneError> {
        let matches = self
            .active
            .as_ref()
            .is_some_and(|active| active.routine == routine && active.index == index);
        if !matches {
            return Ok(());
        }

        let Some(step) = self
            .routines
            .get(routine)
            .and_then(|record| record.steps.get(index))
            .cloned()
        else {
            self.active = None;
            return Ok(());
        };

        match step {
            SceneStep::Face { target, direction } => {
                movement::set_direction(world, env, &target, direction);
                self.schedule_next(world, timeline, routine, index, 1);
            }
            SceneStep::WalkSteps {
                target,
                direction,
                blocks,
            } => {
                let remaining = {
                    let Some(active) = self.active.as_mut() else {
                        return Ok(());
                    };
                    if active.walk_remaining == 0 {
                        active.walk_remaining = blocks.max(1);
                    }
                    active.walk_remaining -= 1;
                    active.walk_remaining
                };

                let speed = world
                    .groups
                    .character(&target)
                    .map(|character| character.speed)
                    .unwrap_or(world.config.unit);
                let ticks = world.config.ticks_per_block(speed);
                movement::start_walking(world, env, timeline, &target, direction);

                if remaining > 0 {
                    // Same step again for the next block.
                    timeline.add_event(
                        world.clock,
                        ticks + 1,
                        None,
                        StepKind::SceneAdvance {
                            routine: routine.to_owned(),
                            index,
                        },
                    );
                } else {
                    self.schedule_next(world, timeline, routine, index, ticks + 1);
                }
            }
            SceneStep::Freeze { target } => {
                movement::stop_walking(world, env, timeline, &target);
                if let Some(character) = world.groups.character_mut(&target) {
                    character.frozen = true;
                }
                self.schedule_next(world, timeline, routine, index, 1);
            }
            SceneStep::Thaw { target } => {
                if let Some(character) = world.groups.character_mut(&target) {
                    character.frozen = false;
                }
                self.schedule_next(world, timeline, routine, index, 1);
            }
            SceneStep::Dialog { lines } => match env.menus() {
                Some(menus) => {
                    menus.create_menu(DIALOG_MENU);
                    menus.add_menu_dialog(
                        DIALOG_MENU,
                        &lines,
                        DialogFinish::AdvanceScene {
                            routine: routine.to_owned(),
                            step: index + 1,
                        },
                    );
                    menus.set_active_menu(DIALOG_MENU);
                    if let Some(active) = &mut self.active {
                        // Park the cursor past the end until the dialog
                        // resumes us; interim advance steps are stale.
                        active.index = usize::MAX;
                    }
                }
                None => {
                    self.schedule_next(world, timeline, routine, index, 1);
                }
            },
            SceneStep::Wait { ticks } => {
                self.schedule_next(world, timeline, routine, index, ticks.max(1));
            }
            SceneStep::FireEvent { name } => {
                env.fire(WorldEvent::Custom { name });
                self.schedule_next(world, timeline, routine, index, 1);
            }
            SceneStep::StartWildBattle { title, level } => {
                battle::start_wild(world, env, &title, level)?;
                self.schedule_next(world, timeline, routine, index, 1);
            }
            SceneStep::End => {
                self.active = None;
            }
        }
        Ok(())
    }

    fn schedule_next(
        &mut self,
        world: &WorldState,
        timeline: &mut Timeline,
        routine: &str,
        index: usize,
        delay: u64,
    ) {
        let next = index + 1;
        if let Some(active) = &mut self.active {
            active.index = next;
        }
        timeline.add_event(
            world.clock,
            delay,
            None,
            StepKind::SceneAdvance {
                routine: routine.to_owned(),
                index: next,
            },
        );
    }
}

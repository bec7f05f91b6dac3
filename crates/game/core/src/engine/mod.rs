//! The per-tick upkeep driver.
//!
//! [`Engine::tick`] advances the logical clock and runs the fixed phase
//! order: due timeline steps, the collision pass, the movement shift pass,
//! viewport follow, and registry maintenance. Faults abandon the step or
//! contact that raised them and the tick continues; nothing inside a tick
//! panics the loop.
//!
//! An active battle freezes the overworld wholesale: the clock does not
//! advance, so timeline steps hold their relative timing and resume
//! exactly where they left off when the battle ends.

use crate::collision::{self, CollisionSignal, HitRegistry};
use crate::env::{Env, WorldEvent};
use crate::error::{ErrorSeverity, GameError};
use crate::maps::{self, DetectorAction};
use crate::movement::{self, ledges, roam};
use crate::scenes::SceneDirector;
use crate::state::{ThingId, Tick, TransportTarget, WorldState};
use crate::timeline::{ScheduledStep, StepKind, Timeline};

/// Side effects a tick hands up to the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineSignal {
    /// An armed transporter fired; the runtime performs the map switch.
    Transition {
        thing: ThingId,
        target: TransportTarget,
    },

    /// A battle began during this tick; the overworld is now frozen.
    BattleStarted,
}

/// One abandoned step or contact, with whatever was known about it.
#[derive(Clone, Debug)]
pub struct TickFault {
    pub thing: Option<ThingId>,
    pub severity: ErrorSeverity,
    pub code: &'static str,
    pub message: String,
}

impl TickFault {
    fn from_error(thing: Option<ThingId>, error: &dyn GameError) -> Self {
        Self {
            thing,
            severity: error.severity(),
            code: error.error_code(),
            message: error.to_string(),
        }
    }
}

/// Everything one tick produced.
#[derive(Debug, Default)]
pub struct TickReport {
    pub tick: Tick,
    pub signals: Vec<EngineSignal>,
    pub faults: Vec<TickFault>,

    /// Things swept by the maintenance phase this tick.
    pub removed: Vec<ThingId>,
}

/// The fixed-phase tick driver. Holds only configuration (the hit
/// registry); all mutable state lives in the world, timeline, and scene
/// director passed to each tick.
#[derive(Debug)]
pub struct Engine {
    hits: HitRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            hits: HitRegistry::standard(),
        }
    }

    /// Replaces the standard hit registry.
    pub fn with_registry(hits: HitRegistry) -> Self {
        Self { hits }
    }

    /// Runs one tick of overworld upkeep.
    pub fn tick(
        &self,
        world: &mut WorldState,
        env: &Env<'_>,
        timeline: &mut Timeline,
        scenes: &mut SceneDirector,
    ) -> TickReport {
        let mut report = TickReport {
            tick: world.clock,
            ..TickReport::default()
        };

        if world.battle.is_some() {
            return report;
        }

        world.clock = world.clock + 1;
        report.tick = world.clock;

        let now = world.clock;
        for step in timeline.take_due(now) {
            self.run_step(world, env, timeline, scenes, step, &mut report);
            if world.battle.is_some() {
                // A step started a battle; the rest of the tick is frozen.
                report.signals.push(EngineSignal::BattleStarted);
                return report;
            }
        }

        let collisions = collision::detect(world, env, timeline, &self.hits);
        for signal in collisions.signals {
            match signal {
                CollisionSignal::Transport { thing, target } => {
                    report
                        .signals
                        .push(EngineSignal::Transition { thing, target });
                }
            }
        }
        for (thing, error) in collisions.faults {
            report
                .faults
                .push(TickFault::from_error(Some(thing), &error));
        }
        if world.battle.is_some() {
            report.signals.push(EngineSignal::BattleStarted);
            return report;
        }

        movement::maintain_characters(world);
        movement::maintain_player(world);

        // Snapshot the dead before the sweep so their state survives a
        // return to this area.
        for thing in world.groups.all_things() {
            if !thing.alive {
                maps::persist_thing(env, thing);
            }
        }
        report.removed = world.groups.maintain();

        report
    }

    /// Dispatches one due step and requeues it when its repeat is still
    /// wanted. Requeue guards check the step is still the character's
    /// current one: a walk restarted mid-tick re-schedules its own steps,
    /// and the stale handles must not resurrect.
    fn run_step(
        &self,
        world: &mut WorldState,
        env: &Env<'_>,
        timeline: &mut Timeline,
        scenes: &mut SceneDirector,
        mut step: ScheduledStep,
        report: &mut TickReport,
    ) {
        match step.kind.clone() {
            StepKind::WalkSegmentDone { character } => {
                match movement::on_walk_segment_done(world, env, timeline, &character) {
                    Ok(true) => {
                        let current = world
                            .groups
                            .character(&character)
                            .is_some_and(|c| c.walking && c.walk_step == Some(step.handle));
                        if current {
                            timeline.requeue(step);
                        }
                    }
                    Ok(false) => {}
                    Err(error) => {
                        report
                            .faults
                            .push(TickFault::from_error(Some(character), &error));
                    }
                }
            }
            StepKind::ClassCycle {
                character,
                classes,
                index,
            } => {
                let next = movement::class_cycle(world, env, &character, &classes, index);
                let current = world
                    .groups
                    .character(&character)
                    .is_some_and(|c| c.class_cycle == Some(step.handle));
                if current {
                    step.kind = StepKind::ClassCycle {
                        character,
                        classes,
                        index: next,
                    };
                    timeline.requeue(step);
                }
            }
            StepKind::WalkFlipToggle { character } => {
                movement::walk_flip_toggle(world, env, &character);
                let current = world
                    .groups
                    .character(&character)
                    .is_some_and(|c| c.flip_step == Some(step.handle));
                if current {
                    timeline.requeue(step);
                }
            }
            StepKind::RoamPulse { character } => {
                match roam::roam_pulse(world, env, timeline, &character) {
                    Ok(()) => {
                        if self.owner_alive(world, &step) {
                            timeline.requeue(step);
                        }
                    }
                    Err(error) => {
                        report
                            .faults
                            .push(TickFault::from_error(Some(character), &error));
                    }
                }
            }
            StepKind::HopOffsetShift { character } => {
                ledges::hop_offset_shift(world, &character);
                timeline.requeue(step);
            }
            StepKind::HopInvert { character } => {
                ledges::hop_invert(world, &character);
            }
            StepKind::HopEnd { character } => {
                ledges::end_ledge_hop(world, env, timeline, &character);
            }
            StepKind::ShadowFollow { character } => {
                ledges::shadow_follow(world, &character);
                if self.owner_alive(world, &step) {
                    timeline.requeue(step);
                }
            }
            StepKind::DeferredWalkStart {
                character,
                direction,
            } => {
                movement::on_deferred_walk_start(world, env, timeline, &character, direction);
            }
            StepKind::WindowDetectorPoll { thing } => {
                match maps::on_window_poll(world, env, timeline, &thing) {
                    Ok(Some(DetectorAction::StartScene(routine))) => {
                        if let Err(error) = scenes.play(world, timeline, &routine) {
                            report
                                .faults
                                .push(TickFault::from_error(Some(thing.clone()), &error));
                        }
                    }
                    Ok(Some(DetectorAction::FireEvent(name))) => {
                        env.fire(WorldEvent::Custom { name });
                    }
                    Ok(None) => {}
                    Err(error) => {
                        report
                            .faults
                            .push(TickFault::from_error(Some(thing.clone()), &error));
                    }
                }
                if self.owner_alive(world, &step) {
                    timeline.requeue(step);
                }
            }
            StepKind::SceneAdvance { routine, index } => {
                if let Err(error) = scenes.advance(world, env, timeline, &routine, index) {
                    report.faults.push(TickFault::from_error(None, &error));
                }
            }
        }
    }

    fn owner_alive(&self, world: &WorldState, step: &ScheduledStep) -> bool {
        step.owner
            .as_ref()
            .and_then(|owner| world.groups.thing(owner))
            .is_some_and(|thing| thing.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::PcgRandom;
    use crate::geometry::{Bounds, Direction};
    use crate::state::{CharacterState, GroupKind, ThingState, ThingTraits};

    fn world_with_player() -> WorldState {
        let mut world = WorldState::new(GameConfig::new(), 7);
        world.screen.bounds = Bounds::from_origin(0, 0, 256, 224);
        let thing = ThingState::new(
            ThingId::new("player"),
            "Player",
            GroupKind::Character,
            Bounds::from_origin(64, 64, 16, 16),
        );
        world
            .groups
            .insert_character(CharacterState::new(thing, world.config.unit).into_player());
        world
    }

    fn tick_n(
        engine: &Engine,
        world: &mut WorldState,
        env: &Env<'_>,
        timeline: &mut Timeline,
        scenes: &mut SceneDirector,
        n: u64,
    ) -> Vec<TickReport> {
        (0..n)
            .map(|_| engine.tick(world, env, timeline, scenes))
            .collect()
    }

    #[test]
    fn a_key_press_walks_the_player_one_block() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let env = Env::empty();
        let player = ThingId::new("player");
        let start = world.groups.character(&player).unwrap().bounds().left;

        movement::player_key_down(&mut world, &env, &mut timeline, Direction::Right);
        tick_n(&engine, &mut world, &env, &mut timeline, &mut scenes, 4);
        movement::player_key_up(&mut world, Direction::Right);
        tick_n(&engine, &mut world, &env, &mut timeline, &mut scenes, 20);

        let finish = world.groups.character(&player).unwrap().bounds().left;
        assert_eq!(finish - start, world.config.block_px());
        assert!(!world.groups.character(&player).unwrap().walking);
    }

    #[test]
    fn held_key_chains_segments() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let env = Env::empty();
        let player = ThingId::new("player");
        let start = world.groups.character(&player).unwrap().bounds().left;

        movement::player_key_down(&mut world, &env, &mut timeline, Direction::Right);
        // Two full segments plus slack, key held throughout.
        tick_n(&engine, &mut world, &env, &mut timeline, &mut scenes, 20);

        let finish = world.groups.character(&player).unwrap().bounds().left;
        assert!(finish - start >= 2 * world.config.block_px());
    }

    #[test]
    fn an_active_battle_freezes_the_clock() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let env = Env::empty();

        world.battle = Some(crate::battle::BattleState {
            kind: crate::battle::BattleKind::Wild,
            phase: crate::battle::BattlePhase::Selecting,
            player: crate::battle::BattleTeam::new(Vec::new()),
            opponent: crate::battle::BattleTeam::new(Vec::new()),
            queued: Vec::new(),
            turn: 0,
            flee_attempts: 0,
        });

        let before = world.clock;
        engine.tick(&mut world, &env, &mut timeline, &mut scenes);
        assert_eq!(world.clock, before);

        world.battle = None;
        engine.tick(&mut world, &env, &mut timeline, &mut scenes);
        assert_eq!(world.clock, before + 1);
    }

    #[test]
    fn dead_things_are_swept_and_reported() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let env = Env::empty();

        let rock = ThingId::new("rock");
        world.groups.insert(ThingState::new(
            rock.clone(),
            "Rock",
            GroupKind::Solid,
            Bounds::from_origin(200, 200, 16, 16),
        ));
        movement::kill_normal(&mut world, &env, &mut timeline, &rock);

        let report = engine.tick(&mut world, &env, &mut timeline, &mut scenes);

        assert_eq!(report.removed, vec![rock.clone()]);
        assert!(world.groups.thing(&rock).is_none());
    }

    #[test]
    fn roam_pulses_keep_repeating_while_the_npc_lives() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let random = PcgRandom;
        let env = Env::empty().with_random(&random);

        let npc = ThingId::new("npc");
        let mut traits = ThingTraits::default();
        traits.roaming = true;
        let thing = ThingState::new(
            npc.clone(),
            "Npc",
            GroupKind::Character,
            Bounds::from_origin(160, 160, 16, 16),
        )
        .with_traits(traits);
        world.groups.insert_character(CharacterState::new(thing, 2));
        roam::schedule_roaming(&world, &mut timeline, &npc);

        let period = world.config.roam_period;
        tick_n(
            &engine,
            &mut world,
            &env,
            &mut timeline,
            &mut scenes,
            period + 2,
        );

        // First pulse fired and started a walk; the pulse is requeued.
        assert!(world.groups.character(&npc).unwrap().walking);
        assert!(!timeline.is_empty());
    }

    #[test]
    fn stale_walk_steps_do_not_resurrect_after_a_turn() {
        let engine = Engine::new();
        let mut world = world_with_player();
        let mut timeline = Timeline::new();
        let mut scenes = SceneDirector::new();
        let env = Env::empty();
        let player = ThingId::new("player");

        movement::start_walking(&mut world, &env, &mut timeline, &player, Direction::Right);
        let first_walk = world.groups.character(&player).unwrap().walk_step;
        movement::stop_walking(&mut world, &env, &mut timeline, &player);
        movement::start_walking(&mut world, &env, &mut timeline, &player, Direction::Bottom);
        let second_walk = world.groups.character(&player).unwrap().walk_step;
        assert_ne!(first_walk, second_walk);

        tick_n(&engine, &mut world, &env, &mut timeline, &mut scenes, 40);

        // The replacement walk ran to its grid line and stopped cleanly.
        let character = world.groups.character(&player).unwrap();
        assert!(!character.walking);
        assert_eq!(character.walk_step, None);
    }
}

//! Deterministic tile-world game logic, free of rendering and platform code.
//!
//! `tileworld-core` defines the canonical rules of the overworld (geometry,
//! collision, movement, map streaming) and the battle pipeline, all operating
//! on an explicitly passed [`state::WorldState`]. Everything the core cannot
//! decide alone arrives through the collaborator traits in [`env`], and all
//! per-tick mutation flows through [`engine::Engine::tick`].
pub mod battle;
pub mod collision;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod geometry;
pub mod maps;
pub mod movement;
pub mod scenes;
pub mod state;
pub mod timeline;

pub use battle::{
    BattleAction, BattleActionError, BattleActor, BattleError, BattleKind, BattleOutcome,
    BattlePhase, BattleState, BattleTeam, MoveSlot, Statistic, StatisticSet,
};
pub use config::GameConfig;
pub use engine::{Engine, EngineSignal, TickFault, TickReport};
pub use env::{
    AreaRecord, BaseStatistics, BattleSide, DialogFinish, Env, EventSink, Graphics, KeyValueStore,
    LocationRecord, MapLibrary, MapRecord, MenuSystem, MoveEffectSchema, MoveOracle, MoveSchema,
    OracleError, PcgRandom, PreThing, RandomSource, SpeciesOracle, StatKind, WildEncounter,
    WorldEvent, mix_seed,
};
pub use error::{ContentError, ErrorContext, ErrorSeverity, GameError};
pub use geometry::{Axis, Bounds, Direction};
pub use scenes::{SceneDirector, SceneError, SceneRoutine, SceneStep};
pub use state::{
    AreaKey, AreaStatus, CharacterState, DetectorKind, DialogTable, DirectionKeys, GroupKind,
    GroupsState, GymStatue, HopState, MapScreen, Scrollability, SpawnMarker, ThingId, ThingState,
    ThingTraits, Tick, TransportTarget, WorldRng, WorldState,
};
pub use timeline::{EventHandle, Repeats, ScheduledStep, StepKind, Timeline};

//! The session: one running game wired to concrete providers.
//!
//! A [`Session`] owns the world, timeline, scene director, and the
//! provider set, and exposes the operations an embedding client drives:
//! ticking, key input, dialog dismissal, and battle turns. Map switches
//! signalled by the engine are performed here, after the tick that raised
//! them, so the engine never swaps the ground out from under itself.

use tileworld_content::{ContentFactory, MapCatalog, MoveCatalog, SpeciesCatalog};
use tileworld_core::{
    BattleAction, BattleActor, BattleOutcome, BattlePhase, BattleSide, Direction, Engine,
    EngineSignal, Env, GameConfig, KeyValueStore, PcgRandom, SceneDirector, SceneRoutine,
    TickReport, Timeline, WorldEvent, WorldState, battle, collision, maps, movement,
};

use crate::error::{Result, RuntimeError};
use crate::providers::{
    DialogAdvance, EventBroadcaster, HeadlessMenus, MemoryStore, RecordingGraphics,
};

/// The full provider set backing a session's [`Env`].
pub struct SessionProviders {
    pub maps: MapCatalog,
    pub species: SpeciesCatalog,
    pub moves: MoveCatalog,
    pub random: PcgRandom,
    pub menus: HeadlessMenus,
    pub graphics: RecordingGraphics,
    pub store: Box<dyn KeyValueStore>,
    pub events: EventBroadcaster,
}

impl SessionProviders {
    /// Builds the core-facing environment over these providers.
    pub fn env(&self) -> Env<'_> {
        Env::empty()
            .with_maps(&self.maps)
            .with_species(&self.species)
            .with_moves(&self.moves)
            .with_random(&self.random)
            .with_menus(&self.menus)
            .with_graphics(&self.graphics)
            .with_store(self.store.as_ref())
            .with_events(&self.events)
    }
}

/// Builder for a [`Session`].
pub struct SessionBuilder {
    config: GameConfig,
    seed: u64,
    maps: MapCatalog,
    species: SpeciesCatalog,
    moves: MoveCatalog,
    routines: Vec<SceneRoutine>,
    store: Box<dyn KeyValueStore>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::new(),
            seed: 0,
            maps: MapCatalog::default(),
            species: SpeciesCatalog::default(),
            moves: MoveCatalog::default(),
            routines: Vec::new(),
            store: Box::new(MemoryStore::new()),
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every catalog from a content data directory.
    pub fn from_data_dir(data_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        Ok(Self {
            config: factory.load_config()?,
            maps: factory.load_maps()?,
            species: factory.load_species()?,
            moves: factory.load_moves()?,
            routines: factory.load_scenes()?,
            ..Self::default()
        })
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_maps(mut self, maps: MapCatalog) -> Self {
        self.maps = maps;
        self
    }

    pub fn with_species(mut self, species: SpeciesCatalog) -> Self {
        self.species = species;
        self
    }

    pub fn with_moves(mut self, moves: MoveCatalog) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_scenes(mut self, routines: Vec<SceneRoutine>) -> Self {
        self.routines = routines;
        self
    }

    /// Replaces the default in-memory store.
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn build(self) -> Session {
        let mut scenes = SceneDirector::new();
        for routine in self.routines {
            scenes.register(routine);
        }
        Session {
            engine: Engine::new(),
            world: WorldState::new(self.config, self.seed),
            timeline: Timeline::new(),
            scenes,
            providers: SessionProviders {
                maps: self.maps,
                species: self.species,
                moves: self.moves,
                random: PcgRandom,
                menus: HeadlessMenus::new(),
                graphics: RecordingGraphics::new(),
                store: self.store,
                events: EventBroadcaster::new(),
            },
        }
    }
}

const SAVE_MAP_KEY: &str = "save::map";
const SAVE_LOCATION_KEY: &str = "save::location";
const SAVE_PARTY_KEY: &str = "save::party";

/// One running game.
pub struct Session {
    engine: Engine,
    world: WorldState,
    timeline: Timeline,
    scenes: SceneDirector,
    providers: SessionProviders,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn providers(&self) -> &SessionProviders {
        &self.providers
    }

    /// Takes all world events fired since the last drain.
    pub fn drain_events(&self) -> Vec<WorldEvent> {
        self.providers.events.drain()
    }

    pub fn in_battle(&self) -> bool {
        self.world.battle.is_some()
    }

    /// Sets the viewport size before entering the first map.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.world.screen.bounds =
            tileworld_core::Bounds::from_origin(0, 0, width, height);
    }

    /// Enters a map at its default location.
    pub fn start(&mut self, map: &str) -> Result<()> {
        let env = self.providers.env();
        maps::enter_map(&mut self.world, &env, &mut self.timeline, map)?;
        Ok(())
    }

    /// Enters a map at a named location.
    pub fn start_at(&mut self, map: &str, location: &str) -> Result<()> {
        let env = self.providers.env();
        maps::enter_location(&mut self.world, &env, &mut self.timeline, map, location)?;
        Ok(())
    }

    /// Adds an actor to the overworld party.
    pub fn add_party_member(
        &mut self,
        title: &str,
        level: u8,
        moves: &[(&str, u8)],
    ) -> Result<()> {
        let env = self.providers.env();
        let species = env.species()?;
        let mut actor = BattleActor::from_species(species, title, level)?;
        for (title, total) in moves {
            actor = actor.with_move(*title, *total);
        }
        self.world.party.push(actor);
        Ok(())
    }

    /// Runs one engine tick and performs any map switch it signalled.
    pub fn tick(&mut self) -> Result<TickReport> {
        let env = self.providers.env();
        let report = self
            .engine
            .tick(&mut self.world, &env, &mut self.timeline, &mut self.scenes);

        for fault in &report.faults {
            tracing::warn!(
                code = fault.code,
                severity = fault.severity.as_str(),
                thing = ?fault.thing,
                "tick fault: {}",
                fault.message,
            );
        }

        for signal in &report.signals {
            if let EngineSignal::Transition { thing, target } = signal {
                tracing::info!(?thing, ?target, "transporter fired");
                // Live things keep their positions across the switch.
                for state in self.world.groups.all_things() {
                    maps::persist_thing(&env, state);
                }
                let target = target.clone();
                maps::enter_transport(&mut self.world, &env, &mut self.timeline, &target)?;
            }
        }
        Ok(report)
    }

    pub fn key_down(&mut self, direction: Direction) {
        let env = self.providers.env();
        movement::player_key_down(&mut self.world, &env, &mut self.timeline, direction);
    }

    pub fn key_up(&mut self, direction: Direction) {
        movement::player_key_up(&mut self.world, direction);
    }

    /// Starts a registered scene routine.
    pub fn play_scene(&mut self, name: &str) -> Result<()> {
        self.scenes.play(&self.world, &mut self.timeline, name)?;
        Ok(())
    }

    /// Dismisses one line of the active dialog, running its completion
    /// action once the lines are exhausted.
    pub fn dismiss_dialog(&mut self) -> Result<DialogAdvance> {
        let advance = self.providers.menus.advance();
        if let DialogAdvance::Finished(finish) = &advance {
            let env = self.providers.env();
            match finish {
                tileworld_core::DialogFinish::None => {}
                tileworld_core::DialogFinish::EndDialog { mover, other } => {
                    collision::finish_dialog(&mut self.world, &env, mover, other);
                }
                tileworld_core::DialogFinish::AdvanceScene { routine, step } => {
                    self.scenes.resume(
                        &mut self.world,
                        &env,
                        &mut self.timeline,
                        routine,
                        *step,
                    )?;
                }
            }
        }
        Ok(advance)
    }

    /// Submits the player's action for the turn and resolves it against
    /// the opponent's. Returns the outcome once the battle ends.
    pub fn submit_battle_action(
        &mut self,
        action: BattleAction,
    ) -> Result<Option<BattleOutcome>> {
        let env = self.providers.env();

        {
            let Some(state) = self.world.battle.as_mut() else {
                return Err(RuntimeError::NoBattle);
            };
            battle::queue_action(state, BattleSide::Player, action)?;
        }

        let opponent_selects = self
            .world
            .battle
            .as_ref()
            .is_some_and(|state| matches!(state.phase, BattlePhase::Selecting));
        if opponent_selects {
            battle::queue_opponent_action(&mut self.world, &env)?;
        }
        battle::resolve_turn(&mut self.world, &env)?;

        // A fainted opponent switches in its next live actor without
        // player involvement.
        while let Some(state) = self.world.battle.as_mut() {
            let BattlePhase::AwaitingSwitch {
                side: BattleSide::Opponent,
            } = state.phase
            else {
                break;
            };
            let Some(slot) = state.opponent.actors.iter().position(|actor| !actor.fainted())
            else {
                break;
            };
            battle::queue_action(state, BattleSide::Opponent, BattleAction::Switch { slot })?;
            battle::resolve_turn(&mut self.world, &env)?;
        }

        let ended = self
            .world
            .battle
            .as_ref()
            .is_some_and(|state| matches!(state.phase, BattlePhase::Ended(_)));
        if ended {
            return Ok(battle::end_battle(&mut self.world, &env));
        }
        Ok(None)
    }

    /// Saves the world through the key-value store: every live thing's
    /// snapshot plus the map, location, and party keys.
    pub fn save_world(&self) -> Result<()> {
        let env = self.providers.env();
        for thing in self.world.groups.all_things() {
            maps::persist_thing(&env, thing);
        }
        let store = self.providers.store.as_ref();
        store.set(SAVE_MAP_KEY, self.world.screen.map_name.clone());
        store.set(SAVE_LOCATION_KEY, self.world.screen.location_name.clone());
        let party = serde_json::to_string(&self.world.party).map_err(anyhow::Error::from)?;
        store.set(SAVE_PARTY_KEY, party);
        Ok(())
    }

    /// Re-enters the saved map at the saved location and restores the
    /// party. Returns false when the store holds no save.
    pub fn resume_saved(&mut self) -> Result<bool> {
        let (Some(map), Some(location)) = (
            self.providers.store.get(SAVE_MAP_KEY),
            self.providers.store.get(SAVE_LOCATION_KEY),
        ) else {
            return Ok(false);
        };
        if let Some(party) = self.providers.store.get(SAVE_PARTY_KEY) {
            self.world.party = serde_json::from_str(&party).map_err(anyhow::Error::from)?;
        }
        self.start_at(&map, &location)?;
        Ok(true)
    }

    /// Forces a wild battle, used by scripted encounters and tests.
    pub fn start_wild_battle(&mut self, title: &str, level: u8) -> Result<()> {
        let env = self.providers.env();
        battle::start_wild(&mut self.world, &env, title, level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tileworld_core::{MapLibrary, ThingId};

    const TOWN: &str = r#"(
    name: "Town",
    default_location: "Center",
    seed: 3,
    areas: [
        (
            name: "Main",
            bounds: (0, 0, 512, 512),
            things: [
                (title: "Wall", group: Solid, x: 0, y: 0, width: 512, height: 16),
                (
                    title: "Door",
                    group: Solid,
                    x: 224, y: 16, width: 32, height: 32,
                    traits: (transport: Some(Location("Annex"))),
                ),
            ],
        ),
        (name: "Side", bounds: (0, 512, 256, 256)),
    ],
    locations: [
        (name: "Center", area: "Main", x: 224, y: 224),
        (name: "Annex", area: "Side", x: 64, y: 576),
    ],
)"#;

    const SPECIES: &str = r#"[
    (title: "Sparrow", base: (40, 45, 40, 35, 56), base_experience: 55),
    (title: "Mouse", base: (35, 55, 30, 50, 90), base_experience: 112),
]"#;

    const MOVES: &str = r#"[
    (title: "Tackle", power: 35, accuracy: None),
]"#;

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        let mut map = std::fs::File::create(dir.path().join("maps/town.ron")).unwrap();
        map.write_all(TOWN.as_bytes()).unwrap();
        std::fs::write(dir.path().join("species.ron"), SPECIES).unwrap();
        std::fs::write(dir.path().join("moves.ron"), MOVES).unwrap();
        dir
    }

    fn session() -> Session {
        let dir = data_dir();
        let mut session = SessionBuilder::from_data_dir(dir.path()).unwrap().build();
        session.set_viewport(256, 224);
        session
    }

    #[test]
    fn starting_a_session_spawns_the_world() {
        let mut session = session();
        session.start("Town").unwrap();

        assert!(session.world().groups.player.is_some());
        assert_eq!(session.world().screen.map_name, "Town");
        assert!(
            session
                .drain_events()
                .iter()
                .any(|event| matches!(event, WorldEvent::Transported { .. }))
        );
    }

    #[test]
    fn ticks_advance_the_world_clock() {
        let mut session = session();
        session.start("Town").unwrap();
        let start = session.world().clock;

        for _ in 0..5 {
            session.tick().unwrap();
        }

        assert_eq!(session.world().clock, start + 5);
    }

    #[test]
    fn keyed_walking_moves_the_player() {
        let mut session = session();
        session.start("Town").unwrap();
        let player = ThingId::new("player");
        let before = session.world().groups.character(&player).unwrap().bounds().left;

        session.key_down(Direction::Right);
        for _ in 0..3 {
            session.tick().unwrap();
        }
        session.key_up(Direction::Right);
        for _ in 0..20 {
            session.tick().unwrap();
        }

        let after = session.world().groups.character(&player).unwrap().bounds().left;
        assert_eq!(
            after - before,
            session.world().config.block_px(),
        );
    }

    #[test]
    fn a_full_wild_battle_runs_to_an_outcome() {
        let mut session = session();
        session.start("Town").unwrap();
        session
            .add_party_member("Mouse", 20, &[("Tackle", 35)])
            .unwrap();

        session.start_wild_battle("Sparrow", 2).unwrap();
        assert!(session.in_battle());

        let mut outcome = None;
        for _ in 0..50 {
            outcome = session
                .submit_battle_action(BattleAction::Move { slot: 0 })
                .unwrap();
            if outcome.is_some() {
                break;
            }
        }

        assert_eq!(outcome, Some(BattleOutcome::Victory));
        assert!(!session.in_battle());
        assert!(
            session
                .drain_events()
                .iter()
                .any(|event| matches!(event, WorldEvent::BattleEnded))
        );
        // Experience flowed back to the party roster.
        assert!(session.world().party[0].experience > 0);
    }

    #[test]
    fn saving_and_resuming_restores_map_and_party() {
        let dir = data_dir();
        let store = crate::providers::MemoryStore::new();
        let mut session = SessionBuilder::from_data_dir(dir.path())
            .unwrap()
            .with_store(Box::new(store))
            .build();
        session.set_viewport(256, 224);
        session.start_at("Town", "Annex").unwrap();
        session
            .add_party_member("Mouse", 7, &[("Tackle", 35)])
            .unwrap();
        session.save_world().unwrap();

        let mut fresh = SessionBuilder::from_data_dir(dir.path()).unwrap().build();
        fresh.set_viewport(256, 224);
        assert!(!fresh.resume_saved().unwrap());

        assert!(session.resume_saved().unwrap());
        assert_eq!(session.world().screen.map_name, "Town");
        assert_eq!(session.world().screen.location_name, "Annex");
        assert_eq!(session.world().party.len(), 1);
        assert_eq!(session.world().party[0].title, "Mouse");
    }

    #[test]
    fn battle_actions_outside_a_battle_are_rejected() {
        let mut session = session();
        session.start("Town").unwrap();

        let result = session.submit_battle_action(BattleAction::Flee);

        assert!(matches!(result, Err(RuntimeError::NoBattle)));
    }

    #[test]
    fn loaded_catalogs_serve_the_map_library() {
        let session = session();
        assert!(session.providers().maps.map("Town").is_some());
        assert!(session.providers().maps.area("Town", "Side").is_some());
    }
}

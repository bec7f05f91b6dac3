//! End-to-end session flows over a content data directory: map entry,
//! transporter travel, and scripted scene dialog.

use std::fs;

use tileworld_core::{Direction, MenuSystem, WorldEvent};
use tileworld_runtime::{DialogAdvance, Session, SessionBuilder};

const TOWN: &str = r#"(
    name: "Town",
    default_location: "Square",
    areas: [
        (
            name: "Main",
            bounds: (0, 0, 512, 512),
            things: [
                (
                    title: "Door",
                    group: Solid,
                    x: 224, y: 160, width: 32, height: 32,
                    traits: (transport: Some(Map(map: "House", location: None))),
                ),
            ],
        ),
    ],
    locations: [
        (name: "Square", area: "Main", x: 224, y: 224),
    ],
)"#;

const HOUSE: &str = r#"(
    name: "House",
    default_location: "Inside",
    areas: [
        (name: "Room", bounds: (0, 0, 256, 256)),
    ],
    locations: [
        (name: "Inside", area: "Room", x: 96, y: 128),
    ],
)"#;

const SPECIES: &str = r#"[
    (title: "Sparrow", base: (40, 45, 40, 35, 56), base_experience: 55),
]"#;

const MOVES: &str = r#"[
    (title: "Tackle", power: 35, accuracy: None),
]"#;

const SCENES: &str = r#"[
    (
        name: "intro",
        steps: [
            Freeze(target: "player"),
            Dialog(lines: ["Welcome to Town.", "Mind the tall grass."]),
            Thaw(target: "player"),
            FireEvent(name: "intro_done"),
            End,
        ],
    ),
]"#;

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("maps")).unwrap();
    fs::write(dir.path().join("maps/town.ron"), TOWN).unwrap();
    fs::write(dir.path().join("maps/house.ron"), HOUSE).unwrap();
    fs::write(dir.path().join("species.ron"), SPECIES).unwrap();
    fs::write(dir.path().join("moves.ron"), MOVES).unwrap();
    fs::write(dir.path().join("scenes.ron"), SCENES).unwrap();
    dir
}

fn session() -> Session {
    let dir = data_dir();
    let mut session = SessionBuilder::from_data_dir(dir.path()).unwrap().build();
    session.set_viewport(256, 224);
    session.start("Town").unwrap();
    session
}

#[test]
fn walking_through_a_door_switches_maps() {
    let mut session = session();

    session.key_down(Direction::Top);
    for _ in 0..300 {
        session.tick().unwrap();
        if session.world().screen.map_name == "House" {
            break;
        }
    }
    session.key_up(Direction::Top);

    assert_eq!(session.world().screen.map_name, "House");
    assert!(session.world().groups.player.is_some());
}

#[test]
fn a_scene_freezes_talks_and_releases_the_player() {
    let mut session = session();

    session.play_scene("intro").unwrap();
    for _ in 0..10 {
        session.tick().unwrap();
        if session.providers().menus.active_menu().is_some() {
            break;
        }
    }

    assert_eq!(
        session.dismiss_dialog().unwrap(),
        DialogAdvance::Line("Welcome to Town.".to_owned()),
    );
    assert_eq!(
        session.dismiss_dialog().unwrap(),
        DialogAdvance::Line("Mind the tall grass.".to_owned()),
    );
    assert!(matches!(
        session.dismiss_dialog().unwrap(),
        DialogAdvance::Finished(_),
    ));

    // The remaining steps run on subsequent ticks.
    for _ in 0..10 {
        session.tick().unwrap();
    }
    assert!(
        session
            .drain_events()
            .iter()
            .any(|event| matches!(event, WorldEvent::Custom { name } if name == "intro_done"))
    );
}

#[test]
fn unknown_scenes_are_rejected() {
    let mut session = session();

    assert!(session.play_scene("missing").is_err());
}

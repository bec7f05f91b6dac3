//! Move loader: battle move schemas from one RON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tileworld_core::{MoveEffectSchema, MoveSchema};

use crate::catalog::MoveCatalog;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoveRon {
    title: String,
    #[serde(default)]
    power: u32,
    #[serde(default)]
    priority: i8,
    #[serde(default)]
    accuracy: Option<u8>,
    #[serde(default)]
    effects: Vec<MoveEffectSchema>,
}

/// Loader for the move catalog from a RON file.
pub struct MoveLoader;

impl MoveLoader {
    /// Loads the move catalog. A move with power but no authored effects
    /// gets the implicit plain-damage effect.
    pub fn load(path: &Path) -> LoadResult<MoveCatalog> {
        let content = read_file(path)?;
        let data: Vec<MoveRon> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse moves {}: {}", path.display(), e))?;

        let mut catalog = MoveCatalog::default();
        for entry in data {
            let mut effects = entry.effects;
            if effects.is_empty() && entry.power > 0 {
                effects.push(MoveEffectSchema::Damage { power: entry.power });
            }
            catalog.insert(MoveSchema {
                title: entry.title,
                power: entry.power,
                priority: entry.priority,
                accuracy: entry.accuracy,
                effects,
            });
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tileworld_core::{MoveOracle, StatKind};

    #[test]
    fn loads_moves_with_implicit_and_explicit_effects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
    (title: "Tackle", power: 35, accuracy: Some(95)),
    (
        title: "Growl",
        accuracy: Some(100),
        effects: [StatStage(stat: Attack, stages: -1, on_self: false)],
    ),
    (title: "Quick Attack", power: 40, priority: 1),
]"#,
        )
        .unwrap();

        let catalog = MoveLoader::load(file.path()).unwrap();

        let tackle = catalog.move_schema("Tackle").unwrap();
        assert_eq!(
            tackle.effects,
            vec![MoveEffectSchema::Damage { power: 35 }]
        );

        let growl = catalog.move_schema("Growl").unwrap();
        assert_eq!(growl.power, 0);
        assert!(matches!(
            growl.effects[0],
            MoveEffectSchema::StatStage {
                stat: StatKind::Attack,
                stages: -1,
                on_self: false,
            }
        ));

        assert_eq!(catalog.move_schema("Quick Attack").unwrap().priority, 1);
    }
}

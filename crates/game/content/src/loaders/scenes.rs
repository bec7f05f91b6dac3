//! Scene routine loader.
//!
//! Routines deserialize straight into the core's [`SceneRoutine`] records;
//! the step vocabulary is already data.

use std::path::Path;

use tileworld_core::SceneRoutine;

use crate::loaders::{LoadResult, read_file};

/// Loader for scene routines from a RON file.
pub struct SceneLoader;

impl SceneLoader {
    /// Loads all scene routines. Duplicate routine names are content
    /// errors; a silently shadowed cutscene is miserable to debug.
    pub fn load(path: &Path) -> LoadResult<Vec<SceneRoutine>> {
        let content = read_file(path)?;
        let options = ron::Options::default().with_default_extension(
            ron::extensions::Extensions::UNWRAP_NEWTYPES | ron::extensions::Extensions::IMPLICIT_SOME,
        );
        let routines: Vec<SceneRoutine> = options
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse scenes {}: {}", path.display(), e))?;

        for (index, routine) in routines.iter().enumerate() {
            if routines[..index]
                .iter()
                .any(|earlier| earlier.name == routine.name)
            {
                anyhow::bail!("duplicate scene routine {:?}", routine.name);
            }
        }
        Ok(routines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tileworld_core::SceneStep;

    #[test]
    fn loads_routines_with_step_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
    (
        name: "rival_intro",
        steps: [
            Freeze(target: "player"),
            Face(target: "rival", direction: Left),
            WalkSteps(target: "rival", direction: Left, blocks: 3),
            Dialog(lines: ["Hey! Wait up!"]),
            Thaw(target: "player"),
            End,
        ],
    ),
]"#,
        )
        .unwrap();

        let routines = SceneLoader::load(file.path()).unwrap();

        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].name, "rival_intro");
        assert_eq!(routines[0].steps.len(), 6);
        assert!(matches!(
            routines[0].steps[2],
            SceneStep::WalkSteps { blocks: 3, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_routine_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
    (name: "twice", steps: [End]),
    (name: "twice", steps: [End]),
]"#,
        )
        .unwrap();

        assert!(SceneLoader::load(file.path()).is_err());
    }
}

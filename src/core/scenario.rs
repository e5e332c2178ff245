//! Scenario table: the immutable scene text and choice lists.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::scene::Scene;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unknown scene: {0}")]
    UnknownScene(Scene),
    #[error("unknown scene key '{0}'")]
    UnknownSceneKey(String),
    #[error("scene '{0}' is missing from the scenario")]
    MissingScene(Scene),
    #[error("scene '{0}' is not terminal but has no choices")]
    EmptyChoices(Scene),
    #[error("terminal scene '{0}' must not have choices")]
    TerminalWithChoices(Scene),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Narrative text and ordered choices of one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    pub narrative: String,
    /// Display order is selection order.
    pub choices: Vec<String>,
}

/// Read-only mapping from scene to its text and choices.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    scenes: FxHashMap<Scene, SceneEntry>,
}

// Content file shape: { "start": (narrative: "...", choices: [...]), ... }
#[derive(Debug, Deserialize)]
struct RonScene {
    narrative: String,
    #[serde(default)]
    choices: Vec<String>,
}

const BUILTIN: [(Scene, &str, &[&str]); 9] = [
    (
        Scene::Start,
        "You are King Arthur, and your quest for the Holy Grail begins!",
        &["Seek the Holy Grail", "Recruit Knights", "Go to Camelot"],
    ),
    (
        Scene::Castle,
        "You approach a castle. A French guard taunts you from the ramparts.",
        &["Insult the French", "Use the Trojan Rabbit", "Retreat"],
    ),
    (
        Scene::Bridge,
        "You encounter the Bridge of Death, guarded by the old man from Scene 24.",
        &["Answer the questions", "Run away", "Push the old man"],
    ),
    (
        Scene::Forest,
        "You enter a dark and very expensive forest.",
        &[
            "Chop down a tree with a herring",
            "Run from the Knights who say Ni!",
            "Offer a shrubbery",
        ],
    ),
    (
        Scene::Swamp,
        "You find yourself in a swamp, surrounded by Knights who say Ni!",
        &[
            "Say 'Ni!'",
            "Cut down the mightiest tree with a herring",
            "Give them a shrubbery",
        ],
    ),
    (
        Scene::Cave,
        "You discover a cave with ancient writing on the wall.",
        &["Read the ancient writing", "Look for the Holy Grail", "Leave the cave"],
    ),
    (
        Scene::EndVictory,
        "Congratulations! You have found the Holy Grail!",
        &[],
    ),
    (
        Scene::EndDefeat,
        "Your quest has ended in failure. Better luck next time!",
        &[],
    ),
    (
        Scene::EndArrest,
        "You are arrested by modern-day police for a historian's murder.",
        &[],
    ),
];

impl ScenarioTable {
    /// The fixed content table of the Holy Grail quest.
    pub fn builtin() -> ScenarioTable {
        let scenes = BUILTIN
            .iter()
            .map(|(scene, narrative, choices)| {
                (
                    *scene,
                    SceneEntry {
                        narrative: narrative.to_string(),
                        choices: choices.iter().map(|c| c.to_string()).collect(),
                    },
                )
            })
            .collect();
        ScenarioTable { scenes }
    }

    /// Load a scenario table from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ScenarioTable, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a scenario table from a RON string.
    pub fn parse_ron(input: &str) -> Result<ScenarioTable, ScenarioError> {
        let raw: HashMap<String, RonScene> = ron::from_str(input)?;
        let mut scenes = FxHashMap::default();

        for (key, ron_scene) in raw {
            let Some(scene) = Scene::from_key(&key) else {
                return Err(ScenarioError::UnknownSceneKey(key));
            };
            scenes.insert(
                scene,
                SceneEntry {
                    narrative: ron_scene.narrative,
                    choices: ron_scene.choices,
                },
            );
        }

        let table = ScenarioTable { scenes };
        table.validate()?;
        Ok(table)
    }

    /// Check that every scene is present and only non-terminal scenes offer choices.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for scene in Scene::ALL {
            let entry = self
                .scenes
                .get(&scene)
                .ok_or(ScenarioError::MissingScene(scene))?;
            match (scene.is_terminal(), entry.choices.is_empty()) {
                (false, true) => return Err(ScenarioError::EmptyChoices(scene)),
                (true, false) => return Err(ScenarioError::TerminalWithChoices(scene)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Narrative text shown on entering `scene`.
    pub fn narrative_for(&self, scene: Scene) -> Result<&str, ScenarioError> {
        self.scenes
            .get(&scene)
            .map(|entry| entry.narrative.as_str())
            .ok_or(ScenarioError::UnknownScene(scene))
    }

    /// Ordered choices for `scene`; empty for terminal scenes.
    pub fn choices_for(&self, scene: Scene) -> &[String] {
        self.scenes
            .get(&scene)
            .map(|entry| entry.choices.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for ScenarioTable {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Game session: the driver loop that renders scenes, collects choices, and
//! threads state through the transition engine until a terminal scene.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::chance::{RandomSource, SeededRandom};
use crate::core::engine::{self, EngineError};
use crate::core::scenario::{ScenarioError, ScenarioTable};
use crate::schema::scene::Scene;
use crate::schema::stats::PlayerStats;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene '{scene}' offers {found} choices but the branch table defines {expected}")]
    ChoiceCountMismatch {
        scene: Scene,
        expected: usize,
        found: usize,
    },
    #[error("input closed before the game ended")]
    InputClosed,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub scene: Scene,
    pub stats: PlayerStats,
    pub turns: u32,
}

/// A playable game. Built via `Game::builder()`.
pub struct Game {
    scenario: ScenarioTable,
    random: Box<dyn RandomSource>,
}

/// Builder for constructing a `Game`.
#[derive(Default)]
pub struct GameBuilder {
    seed: Option<u64>,
    scenario_path: Option<PathBuf>,
    /// Directly provided scenario (for testing without files).
    scenario: Option<ScenarioTable>,
    /// Directly provided random source (for scripted play).
    random: Option<Box<dyn RandomSource>>,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::default()
    }

    pub fn scenario(&self) -> &ScenarioTable {
        &self.scenario
    }

    /// Play from the start scene until a terminal scene is reached.
    ///
    /// Reads one choice per turn from `input`; malformed lines are answered
    /// with a re-prompt. Everything the player sees goes to `output`.
    pub fn play<I: BufRead, O: Write>(
        &mut self,
        input: &mut I,
        output: &mut O,
    ) -> Result<GameSummary, SessionError> {
        let mut scene = Scene::Start;
        let mut stats = PlayerStats::initial();
        let mut turns = 0u32;
        info!(%scene, "quest begins");

        while !scene.is_terminal() {
            render_scene(&self.scenario, scene, &stats, output)?;
            let choices = self.scenario.choices_for(scene);
            render_choices(choices, output)?;
            let choice = read_choice(input, output, choices.len())?;

            let transition = engine::advance(scene, choice, &stats, &mut self.random)?;
            for line in &transition.narrative {
                writeln!(output, "{}", line)?;
            }
            scene = transition.next;
            stats = transition.stats;
            turns += 1;
        }

        render_scene(&self.scenario, scene, &stats, output)?;
        writeln!(output, "\nFinal Score: {}", stats.score)?;
        writeln!(output, "Game Over!")?;
        output.flush()?;
        info!(%scene, score = stats.score, turns, "quest over");

        Ok(GameSummary {
            scene,
            stats,
            turns,
        })
    }
}

impl GameBuilder {
    /// Seed the random source for a reproducible game.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load the scenario from a RON file instead of the built-in content.
    pub fn scenario_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scenario_path = Some(path.into());
        self
    }

    /// Provide a scenario directly (for testing without files).
    pub fn with_scenario(mut self, scenario: ScenarioTable) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Provide a random source directly. Takes precedence over `seed`.
    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn build(self) -> Result<Game, SessionError> {
        let scenario = match (self.scenario, self.scenario_path) {
            (Some(scenario), _) => scenario,
            (None, Some(path)) => ScenarioTable::load_from_ron(&path)?,
            (None, None) => ScenarioTable::builtin(),
        };
        scenario.validate()?;

        for scene in Scene::ALL {
            let expected = engine::branch_count(scene);
            let found = scenario.choices_for(scene).len();
            if expected != found {
                return Err(SessionError::ChoiceCountMismatch {
                    scene,
                    expected,
                    found,
                });
            }
        }

        let random: Box<dyn RandomSource> = match (self.random, self.seed) {
            (Some(random), _) => random,
            (None, Some(seed)) => Box::new(SeededRandom::seed_from_u64(seed)),
            (None, None) => Box::new(SeededRandom::from_entropy()),
        };

        Ok(Game { scenario, random })
    }
}

/// Write the status line and the narrative of `scene`.
pub fn render_scene<O: Write>(
    scenario: &ScenarioTable,
    scene: Scene,
    stats: &PlayerStats,
    output: &mut O,
) -> Result<(), SessionError> {
    writeln!(output, "\n------ {} ------", stats)?;
    writeln!(output, "\n{}", scenario.narrative_for(scene)?)?;
    Ok(())
}

/// Write the numbered choice list; numbers shown to the player start at 1.
pub fn render_choices<O: Write>(choices: &[String], output: &mut O) -> Result<(), SessionError> {
    writeln!(output, "\nWhat will you do?")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, choice)?;
    }
    Ok(())
}

/// What the player typed at the choice prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Zero-based index of a listed choice.
    Valid(usize),
    /// A whole number that names no listed choice.
    OutOfRange,
    NotANumber,
}

fn parse_entry(text: &str, count: usize) -> Entry {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Entry::NotANumber;
    }
    // Numbers too wide for i64 are still numbers; they just match no choice.
    match text.parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Entry::Valid((n - 1) as usize),
        _ => Entry::OutOfRange,
    }
}

/// Prompt until the player enters a number in `1..=count`; returns it zero-based.
///
/// Malformed lines, including bytes that are not UTF-8, are re-prompted.
/// Only a closed input stream or an IO failure ends the prompt early.
pub fn read_choice<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    count: usize,
) -> Result<usize, SessionError> {
    let mut buf = Vec::new();
    loop {
        write!(output, "Enter the number of your choice: ")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Err(SessionError::InputClosed);
        }
        let line = String::from_utf8_lossy(&buf);
        let text = line.trim();

        match parse_entry(text, count) {
            Entry::Valid(choice) => {
                writeln!(output)?;
                return Ok(choice);
            }
            Entry::OutOfRange => {
                warn!(input = text, count, "choice out of range");
                writeln!(output, "Invalid choice. Please try again.")?;
            }
            Entry::NotANumber => {
                warn!(input = text, "choice is not a number");
                writeln!(output, "Please enter a number.")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str, count: usize) -> (Result<usize, SessionError>, String) {
        prompt_bytes(input.as_bytes(), count)
    }

    fn prompt_bytes(input: &[u8], count: usize) -> (Result<usize, SessionError>, String) {
        let mut input = Cursor::new(input.to_vec());
        let mut output = Vec::new();
        let result = read_choice(&mut input, &mut output, count);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn read_choice_accepts_first_valid_number() {
        let (result, out) = prompt("2\n", 3);
        assert_eq!(result.unwrap(), 1);
        assert_eq!(out, "Enter the number of your choice: \n");
    }

    #[test]
    fn read_choice_reprompts_on_garbage() {
        let (result, out) = prompt("herring\n\n3\n", 3);
        assert_eq!(result.unwrap(), 2);
        assert_eq!(out.matches("Please enter a number.").count(), 2);
        assert_eq!(out.matches("Enter the number of your choice: ").count(), 3);
    }

    #[test]
    fn read_choice_reprompts_out_of_range() {
        let (result, out) = prompt("0\n4\n-1\n 1 \n", 3);
        assert_eq!(result.unwrap(), 0);
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 3);
    }

    #[test]
    fn read_choice_reprompts_on_invalid_utf8() {
        let (result, out) = prompt_bytes(b"\xff\xfe\n2\n", 3);
        assert_eq!(result.unwrap(), 1);
        assert_eq!(out.matches("Please enter a number.").count(), 1);
        assert_eq!(out.matches("Enter the number of your choice: ").count(), 2);
    }

    #[test]
    fn read_choice_oversized_number_is_out_of_range() {
        let (result, out) = prompt("99999999999999999999\n-99999999999999999999\n2\n", 3);
        assert_eq!(result.unwrap(), 1);
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 2);
        assert!(!out.contains("Please enter a number."));
    }

    #[test]
    fn parse_entry_classifies_input() {
        assert_eq!(parse_entry("3", 3), Entry::Valid(2));
        assert_eq!(parse_entry("+1", 3), Entry::Valid(0));
        assert_eq!(parse_entry("0", 3), Entry::OutOfRange);
        assert_eq!(parse_entry("-2", 3), Entry::OutOfRange);
        assert_eq!(parse_entry("18446744073709551617", 3), Entry::OutOfRange);
        assert_eq!(parse_entry("", 3), Entry::NotANumber);
        assert_eq!(parse_entry("-", 3), Entry::NotANumber);
        assert_eq!(parse_entry("2.5", 3), Entry::NotANumber);
        assert_eq!(parse_entry("1 2", 3), Entry::NotANumber);
    }

    #[test]
    fn read_choice_input_closed() {
        let (result, _) = prompt("7\n", 3);
        assert!(matches!(result, Err(SessionError::InputClosed)));
    }

    #[test]
    fn render_choices_numbers_from_one() {
        let mut out = Vec::new();
        render_choices(&["Run away".to_string(), "Stay".to_string()], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nWhat will you do?\n  1. Run away\n  2. Stay\n"
        );
    }

    #[test]
    fn render_scene_status_line() {
        let mut out = Vec::new();
        render_scene(
            &ScenarioTable::builtin(),
            Scene::Forest,
            &PlayerStats::initial(),
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n------ Score: 0 | Coconuts: 2 | Shrubberies: 0 ------\n\nYou enter a dark and very expensive forest.\n"
        );
    }

    #[test]
    fn builder_defaults_to_builtin_scenario() {
        let game = Game::builder().seed(1).build().unwrap();
        assert_eq!(game.scenario().choices_for(Scene::Start).len(), 3);
    }

    #[test]
    fn builder_rejects_choice_count_mismatch() {
        let ron = r#"{
            "start": (narrative: "s", choices: ["only one"]),
            "castle": (narrative: "c", choices: ["a", "b", "c"]),
            "bridge": (narrative: "b", choices: ["a", "b", "c"]),
            "forest": (narrative: "f", choices: ["a", "b", "c"]),
            "swamp": (narrative: "s", choices: ["a", "b", "c"]),
            "cave": (narrative: "c", choices: ["a", "b", "c"]),
            "end_victory": (narrative: "v"),
            "end_defeat": (narrative: "d"),
            "end_arrest": (narrative: "a"),
        }"#;
        let scenario = ScenarioTable::parse_ron(ron).unwrap();
        let err = Game::builder().with_scenario(scenario).build().err().unwrap();
        assert!(matches!(
            err,
            SessionError::ChoiceCountMismatch {
                scene: Scene::Start,
                expected: 3,
                found: 1,
            }
        ));
    }

    #[test]
    fn builder_missing_scenario_file() {
        let result = Game::builder()
            .scenario_path("does/not/exist.ron")
            .build();
        assert!(matches!(
            result,
            Err(SessionError::Scenario(ScenarioError::Io(_)))
        ));
    }
}

//! Transition engine: (scene, choice, stats, randomness) to the next step.
//!
//! The branch table is fixed. Two branches are probabilistic, and after a
//! branch from any scene except the cave lands on a non-terminal scene, a
//! side event may fire.

use thiserror::Error;
use tracing::debug;

use crate::core::chance::RandomSource;
use crate::schema::scene::Scene;
use crate::schema::stats::PlayerStats;
use crate::schema::transition::{SideEvent, Transition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("cannot advance from terminal scene '{0}'")]
    InvalidState(Scene),
    #[error("choice {choice} is out of range for scene '{scene}' ({available} choices)")]
    ChoiceOutOfRange {
        scene: Scene,
        choice: usize,
        available: usize,
    },
}

/// Chance that answering the bridge-keeper's questions succeeds.
pub const BRIDGE_SUCCESS_CHANCE: f64 = 0.5;
/// Chance that searching the cave turns up the Grail.
pub const GRAIL_SEARCH_CHANCE: f64 = 0.3;
/// Chance that a side event fires after an eligible transition.
pub const SIDE_EVENT_CHANCE: f64 = 0.2;

const CHOICES_PER_SCENE: usize = 3;

/// Number of choices the branch table defines for `scene`.
pub fn branch_count(scene: Scene) -> usize {
    if scene.is_terminal() {
        0
    } else {
        CHOICES_PER_SCENE
    }
}

/// A draw of `r` passes a check of probability `chance` when `r < chance`.
fn roll<R: RandomSource + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.next_f64() < chance
}

/// Resolved branch before side events are considered.
struct Branch {
    next: Scene,
    stats: PlayerStats,
    line: &'static str,
}

fn branch(next: Scene, stats: PlayerStats, line: &'static str) -> Branch {
    Branch { next, stats, line }
}

/// Advance one turn.
///
/// Fails with [`EngineError::InvalidState`] when `scene` is terminal and
/// with [`EngineError::ChoiceOutOfRange`] when `choice` has no branch.
/// Otherwise never fails; `stats` is left untouched.
pub fn advance<R: RandomSource + ?Sized>(
    scene: Scene,
    choice: usize,
    stats: &PlayerStats,
    rng: &mut R,
) -> Result<Transition, EngineError> {
    if scene.is_terminal() {
        return Err(EngineError::InvalidState(scene));
    }
    let available = branch_count(scene);
    if choice >= available {
        return Err(EngineError::ChoiceOutOfRange {
            scene,
            choice,
            available,
        });
    }

    let resolved = resolve_branch(scene, choice, *stats, rng);
    debug!(
        from = %scene,
        choice,
        to = %resolved.next,
        score = resolved.stats.score,
        "branch resolved"
    );

    let mut transition = Transition {
        next: resolved.next,
        stats: resolved.stats,
        narrative: vec![resolved.line],
        side_event: None,
    };

    // The cave's branches always settle the step on their own.
    if scene != Scene::Cave && !transition.next.is_terminal() {
        apply_side_event(&mut transition, rng);
    }

    Ok(transition)
}

fn resolve_branch<R: RandomSource + ?Sized>(
    scene: Scene,
    choice: usize,
    stats: PlayerStats,
    rng: &mut R,
) -> Branch {
    match (scene, choice) {
        (Scene::Start, 0) => branch(
            Scene::Castle,
            stats.add_score(10),
            "Your quest begins in earnest!",
        ),
        (Scene::Start, 1) => branch(
            Scene::Forest,
            stats.add_score(5),
            "You gather the Knights of the Round Table.",
        ),
        (Scene::Start, _) => branch(
            Scene::Swamp,
            stats,
            "On second thought, let's not go to Camelot. 'Tis a silly place.",
        ),

        (Scene::Castle, 0) => branch(
            Scene::Forest,
            stats.add_score(-5),
            "Your mother was a hamster and your father smelt of elderberries!",
        ),
        (Scene::Castle, 1) => branch(
            Scene::Bridge,
            stats.add_score(5),
            "The French catapult your own rabbit back at you!",
        ),
        (Scene::Castle, _) => branch(Scene::Swamp, stats, "You bravely run away!"),

        (Scene::Bridge, 0) => {
            if roll(rng, BRIDGE_SUCCESS_CHANCE) {
                branch(
                    Scene::Cave,
                    stats.add_score(20),
                    "You answer the questions correctly and cross the bridge!",
                )
            } else {
                branch(
                    Scene::EndDefeat,
                    stats,
                    "You are cast into the Gorge of Eternal Peril!",
                )
            }
        }
        (Scene::Bridge, 1) => branch(Scene::Forest, stats, "You wisely decide not to risk it."),
        (Scene::Bridge, _) => branch(
            Scene::EndDefeat,
            stats,
            "You push the old man, but fall into the gorge yourself!",
        ),

        (Scene::Forest, 0) => branch(
            Scene::Swamp,
            stats,
            "The Knights who say Ni! appear and demand a shrubbery!",
        ),
        (Scene::Forest, 1) => branch(Scene::Castle, stats, "You bravely run away!"),
        (Scene::Forest, _) => match stats.spend_shrubbery() {
            Some(spent) => branch(
                Scene::Cave,
                spent.add_score(15),
                "The Knights who say Ni! are appeased!",
            ),
            None => branch(Scene::Swamp, stats, "You don't have a shrubbery to offer!"),
        },

        (Scene::Swamp, 0) => branch(
            Scene::Forest,
            stats.add_score(-5),
            "The Knights who say Ni! are not impressed.",
        ),
        (Scene::Swamp, 1) => branch(
            Scene::Bridge,
            stats.add_score(5),
            "You fail miserably, but the Knights are amused.",
        ),
        (Scene::Swamp, _) => match stats.spend_shrubbery() {
            Some(spent) => branch(
                Scene::Cave,
                spent.add_score(15),
                "The Knights who say Ni! are appeased!",
            ),
            None => branch(Scene::Forest, stats, "You don't have a shrubbery to give!"),
        },

        (Scene::Cave, 0) => branch(
            Scene::EndVictory,
            stats.add_score(10),
            "The writing reveals the location of the Holy Grail!",
        ),
        (Scene::Cave, 1) => {
            if roll(rng, GRAIL_SEARCH_CHANCE) {
                branch(
                    Scene::EndVictory,
                    stats.add_score(50),
                    "You've found the Holy Grail!",
                )
            } else {
                branch(Scene::Castle, stats, "You find nothing but an empty cave.")
            }
        }
        (Scene::Cave, _) => branch(Scene::Bridge, stats, "You decide to search elsewhere."),

        // Terminal scenes are rejected by `advance` before dispatch.
        (Scene::EndVictory | Scene::EndDefeat | Scene::EndArrest, _) => {
            branch(scene, stats, "")
        }
    }
}

fn apply_side_event<R: RandomSource + ?Sized>(transition: &mut Transition, rng: &mut R) {
    if !roll(rng, SIDE_EVENT_CHANCE) {
        return;
    }
    let event = SideEvent::ALL[rng.pick(SideEvent::ALL.len())];
    debug!(?event, "side event fired");

    match event {
        SideEvent::Coconut => transition.stats = transition.stats.gain_coconut().add_score(5),
        SideEvent::Shrubbery => {
            transition.stats = transition.stats.gain_shrubbery().add_score(10)
        }
        SideEvent::Arrest => transition.next = Scene::EndArrest,
    }
    transition.narrative.push(event.line());
    transition.side_event = Some(event);
}

//! Grail Quest: a turn-based narrative state machine.
//!
//! The player moves through a fixed set of named scenes, picks one of each
//! scene's choices, and the transition engine resolves the next scene while
//! updating a small set of player statistics. Randomness is injected so every
//! branch can be driven deterministically.

pub mod core;
pub mod schema;

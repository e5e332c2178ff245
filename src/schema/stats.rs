use std::fmt;

/// The tracked numeric state carried between turns.
///
/// Values are replaced rather than mutated: every helper returns a new
/// record and leaves `self` untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerStats {
    /// May go negative; unbounded.
    pub score: i64,
    pub coconuts: u32,
    pub shrubberies: u32,
}

impl PlayerStats {
    /// Stats at the start of every game: no score, two coconuts, no shrubberies.
    pub const fn initial() -> Self {
        Self {
            score: 0,
            coconuts: 2,
            shrubberies: 0,
        }
    }

    /// Returns a copy with `delta` added to the score.
    pub fn add_score(self, delta: i64) -> Self {
        Self {
            score: self.score + delta,
            ..self
        }
    }

    /// Returns a copy holding one more coconut.
    pub fn gain_coconut(self) -> Self {
        Self {
            coconuts: self.coconuts + 1,
            ..self
        }
    }

    /// Returns a copy holding one more shrubbery.
    pub fn gain_shrubbery(self) -> Self {
        Self {
            shrubberies: self.shrubberies + 1,
            ..self
        }
    }

    /// Returns a copy with one shrubbery spent, or `None` if there is none to spend.
    pub fn spend_shrubbery(self) -> Option<Self> {
        let shrubberies = self.shrubberies.checked_sub(1)?;
        Some(Self {
            shrubberies,
            ..self
        })
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {} | Coconuts: {} | Shrubberies: {}",
            self.score, self.coconuts, self.shrubberies
        )
    }
}

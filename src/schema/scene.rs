use std::fmt;

/// A named narrative state the player occupies.
///
/// The set is closed. The three `End*` variants are terminal: reaching one
/// ends the game and they offer no choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Start,
    Castle,
    Bridge,
    Forest,
    Swamp,
    Cave,
    EndVictory,
    EndDefeat,
    EndArrest,
}

impl Scene {
    /// Every scene, in content order.
    pub const ALL: [Scene; 9] = [
        Scene::Start,
        Scene::Castle,
        Scene::Bridge,
        Scene::Forest,
        Scene::Swamp,
        Scene::Cave,
        Scene::EndVictory,
        Scene::EndDefeat,
        Scene::EndArrest,
    ];

    /// Returns true if reaching this scene ends the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndVictory | Self::EndDefeat | Self::EndArrest)
    }

    /// Stable key used for this scene in content files (e.g., "end_victory").
    pub fn key(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Castle => "castle",
            Self::Bridge => "bridge",
            Self::Forest => "forest",
            Self::Swamp => "swamp",
            Self::Cave => "cave",
            Self::EndVictory => "end_victory",
            Self::EndDefeat => "end_defeat",
            Self::EndArrest => "end_arrest",
        }
    }

    /// Inverse of [`Scene::key`].
    pub fn from_key(key: &str) -> Option<Scene> {
        Self::ALL.iter().copied().find(|scene| scene.key() == key)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

use super::scene::Scene;
use super::stats::PlayerStats;

/// A chance happening applied after certain transitions, independent of the
/// player's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEvent {
    /// One more coconut and five points.
    Coconut,
    /// One more shrubbery and ten points.
    Shrubbery,
    /// The quest ends in [`Scene::EndArrest`]; stats are unchanged.
    Arrest,
}

impl SideEvent {
    /// Side events in pick order. A uniform pick over this slice selects one.
    pub const ALL: [SideEvent; 3] = [SideEvent::Coconut, SideEvent::Shrubbery, SideEvent::Arrest];

    /// The line narrated when this event fires.
    pub fn line(&self) -> &'static str {
        match self {
            Self::Coconut => "You found coconuts! You can now simulate the sound of horse hooves.",
            Self::Shrubbery => "You stumbled upon a shrubbery!",
            Self::Arrest => "Modern-day police arrive to arrest you for the historian's murder!",
        }
    }
}

/// The result of one `advance` call. Not stored; the caller threads `next`
/// and `stats` into the following turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Scene,
    pub stats: PlayerStats,
    /// Lines to show the player, in order.
    pub narrative: Vec<&'static str>,
    /// The side event that fired during this step, if any.
    pub side_event: Option<SideEvent>,
}

impl Transition {
    /// Returns true if the game is over after this step.
    pub fn is_final(&self) -> bool {
        self.next.is_terminal()
    }
}

//! Read-only view of colony state.
//!
//! The host exposes what the presence lines need: the in-game date, the
//! free colonist count, the current biome and the colony's name. Anything
//! missing (no map loaded, world not generated) is `None` and the composer
//! falls back to a label.

use std::fmt;

use parking_lot::RwLock;

/// The four seasons of the in-game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrum {
    Aprimay,
    Jugust,
    Septober,
    Decembary,
}

impl Quadrum {
    /// Quadrum for a 0-based index, wrapping every four.
    #[must_use]
    pub fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => Self::Aprimay,
            1 => Self::Jugust,
            2 => Self::Septober,
            _ => Self::Decembary,
        }
    }
}

impl fmt::Display for Quadrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aprimay => "Aprimay",
            Self::Jugust => "Jugust",
            Self::Septober => "Septober",
            Self::Decembary => "Decembary",
        };
        f.write_str(name)
    }
}

/// Date fields at the current map's longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDate {
    /// Days since the colony landed.
    pub days_passed: u32,
    /// Current quadrum.
    pub quadrum: Quadrum,
    /// Calendar year.
    pub year: i32,
    /// Hour of day, 0–23.
    pub hour: u32,
}

/// What the host can say about the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameClock {
    /// No game is loaded.
    MainMenu,
    /// A game is loaded but the map's world tile is out of range.
    UnknownTile,
    /// A valid date.
    Date(GameDate),
}

/// Colony state the presence lines are built from.
pub trait ColonyView: Send + Sync {
    /// Current in-game time.
    fn clock(&self) -> GameClock;
    /// Free colonists across all maps.
    fn colonist_count(&self) -> u32;
    /// Label of the current map's biome.
    fn biome(&self) -> Option<String>;
    /// Name of the world/colony.
    fn colony_name(&self) -> Option<String>;
}

/// Plain-data [`ColonyView`] the host refreshes each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColonySnapshot {
    pub clock: GameClock,
    pub colonist_count: u32,
    pub biome: Option<String>,
    pub colony_name: Option<String>,
}

impl Default for ColonySnapshot {
    fn default() -> Self {
        Self {
            clock: GameClock::MainMenu,
            colonist_count: 0,
            biome: None,
            colony_name: None,
        }
    }
}

impl ColonyView for ColonySnapshot {
    fn clock(&self) -> GameClock {
        self.clock
    }

    fn colonist_count(&self) -> u32 {
        self.colonist_count
    }

    fn biome(&self) -> Option<String> {
        self.biome.clone()
    }

    fn colony_name(&self) -> Option<String> {
        self.colony_name.clone()
    }
}

impl<V: ColonyView> ColonyView for RwLock<V> {
    fn clock(&self) -> GameClock {
        self.read().clock()
    }

    fn colonist_count(&self) -> u32 {
        self.read().colonist_count()
    }

    fn biome(&self) -> Option<String> {
        self.read().biome()
    }

    fn colony_name(&self) -> Option<String> {
        self.read().colony_name()
    }
}

//! Label lookup for presence text.
//!
//! Presence labels are resolved by key (`RPC_DayLabel`, `RPC_EventRaid`, ...).
//! The host game usually supplies its own translation database; [`KeyTable`]
//! is the built-in fallback and can be loaded from a TOML file:
//!
//! ```toml
//! [keys]
//! RPC_DayLabel = "Jour"
//! RPC_ColonyLabel = "Colonie"
//! ```

use std::collections::HashMap;

use serde::Deserialize;

/// Key → display text lookup.
pub trait Translate: Send + Sync {
    /// Resolve `key`. Implementations should return something printable
    /// for unknown keys rather than failing.
    fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Label keys used by the presence reporter and event hooks.
pub mod keys {
    /// "Day" label in the game-time line.
    pub const DAY: &str = "RPC_DayLabel";
    /// "Hour" label in the game-time line.
    pub const HOUR: &str = "RPC_HourLabel";
    /// Long "Year" label.
    pub const YEAR: &str = "RPC_YearLabel";
    /// Short year label.
    pub const YEAR_SHORT: &str = "RPC_YearShortLabel";
    /// Colony name label, also the fallback colony name.
    pub const COLONY: &str = "RPC_ColonyLabel";
    /// Colonist count label.
    pub const COLONIST_COUNT: &str = "RPC_ColonistCountLabel";
    /// Biome label.
    pub const BIOME: &str = "RPC_BiomeLabel";
    /// Shown when no game is loaded.
    pub const MAIN_MENU: &str = "RPC_MainMenu";
    /// Shown when a game is loaded but the map tile is unknown.
    pub const PLAYING: &str = "RPC_Playing";
    /// Recorded when a raid resolves successfully.
    pub const EVENT_RAID: &str = "RPC_EventRaid";
    /// Recorded when a natural-terrain structure is placed.
    pub const EVENT_NATURAL_STRUCTURE: &str = "RPC_EventNaturalStructure";
    /// Recorded when a resource pod crash resolves successfully.
    pub const EVENT_POD_CRASH: &str = "RPC_EventPodCrash";
}

const ENGLISH: &[(&str, &str)] = &[
    (keys::DAY, "Day"),
    (keys::HOUR, "Hour"),
    (keys::YEAR, "Year"),
    (keys::YEAR_SHORT, "Yr"),
    (keys::COLONY, "Colony"),
    (keys::COLONIST_COUNT, "Colonists"),
    (keys::BIOME, "Biome"),
    (keys::MAIN_MENU, "In the main menu"),
    (keys::PLAYING, "Playing"),
    (keys::EVENT_RAID, "Raiders are attacking the colony!"),
    (keys::EVENT_NATURAL_STRUCTURE, "The land is shifting"),
    (keys::EVENT_POD_CRASH, "Cargo pods crashed nearby"),
];

#[derive(Debug, Deserialize)]
struct KeyFile {
    #[serde(default)]
    keys: HashMap<String, String>,
}

/// A flat in-memory translation table.
///
/// Unknown keys resolve to the key itself so missing translations are
/// visible instead of blank.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    entries: HashMap<String, String>,
}

impl KeyTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English labels.
    #[must_use]
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Parse a `[keys]` table from TOML.
    ///
    /// # Errors
    /// Returns `RpcError::Translation` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let file: KeyFile = toml::from_str(toml_str)
            .map_err(|e| crate::RpcError::Translation(e.to_string()))?;
        Ok(Self {
            entries: file.keys,
        })
    }

    /// Load a `[keys]` table from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Overlay `other` on top of this table; `other` wins on conflicts.
    #[must_use]
    pub fn merged(mut self, other: KeyTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translate for KeyTable {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

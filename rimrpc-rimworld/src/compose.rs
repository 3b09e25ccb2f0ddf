//! Builds the two presence lines from settings and colony state.
//!
//! ```text
//! details:  Day: 12 Aprimay Year: 5501 Hour: 14
//!           Colony: New Hope
//! state:    Colonists: 6
//!           Biome: Temperate forest
//! ```
//!
//! Segments are joined with `\n`; the game-time fields within their line
//! are joined with a single space. Disabled segments leave no separator.

use rimrpc_core::Translate;
use rimrpc_core::i18n::keys;

use crate::bridge::{ColonyView, GameClock};
use crate::config::RimRpcSettings;

/// Shown when the host has no biome for the current map.
pub const UNKNOWN_BIOME: &str = "N/A";

/// The top line: custom text, or date and colony name.
#[must_use]
pub fn compose_details(
    settings: &RimRpcSettings,
    colony: &dyn ColonyView,
    translator: &dyn Translate,
) -> String {
    if settings.custom_top {
        return settings.custom_top_text.clone();
    }

    let mut lines = Vec::with_capacity(2);
    if settings.shows_game_time() {
        lines.push(game_time_line(settings, colony.clock(), translator));
    }
    if settings.colony {
        let name = colony
            .colony_name()
            .unwrap_or_else(|| translator.translate(keys::COLONY));
        lines.push(format!("{}: {name}", translator.translate(keys::COLONY)));
    }
    join_lines(lines)
}

/// The bottom line: custom text, or colonist count and biome.
///
/// The recent-event override is applied by the reporter, not here.
#[must_use]
pub fn compose_state(
    settings: &RimRpcSettings,
    colony: &dyn ColonyView,
    translator: &dyn Translate,
) -> String {
    if settings.custom_bottom {
        return settings.custom_bottom_text.clone();
    }

    let mut lines = Vec::with_capacity(2);
    if settings.colonist_count {
        lines.push(format!(
            "{}: {}",
            translator.translate(keys::COLONIST_COUNT),
            colony.colonist_count()
        ));
    }
    if settings.biome {
        let biome = colony.biome().unwrap_or_else(|| UNKNOWN_BIOME.to_string());
        lines.push(format!("{}: {biome}", translator.translate(keys::BIOME)));
    }
    join_lines(lines)
}

/// Day, quadrum, year and hour, in that order, space-separated.
#[must_use]
pub fn game_time_line(
    settings: &RimRpcSettings,
    clock: GameClock,
    translator: &dyn Translate,
) -> String {
    let date = match clock {
        GameClock::MainMenu => return translator.translate(keys::MAIN_MENU),
        GameClock::UnknownTile => return translator.translate(keys::PLAYING),
        GameClock::Date(date) => date,
    };

    let mut parts = Vec::with_capacity(4);
    if settings.day {
        parts.push(format!(
            "{}: {}",
            translator.translate(keys::DAY),
            date.days_passed
        ));
    }
    if settings.quadrum {
        parts.push(date.quadrum.to_string());
    }
    if let Some(key) = settings.year_label_key() {
        parts.push(format!("{}: {}", translator.translate(key), date.year));
    }
    if settings.hour {
        parts.push(format!("{}: {}", translator.translate(keys::HOUR), date.hour));
    }
    parts.join(" ")
}

fn join_lines(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//! Game events that can become the displayed "recent event".
//!
//! The host reports four categories. Each reduces to a short description,
//! or to nothing when the event is filtered out (failed incidents, ordinary
//! construction).

use rimrpc_core::Translate;
use rimrpc_core::i18n::keys;

/// How an incident resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentOutcome {
    /// The incident fired and played out.
    Succeeded,
    /// The incident could not fire (no valid target, storyteller veto, ...).
    Failed,
}

impl IncidentOutcome {
    /// Map the host's boolean result.
    #[must_use]
    pub fn from_success(success: bool) -> Self {
        if success { Self::Succeeded } else { Self::Failed }
    }
}

/// Broad category of a placed structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureCategory {
    /// Rock, ore and other terrain-generated things.
    NaturalTerrain,
    /// Player or faction buildings.
    Building,
    /// Furniture and production benches.
    Furniture,
    /// Anything else.
    Other,
}

/// A structure the host just spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedStructure {
    /// The host's definition name, for logging.
    pub def_name: String,
    /// What kind of structure it is.
    pub category: StructureCategory,
}

impl PlacedStructure {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(def_name: impl Into<String>, category: StructureCategory) -> Self {
        Self {
            def_name: def_name.into(),
            category,
        }
    }
}

/// A host notification, in one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A message was broadcast to the player.
    Message { text: String },
    /// A raid incident resolved.
    RaidResolved { outcome: IncidentOutcome },
    /// A structure was placed on the map.
    StructurePlaced { structure: PlacedStructure },
    /// A resource-pod crash incident resolved.
    PodCrash { outcome: IncidentOutcome },
}

impl GameEvent {
    /// Short name of the category, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::RaidResolved { .. } => "raid",
            Self::StructurePlaced { .. } => "structure",
            Self::PodCrash { .. } => "pod_crash",
        }
    }

    /// The text to record, or `None` if this event is not shown.
    #[must_use]
    pub fn describe(&self, translator: &dyn Translate) -> Option<String> {
        match self {
            Self::Message { text } => Some(text.clone()),
            Self::RaidResolved {
                outcome: IncidentOutcome::Succeeded,
            } => Some(translator.translate(keys::EVENT_RAID)),
            Self::StructurePlaced { structure }
                if structure.category == StructureCategory::NaturalTerrain =>
            {
                Some(translator.translate(keys::EVENT_NATURAL_STRUCTURE))
            }
            Self::PodCrash {
                outcome: IncidentOutcome::Succeeded,
            } => Some(translator.translate(keys::EVENT_POD_CRASH)),
            _ => None,
        }
    }

    /// Forward this event to the matching [`GameEventSource`] method.
    ///
    /// [`GameEventSource`]: crate::hooks::GameEventSource
    pub fn dispatch(&self, source: &dyn crate::hooks::GameEventSource) {
        match self {
            Self::Message { text } => source.on_message(text),
            Self::RaidResolved { outcome } => source.on_raid_resolved(*outcome),
            Self::StructurePlaced { structure } => source.on_structure_placed(structure),
            Self::PodCrash { outcome } => source.on_pod_crash(*outcome),
        }
    }
}

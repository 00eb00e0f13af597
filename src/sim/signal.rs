use serde::{Deserialize, Serialize};

/// A signal emitted by one phase and consumed by later phases in the same
/// tick. Single-pass: signals raised while handling signals are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldSignal {
    /// A crew lost a battle this tick.
    CrewDefeated { winner_crew: u64, loser_crew: u64 },

    /// A defeated character held a title; succession should consider it.
    TitleHolderDefeated { title_id: u64, character_id: u64 },

    /// A crew lost its last member and was dissolved.
    CrewDissolved { crew_id: u64 },

    /// A character left one crew for another.
    MemberPoached {
        character_id: u64,
        from_crew: u64,
        to_crew: u64,
    },
}

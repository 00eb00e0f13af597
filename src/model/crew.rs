use serde::{Deserialize, Serialize};

use super::faction::Faction;

/// A crew: one ship, one captain, one location, one treasury.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    pub id: u64,
    pub name: String,
    /// Back-reference to the member holding `CrewPosition::Captain`.
    pub captain_id: u64,
    pub faction: Faction,
    pub treasury: f64,
    pub reputation: f64,
    pub current_island: u64,
    /// Docked crews are safe in port; undocked crews are exposed to naval
    /// encounters.
    pub docked: bool,
    pub founded_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: u64,
    pub crew_id: u64,
    pub name: String,
    /// 1-5. Crew capacity is `level * ship_capacity_factor`. Never lowered by
    /// the simulation.
    pub level: u32,
    pub need_repair: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Island {
    pub id: u64,
    pub name: String,
    /// 1-30. Stratifies which crews are appropriate there.
    pub difficulty: u32,
    pub description: String,
}

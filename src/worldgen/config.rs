use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Faction, TitledRole};

/// Target population per faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCounts {
    pub pirates: u32,
    pub marines: u32,
    pub bounty_hunters: u32,
    pub government: u32,
    pub civilians: u32,
}

impl FactionCounts {
    pub fn total(&self) -> u32 {
        self.pirates + self.marines + self.bounty_hunters + self.government + self.civilians
    }

    pub fn for_faction(&self, faction: Faction) -> u32 {
        match faction {
            Faction::Pirate => self.pirates,
            Faction::Marine => self.marines,
            Faction::BountyHunter => self.bounty_hunters,
            Faction::Government => self.government,
            Faction::Civilian => self.civilians,
        }
    }
}

/// How many of each titled role the world carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCounts {
    pub yonkou: u32,
    pub shichibukai: u32,
    pub admirals: u32,
    pub gorosei: u32,
}

impl TitleCounts {
    pub fn total(&self) -> u32 {
        self.yonkou + self.shichibukai + self.admirals + self.gorosei
    }

    pub fn for_role(&self, role: TitledRole) -> u32 {
        match role {
            TitledRole::Yonkou => self.yonkou,
            TitledRole::Shichibukai => self.shichibukai,
            TitledRole::Admiral => self.admirals,
            TitledRole::Gorosei => self.gorosei,
        }
    }
}

/// Declarative size configuration for world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub population: FactionCounts,
    pub titles: TitleCounts,
    /// Fraction of non-civilian characters that receive a devil fruit.
    pub fruit_distribution_rate: f64,
    /// Island topology: `difficulty_levels x islands_per_level` islands, with
    /// difficulties spread evenly over 1..=30.
    pub difficulty_levels: u32,
    pub islands_per_level: u32,
    pub average_crew_size: u32,
    /// Crew capacity = ship level x this factor.
    pub ship_capacity_factor: u32,
    /// Per-tick chance that a movable crew sails to another island.
    pub movement_chance: f64,
    /// Per-tick chance that a docked crew puts to sea.
    pub undock_chance: f64,
    /// Upper bound on a generated character's king's-haki potential.
    pub king_haki_gate: f64,
    /// Chance a generated crew starts docked.
    pub docked_chance: f64,
}

/// Named world-size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldSize {
    Small,
    Medium,
    Large,
    Epic,
}

impl WorldSize {
    pub fn settings(self) -> GenerationSettings {
        let base = GenerationSettings {
            population: FactionCounts {
                pirates: 100,
                marines: 100,
                bounty_hunters: 30,
                government: 50,
                civilians: 20,
            },
            titles: TitleCounts {
                yonkou: 4,
                shichibukai: 7,
                admirals: 3,
                gorosei: 5,
            },
            fruit_distribution_rate: 0.15,
            difficulty_levels: 10,
            islands_per_level: 3,
            average_crew_size: 5,
            ship_capacity_factor: 3,
            movement_chance: 0.3,
            undock_chance: 0.1,
            king_haki_gate: 0.3,
            docked_chance: 0.7,
        };
        match self {
            WorldSize::Small => base,
            WorldSize::Medium => GenerationSettings {
                population: FactionCounts {
                    pirates: 250,
                    marines: 250,
                    bounty_hunters: 75,
                    government: 125,
                    civilians: 50,
                },
                islands_per_level: 5,
                ..base
            },
            WorldSize::Large => GenerationSettings {
                population: FactionCounts {
                    pirates: 500,
                    marines: 500,
                    bounty_hunters: 150,
                    government: 250,
                    civilians: 100,
                },
                difficulty_levels: 15,
                islands_per_level: 5,
                ..base
            },
            WorldSize::Epic => GenerationSettings {
                population: FactionCounts {
                    pirates: 1000,
                    marines: 1000,
                    bounty_hunters: 300,
                    government: 500,
                    civilians: 200,
                },
                difficulty_levels: 15,
                islands_per_level: 8,
                ..base
            },
        }
    }
}

impl GenerationSettings {
    /// Check every constraint and report all violations at once. Runs before
    /// any generation work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.population.total() == 0 {
            violations.push("total population must be nonzero".to_string());
        }
        if self.titles.total() > self.population.total() {
            violations.push(format!(
                "titled-role count {} exceeds total population {}",
                self.titles.total(),
                self.population.total()
            ));
        }
        for (name, rate) in [
            ("fruit_distribution_rate", self.fruit_distribution_rate),
            ("movement_chance", self.movement_chance),
            ("undock_chance", self.undock_chance),
            ("king_haki_gate", self.king_haki_gate),
            ("docked_chance", self.docked_chance),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                violations.push(format!("{name} must be within 0..=1, got {rate}"));
            }
        }
        if self.difficulty_levels == 0 || self.difficulty_levels > 30 {
            violations.push(format!(
                "difficulty_levels must be within 1..=30, got {}",
                self.difficulty_levels
            ));
        }
        if self.islands_per_level == 0 {
            violations.push("islands_per_level must be nonzero".to_string());
        }
        if self.average_crew_size == 0 {
            violations.push("average_crew_size must be nonzero".to_string());
        }
        if self.ship_capacity_factor == 0 {
            violations.push("ship_capacity_factor must be nonzero".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { violations })
        }
    }
}

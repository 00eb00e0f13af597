use serde::{Deserialize, Serialize};

use super::faction::Faction;

/// The four scarce top ranks. Structurally identical records, keyed by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitledRole {
    Yonkou,
    Shichibukai,
    Admiral,
    Gorosei,
}

impl TitledRole {
    pub const ALL: [TitledRole; 4] = [
        TitledRole::Yonkou,
        TitledRole::Shichibukai,
        TitledRole::Admiral,
        TitledRole::Gorosei,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TitledRole::Yonkou => "yonkou",
            TitledRole::Shichibukai => "shichibukai",
            TitledRole::Admiral => "admiral",
            TitledRole::Gorosei => "gorosei",
        }
    }

    pub fn parse(s: &str) -> Option<TitledRole> {
        match s {
            "yonkou" => Some(TitledRole::Yonkou),
            "shichibukai" => Some(TitledRole::Shichibukai),
            "admiral" => Some(TitledRole::Admiral),
            "gorosei" => Some(TitledRole::Gorosei),
            _ => None,
        }
    }

    /// Which faction a holder must belong to.
    pub fn faction(self) -> Faction {
        match self {
            TitledRole::Yonkou | TitledRole::Shichibukai => Faction::Pirate,
            TitledRole::Admiral => Faction::Marine,
            TitledRole::Gorosei => Faction::Government,
        }
    }

    /// Relative prestige, used to bias base-island selection toward harder
    /// islands for the more feared ranks.
    pub fn prestige(self) -> u32 {
        match self {
            TitledRole::Shichibukai => 1,
            TitledRole::Admiral => 2,
            TitledRole::Yonkou => 3,
            TitledRole::Gorosei => 3,
        }
    }

    /// Only pirate roles gate on bounty; marines and the government do not
    /// carry bounties.
    pub fn requires_bounty(self) -> bool {
        self.faction() == Faction::Pirate
    }
}

/// A filled titled position, anchored to a base island.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: u64,
    pub role: TitledRole,
    pub character_id: u64,
    pub base_island: u64,
}

/// Which crew currently dominates an island. `crew_id` 0 = uncontested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryClaim {
    pub id: u64,
    pub island_id: u64,
    pub crew_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_str_round_trips() {
        for r in TitledRole::ALL {
            assert_eq!(TitledRole::parse(r.as_str()), Some(r));
        }
    }

    #[test]
    fn role_factions() {
        assert_eq!(TitledRole::Yonkou.faction(), Faction::Pirate);
        assert_eq!(TitledRole::Shichibukai.faction(), Faction::Pirate);
        assert_eq!(TitledRole::Admiral.faction(), Faction::Marine);
        assert_eq!(TitledRole::Gorosei.faction(), Faction::Government);
    }

    #[test]
    fn only_pirate_roles_gate_on_bounty() {
        assert!(TitledRole::Yonkou.requires_bounty());
        assert!(TitledRole::Shichibukai.requires_bounty());
        assert!(!TitledRole::Admiral.requires_bounty());
        assert!(!TitledRole::Gorosei.requires_bounty());
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FruitKind {
    Paramecia,
    Zoan,
    Logia,
}

impl FruitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FruitKind::Paramecia => "paramecia",
            FruitKind::Zoan => "zoan",
            FruitKind::Logia => "logia",
        }
    }

    pub fn parse(s: &str) -> Option<FruitKind> {
        match s {
            "paramecia" => Some(FruitKind::Paramecia),
            "zoan" => Some(FruitKind::Zoan),
            "logia" => Some(FruitKind::Logia),
            _ => None,
        }
    }
}

/// A devil fruit instance in the world pool. At most one owner at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevilFruit {
    pub id: u64,
    pub name: String,
    pub kind: FruitKind,
    /// 0..1, drives the power multiplier and the awakening threshold.
    pub rarity: f64,
    /// Character level at which the fruit awakens.
    pub awakening_level: u32,
    /// 0 = unassigned. Mirrors the owner's `devil_fruit_id`.
    pub owner_id: u64,
}

impl DevilFruit {
    /// Awakening threshold used at catalog generation: `floor(rarity * 75)`.
    pub fn awakening_level_for(rarity: f64) -> u32 {
        (rarity * 75.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awakening_threshold_from_rarity() {
        assert_eq!(DevilFruit::awakening_level_for(0.9), 67);
        assert_eq!(DevilFruit::awakening_level_for(0.0), 0);
        assert_eq!(DevilFruit::awakening_level_for(1.0), 75);
    }

    #[test]
    fn kind_str_round_trips() {
        for k in [FruitKind::Paramecia, FruitKind::Zoan, FruitKind::Logia] {
            assert_eq!(FruitKind::parse(k.as_str()), Some(k));
        }
    }
}

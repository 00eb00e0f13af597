use serde::{Deserialize, Serialize};

use super::faction::Faction;

/// Role a character fills aboard their crew. Exactly one `Captain` per crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewPosition {
    Captain,
    FirstMate,
    Navigator,
    Cook,
    Sniper,
    Doctor,
    Archaeologist,
    Shipwright,
    Musician,
    CrewMember,
}

impl CrewPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            CrewPosition::Captain => "captain",
            CrewPosition::FirstMate => "first_mate",
            CrewPosition::Navigator => "navigator",
            CrewPosition::Cook => "cook",
            CrewPosition::Sniper => "sniper",
            CrewPosition::Doctor => "doctor",
            CrewPosition::Archaeologist => "archaeologist",
            CrewPosition::Shipwright => "shipwright",
            CrewPosition::Musician => "musician",
            CrewPosition::CrewMember => "crew_member",
        }
    }

    pub fn parse(s: &str) -> Option<CrewPosition> {
        match s {
            "captain" => Some(CrewPosition::Captain),
            "first_mate" => Some(CrewPosition::FirstMate),
            "navigator" => Some(CrewPosition::Navigator),
            "cook" => Some(CrewPosition::Cook),
            "sniper" => Some(CrewPosition::Sniper),
            "doctor" => Some(CrewPosition::Doctor),
            "archaeologist" => Some(CrewPosition::Archaeologist),
            "shipwright" => Some(CrewPosition::Shipwright),
            "musician" => Some(CrewPosition::Musician),
            "crew_member" => Some(CrewPosition::CrewMember),
            _ => None,
        }
    }
}

/// Fighting template that drives stat growth on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStyle {
    Swordsman,
    Brawler,
    Marksman,
    Tactician,
    FruitSpecialist,
    AllRounder,
}

impl CombatStyle {
    pub const ALL: [CombatStyle; 6] = [
        CombatStyle::Swordsman,
        CombatStyle::Brawler,
        CombatStyle::Marksman,
        CombatStyle::Tactician,
        CombatStyle::FruitSpecialist,
        CombatStyle::AllRounder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CombatStyle::Swordsman => "swordsman",
            CombatStyle::Brawler => "brawler",
            CombatStyle::Marksman => "marksman",
            CombatStyle::Tactician => "tactician",
            CombatStyle::FruitSpecialist => "fruit_specialist",
            CombatStyle::AllRounder => "all_rounder",
        }
    }

    pub fn parse(s: &str) -> Option<CombatStyle> {
        match s {
            "swordsman" => Some(CombatStyle::Swordsman),
            "brawler" => Some(CombatStyle::Brawler),
            "marksman" => Some(CombatStyle::Marksman),
            "tactician" => Some(CombatStyle::Tactician),
            "fruit_specialist" => Some(CombatStyle::FruitSpecialist),
            "all_rounder" => Some(CombatStyle::AllRounder),
            _ => None,
        }
    }

    /// Per-level stat growth for this template. The `devil_fruit` entry only
    /// applies while the character actually holds a fruit.
    pub fn growth(self) -> StatBlock {
        match self {
            CombatStyle::Swordsman => StatBlock {
                attack: 2.2,
                defense: 1.2,
                speed: 1.6,
                armament: 1.4,
                observation: 0.8,
                conqueror: 0.2,
                devil_fruit: 0.4,
                intelligence: 0.6,
                skill: 1.6,
            },
            CombatStyle::Brawler => StatBlock {
                attack: 2.4,
                defense: 1.8,
                speed: 1.0,
                armament: 1.6,
                observation: 0.4,
                conqueror: 0.3,
                devil_fruit: 0.4,
                intelligence: 0.4,
                skill: 1.0,
            },
            CombatStyle::Marksman => StatBlock {
                attack: 1.8,
                defense: 0.8,
                speed: 1.4,
                armament: 0.6,
                observation: 2.0,
                conqueror: 0.1,
                devil_fruit: 0.4,
                intelligence: 1.2,
                skill: 1.6,
            },
            CombatStyle::Tactician => StatBlock {
                attack: 1.0,
                defense: 1.0,
                speed: 1.0,
                armament: 0.8,
                observation: 1.4,
                conqueror: 0.2,
                devil_fruit: 0.4,
                intelligence: 2.2,
                skill: 1.8,
            },
            CombatStyle::FruitSpecialist => StatBlock {
                attack: 1.2,
                defense: 1.0,
                speed: 1.0,
                armament: 0.8,
                observation: 0.8,
                conqueror: 0.2,
                devil_fruit: 2.4,
                intelligence: 1.2,
                skill: 1.0,
            },
            CombatStyle::AllRounder => StatBlock {
                attack: 1.4,
                defense: 1.4,
                speed: 1.4,
                armament: 1.0,
                observation: 1.0,
                conqueror: 0.2,
                devil_fruit: 0.6,
                intelligence: 1.0,
                skill: 1.2,
            },
        }
    }
}

/// Full stat block. Zero is a valid value for every field; missing abilities
/// (no haki, no fruit) are represented as 0, never as absent fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub armament: f64,
    pub observation: f64,
    pub conqueror: f64,
    pub devil_fruit: f64,
    pub intelligence: f64,
    pub skill: f64,
}

impl StatBlock {
    pub fn values(&self) -> [f64; 9] {
        [
            self.attack,
            self.defense,
            self.speed,
            self.armament,
            self.observation,
            self.conqueror,
            self.devil_fruit,
            self.intelligence,
            self.skill,
        ]
    }

    pub fn average(&self) -> f64 {
        self.values().iter().sum::<f64>() / 9.0
    }

    /// Add `growth` once, flooring negatives at zero.
    pub fn grow(&mut self, growth: &StatBlock) {
        self.attack = (self.attack + growth.attack).max(0.0);
        self.defense = (self.defense + growth.defense).max(0.0);
        self.speed = (self.speed + growth.speed).max(0.0);
        self.armament = (self.armament + growth.armament).max(0.0);
        self.observation = (self.observation + growth.observation).max(0.0);
        self.conqueror = (self.conqueror + growth.conqueror).max(0.0);
        self.devil_fruit = (self.devil_fruit + growth.devil_fruit).max(0.0);
        self.intelligence = (self.intelligence + growth.intelligence).max(0.0);
        self.skill = (self.skill + growth.skill).max(0.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub faction: Faction,
    pub level: u32,
    pub experience: f64,
    pub bounty: f64,
    pub stats: StatBlock,
    /// 0 = not attached to any crew (only transiently, between spawn and
    /// redistribution).
    pub crew_id: u64,
    pub position: CrewPosition,
    /// 0 = no fruit.
    pub devil_fruit_id: u64,
    pub is_player: bool,
    /// Alignment axis, -100..100. Extremes make a fighter less predictable.
    pub kindness: i32,
    /// Retention axis, -100..100. Low loyalty members defect first.
    pub loyalty: i32,
    /// Probability gate (0..1) for ever developing conqueror's haki.
    pub king_haki_potential: f64,
    pub defending_base: bool,
    pub combat_style: CombatStyle,
}

impl Character {
    pub fn has_fruit(&self) -> bool {
        self.devil_fruit_id != 0
    }

    pub fn is_captain(&self) -> bool {
        self.position == CrewPosition::Captain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_average_of_uniform_block() {
        let s = StatBlock {
            attack: 9.0,
            defense: 9.0,
            speed: 9.0,
            armament: 9.0,
            observation: 9.0,
            conqueror: 9.0,
            devil_fruit: 9.0,
            intelligence: 9.0,
            skill: 9.0,
        };
        assert!((s.average() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn grow_floors_at_zero() {
        let mut s = StatBlock::default();
        s.grow(&StatBlock {
            attack: -5.0,
            ..StatBlock::default()
        });
        assert_eq!(s.attack, 0.0);
    }

    #[test]
    fn position_str_round_trips() {
        for p in [
            CrewPosition::Captain,
            CrewPosition::FirstMate,
            CrewPosition::Navigator,
            CrewPosition::Cook,
            CrewPosition::Sniper,
            CrewPosition::Doctor,
            CrewPosition::Archaeologist,
            CrewPosition::Shipwright,
            CrewPosition::Musician,
            CrewPosition::CrewMember,
        ] {
            assert_eq!(CrewPosition::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn combat_style_str_round_trips() {
        for s in CombatStyle::ALL {
            assert_eq!(CombatStyle::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn every_growth_template_is_non_negative() {
        for style in CombatStyle::ALL {
            for v in style.growth().values() {
                assert!(v >= 0.0, "{style:?} has negative growth");
            }
        }
    }
}
